use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::DirectoryError;
use crate::account::ports::UserDirectory;
use crate::domain::account::models::Credential;
use crate::domain::account::models::DisplayName;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::UserId;
use crate::domain::account::models::UserIdentity;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    display_name: String,
    role: String,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = DirectoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&row.email)
            .map_err(|e| DirectoryError::Unavailable(format!("Corrupt user row {}: {}", row.id, e)))?;
        let display_name = DisplayName::new(&row.display_name)
            .map_err(|e| DirectoryError::Unavailable(format!("Corrupt user row {}: {}", row.id, e)))?;

        Ok(UserAccount {
            identity: UserIdentity {
                id: UserId(row.id),
                email: email.clone(),
                display_name,
                role: row.role,
                avatar: row.avatar,
                created_at: row.created_at,
            },
            credential: Credential {
                email,
                password_hash: row.password_hash,
            },
        })
    }
}

fn database_error(e: sqlx::Error) -> DirectoryError {
    DirectoryError::Unavailable(e.to_string())
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, DirectoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, display_name, role, avatar, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, display_name, role, avatar, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn save(&self, account: UserAccount) -> Result<UserId, DirectoryError> {
        let identity = &account.identity;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, display_name, role, avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(identity.id.0)
        .bind(account.credential.email.as_str())
        .bind(&account.credential.password_hash)
        .bind(identity.display_name.as_str())
        .bind(&identity.role)
        .bind(identity.avatar.as_deref())
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                {
                    return DirectoryError::Conflict(account.credential.email.as_str().to_string());
                }
            }
            database_error(e)
        })?;

        tracing::debug!(user_id = %identity.id, "User row inserted");

        Ok(identity.id)
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<UserIdentity>, DirectoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, display_name, role, avatar, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter()
            .map(|row| UserAccount::try_from(row).map(|account| account.identity))
            .collect()
    }
}
