use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenProvider;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::errors::DirectoryError;
use crate::account::ports::CredentialServicePort;
use crate::account::ports::UserDirectory;
use crate::account::ports::UserServicePort;
use crate::domain::account::models::AuthResult;
use crate::domain::account::models::Credential;
use crate::domain::account::models::LoginRequest;
use crate::domain::account::models::Password;
use crate::domain::account::models::RegistrationRequest;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::UserId;
use crate::domain::account::models::UserIdentity;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Registration and login over a user directory.
///
/// Password hashing runs on the blocking pool; its cost is the brute-force
/// throttle, so it is never skipped or cached.
pub struct CredentialService<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    password_hasher: PasswordHasher,
    token_provider: Arc<TokenProvider>,
    decoy_hash: Option<String>,
}

impl<D> CredentialService<D>
where
    D: UserDirectory,
{
    /// Create a credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - User account storage
    /// * `password_hasher` - Hasher carrying the configured Argon2 cost
    /// * `token_provider` - Shared token issuer
    pub fn new(
        directory: Arc<D>,
        password_hasher: PasswordHasher,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        let decoy_hash = match password_hasher.hash(DECOY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Decoy hash unavailable, unknown-email logins will skip verification"
                );
                None
            }
        };

        Self {
            directory,
            password_hasher,
            token_provider,
            decoy_hash,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, AccountError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
            .map_err(|e| AccountError::Hashing(e.to_string()))
    }

    async fn verify_password(
        &self,
        password: Password,
        password_hash: String,
    ) -> Result<bool, AccountError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &password_hash))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))
    }

    /// Spend one verification on the decoy hash so an unknown email costs
    /// the same as a wrong password.
    async fn verify_against_decoy(&self, password: Password) {
        if let Some(decoy_hash) = self.decoy_hash.clone() {
            let _ = self.verify_password(password, decoy_hash).await;
        }
    }

    fn issue_token(&self, identity: UserIdentity) -> Result<AuthResult, AccountError> {
        let token = self.token_provider.issue(identity.email.as_str())?;
        Ok(AuthResult { identity, token })
    }
}

#[async_trait]
impl<D> CredentialServicePort for CredentialService<D>
where
    D: UserDirectory,
{
    async fn register(&self, request: RegistrationRequest) -> Result<AuthResult, AccountError> {
        let (email, password, profile) = request.validate()?;

        if self.directory.find_by_email(&email).await?.is_some() {
            tracing::warn!("Registration rejected: email already registered");
            return Err(AccountError::DuplicateAccount);
        }

        let password_hash = self.hash_password(password).await?;

        let mut identity = UserIdentity {
            id: UserId::new(),
            email: email.clone(),
            display_name: profile.display_name,
            role: profile.role,
            avatar: profile.avatar,
            created_at: Utc::now(),
        };
        let account = UserAccount {
            identity: identity.clone(),
            credential: Credential {
                email,
                password_hash,
            },
        };

        // The directory's unique constraint settles concurrent registrations
        // that both passed the lookup above.
        identity.id = self.directory.save(account).await.map_err(|e| {
            if let DirectoryError::Conflict(_) = e {
                tracing::warn!("Registration rejected: email claimed concurrently");
            }
            AccountError::from(e)
        })?;

        tracing::info!(user_id = %identity.id, role = %identity.role, "Account registered");

        self.issue_token(identity)
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthResult, AccountError> {
        let (email, password) = request.validate()?;

        // Anti-enumeration: an unknown email and a wrong password both end in
        // `InvalidCredentials`, with the same message and comparable cost.
        // Do not split them into distinct errors.
        let account = match self.directory.find_by_email(&email).await? {
            Some(account) => account,
            None => {
                self.verify_against_decoy(password).await;
                tracing::info!("Login rejected");
                return Err(AccountError::InvalidCredentials);
            }
        };

        let is_valid = self
            .verify_password(password, account.credential.password_hash)
            .await?;
        if !is_valid {
            tracing::info!("Login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        tracing::info!(user_id = %account.identity.id, "Login succeeded");

        self.issue_token(account.identity)
    }
}

/// Read and delete operations over registered users.
pub struct UserService<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
}

impl<D> UserService<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D> UserServicePort for UserService<D>
where
    D: UserDirectory,
{
    async fn list_users(&self) -> Result<Vec<UserIdentity>, AccountError> {
        Ok(self.directory.find_all().await?)
    }

    async fn get_user(&self, id: &UserId) -> Result<UserIdentity, AccountError> {
        self.directory
            .find_by_id(id)
            .await?
            .map(|account| account.identity)
            .ok_or(AccountError::UserNotFound)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), AccountError> {
        self.directory.delete_by_id(id).await?;
        tracing::info!(user_id = %id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::account::models::DisplayName;
    use crate::domain::account::models::EmailAddress;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    mock! {
        pub TestUserDirectory {}

        #[async_trait]
        impl UserDirectory for TestUserDirectory {
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserAccount>, DirectoryError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError>;
            async fn save(&self, account: UserAccount) -> Result<UserId, DirectoryError>;
            async fn delete_by_id(&self, id: &UserId) -> Result<(), DirectoryError>;
            async fn find_all(&self) -> Result<Vec<UserIdentity>, DirectoryError>;
        }
    }

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1).expect("Failed to build hasher")
    }

    fn token_provider() -> Arc<TokenProvider> {
        Arc::new(TokenProvider::new(SECRET, Duration::hours(1)))
    }

    fn credential_service(directory: MockTestUserDirectory) -> CredentialService<MockTestUserDirectory> {
        CredentialService::new(Arc::new(directory), hasher(), token_provider())
    }

    fn account(email: &str, password: &str) -> UserAccount {
        let email = EmailAddress::new(email).unwrap();
        UserAccount {
            identity: UserIdentity {
                id: UserId::new(),
                email: email.clone(),
                display_name: DisplayName::new("Alice").unwrap(),
                role: "user".to_string(),
                avatar: None,
                created_at: Utc::now(),
            },
            credential: Credential {
                email,
                password_hash: hasher().hash(password).unwrap(),
            },
        }
    }

    fn registration(email: &str, password: &str) -> RegistrationRequest {
        RegistrationRequest {
            email: email.to_string(),
            password: password.to_string(),
            display_name: "Alice".to_string(),
            role: Some("admin".to_string()),
            avatar: Some("avatars/alice.png".to_string()),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(|_| Ok(None));
        directory
            .expect_save()
            .withf(|account| {
                account.identity.email.as_str() == "a@x.com"
                    && account.credential.email.as_str() == "a@x.com"
                    && account.credential.password_hash.starts_with("$argon2id")
                    && !account.credential.password_hash.contains("Secret1!")
            })
            .times(1)
            .returning(|account| Ok(account.identity.id));

        let service = credential_service(directory);

        let result = service
            .register(registration("A@X.com", "Secret1!"))
            .await
            .expect("Registration failed");

        assert_eq!(result.identity.email.as_str(), "a@x.com");
        assert_eq!(result.identity.display_name.as_str(), "Alice");
        assert_eq!(result.identity.role, "admin");
        assert_eq!(result.identity.avatar.as_deref(), Some("avatars/alice.png"));
        assert_eq!(result.token.subject(), "a@x.com");

        let claims = token_provider()
            .validate(result.token.as_str())
            .expect("Issued token does not validate");
        assert_eq!(claims.sub, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(account("a@x.com", "Secret1!"))));
        directory.expect_save().times(0);

        let service = credential_service(directory);

        let result = service.register(registration("a@x.com", "Other1!")).await;
        assert_eq!(result.unwrap_err(), AccountError::DuplicateAccount);
    }

    #[tokio::test]
    async fn test_register_conflict_from_directory() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        directory.expect_save().times(1).returning(|account| {
            Err(DirectoryError::Conflict(
                account.identity.email.as_str().to_string(),
            ))
        });

        let service = credential_service(directory);

        let result = service.register(registration("a@x.com", "Secret1!")).await;
        assert_eq!(result.unwrap_err(), AccountError::DuplicateAccount);
    }

    #[tokio::test]
    async fn test_register_persistence_failure_issues_no_token() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        directory
            .expect_save()
            .times(1)
            .returning(|_| Err(DirectoryError::Unavailable("connection reset".to_string())));

        let service = credential_service(directory);

        let result = service.register(registration("a@x.com", "Secret1!")).await;
        assert_eq!(
            result.unwrap_err(),
            AccountError::Directory("connection reset".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_blank_fields_fail_before_lookup() {
        let mut directory = MockTestUserDirectory::new();
        directory.expect_find_by_email().times(0);
        directory.expect_save().times(0);

        let service = credential_service(directory);

        let blank_email = service.register(registration("  ", "Secret1!")).await;
        assert!(matches!(
            blank_email,
            Err(AccountError::InvalidInput(_))
        ));

        let blank_password = service.register(registration("a@x.com", "   ")).await;
        assert!(matches!(
            blank_password,
            Err(AccountError::InvalidInput(_))
        ));

        let bad_email = service.register(registration("not-an-email", "Secret1!")).await;
        assert!(matches!(bad_email, Err(AccountError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let stored = account("a@x.com", "Secret1!");
        let expected = stored.identity.clone();

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = credential_service(directory);

        let result = service
            .login(login("A@x.COM", "Secret1!"))
            .await
            .expect("Login failed");

        assert_eq!(result.identity, expected);
        assert_eq!(result.token.subject(), "a@x.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let stored = account("a@x.com", "Secret1!");

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_email()
            .times(2)
            .returning(move |email| {
                if email.as_str() == "a@x.com" {
                    Ok(Some(stored.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = credential_service(directory);

        let wrong_password = service
            .login(login("a@x.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login("nobody@x.com", "Secret1!"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password, AccountError::InvalidCredentials);
        assert_eq!(unknown_email, AccountError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_with_corrupt_stored_hash() {
        let mut stored = account("a@x.com", "Secret1!");
        stored.credential.password_hash = "not-a-phc-string".to_string();

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = credential_service(directory);

        let result = service.login(login("a@x.com", "Secret1!")).await;
        assert_eq!(result.unwrap_err(), AccountError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_blank_fields_fail_before_lookup() {
        let mut directory = MockTestUserDirectory::new();
        directory.expect_find_by_email().times(0);

        let service = credential_service(directory);

        assert!(matches!(
            service.login(login("", "Secret1!")).await,
            Err(AccountError::InvalidInput(_))
        ));
        assert!(matches!(
            service.login(login("a@x.com", "")).await,
            Err(AccountError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_login_directory_failure_is_surfaced() {
        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(DirectoryError::Unavailable("timeout".to_string())));

        let service = credential_service(directory);

        let result = service.login(login("a@x.com", "Secret1!")).await;
        assert_eq!(
            result.unwrap_err(),
            AccountError::Directory("timeout".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_users() {
        let first = account("a@x.com", "Secret1!").identity;
        let second = account("b@x.com", "Secret2!").identity;
        let expected = vec![first.clone(), second.clone()];

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_all()
            .times(1)
            .returning(move || Ok(vec![first.clone(), second.clone()]));

        let service = UserService::new(Arc::new(directory));

        assert_eq!(service.list_users().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let stored = account("a@x.com", "Secret1!");
        let user_id = stored.identity.id;
        let expected = stored.identity.clone();

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = UserService::new(Arc::new(directory));

        assert_eq!(service.get_user(&user_id).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(directory));

        let result = service.get_user(&UserId::new()).await;
        assert_eq!(result.unwrap_err(), AccountError::UserNotFound);
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_delete_by_id()
            .times(1)
            .returning(|id| Err(DirectoryError::NotFound(id.to_string())));

        let service = UserService::new(Arc::new(directory));

        let result = service.delete_user(&UserId::new()).await;
        assert_eq!(result.unwrap_err(), AccountError::UserNotFound);
    }

    #[test]
    fn test_decoy_hash_is_prepared_at_construction() {
        let service = credential_service(MockTestUserDirectory::new());

        let decoy_hash = service.decoy_hash.as_deref().expect("decoy hash missing");
        assert!(hasher().verify(DECOY_PASSWORD, decoy_hash));
    }
}
