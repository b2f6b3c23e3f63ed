use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::DirectoryError;
use crate::account::ports::UserDirectory;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::UserId;
use crate::domain::account::models::UserIdentity;

#[derive(Default)]
struct Accounts {
    by_id: HashMap<UserId, UserAccount>,
    by_email: HashMap<EmailAddress, UserId>,
}

/// Process-local user directory.
///
/// The email index and the records share one lock, and `save` checks and
/// inserts under a single write guard: that is this store's unique
/// constraint.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    accounts: RwLock<Accounts>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, DirectoryError> {
        let accounts = self.accounts.read().await;

        Ok(accounts
            .by_email
            .get(email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError> {
        Ok(self.accounts.read().await.by_id.get(id).cloned())
    }

    async fn save(&self, account: UserAccount) -> Result<UserId, DirectoryError> {
        let mut accounts = self.accounts.write().await;

        let email = account.credential.email.clone();
        if accounts.by_email.contains_key(&email) {
            return Err(DirectoryError::Conflict(email.as_str().to_string()));
        }

        let id = account.identity.id;
        accounts.by_email.insert(email, id);
        accounts.by_id.insert(id, account);

        Ok(id)
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), DirectoryError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .by_id
            .remove(id)
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;
        accounts.by_email.remove(&account.credential.email);

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<UserIdentity>, DirectoryError> {
        let accounts = self.accounts.read().await;

        let mut identities: Vec<UserIdentity> = accounts
            .by_id
            .values()
            .map(|account| account.identity.clone())
            .collect();
        identities.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(identities)
    }
}
