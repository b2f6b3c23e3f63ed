use async_trait::async_trait;

use crate::domain::account::models::AuthResult;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginRequest;
use crate::domain::account::models::RegistrationRequest;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::UserId;
use crate::domain::account::models::UserIdentity;
use crate::account::errors::AccountError;
use crate::account::errors::DirectoryError;

/// Port for registration and login.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token.
    ///
    /// # Errors
    /// * `InvalidInput` - Blank or malformed field
    /// * `DuplicateAccount` - Email is already registered
    /// * `Hashing` / `Directory` / `TokenIssue` - Infrastructure failure
    async fn register(&self, request: RegistrationRequest) -> Result<AuthResult, AccountError>;

    /// Authenticate with email and password and issue a token.
    ///
    /// # Errors
    /// * `InvalidInput` - Blank or malformed field
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Hashing` / `Directory` / `TokenIssue` - Infrastructure failure
    async fn login(&self, request: LoginRequest) -> Result<AuthResult, AccountError>;
}

/// Port for turning presented credentials back into an identity.
#[async_trait]
pub trait IdentityResolverPort: Send + Sync + 'static {
    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// # Errors
    /// * `TokenExpired` / `TokenMalformed` / `TokenSignatureMismatch` - Token rejected
    /// * `UserNotFound` - Token is valid but the account no longer exists
    /// * `Directory` - Directory lookup failed
    async fn resolve(&self, token: &str) -> Result<UserIdentity, AccountError>;

    /// Load an identity by raw email.
    ///
    /// # Errors
    /// * `InvalidInput` - Blank or malformed email
    /// * `UserNotFound` - No account with this email
    /// * `Directory` - Directory lookup failed
    async fn load_by_email(&self, email: &str) -> Result<UserIdentity, AccountError>;
}

/// Port for reading and removing registered users.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// List every registered user.
    async fn list_users(&self) -> Result<Vec<UserIdentity>, AccountError>;

    /// # Errors
    /// * `UserNotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<UserIdentity, AccountError>;

    /// # Errors
    /// * `UserNotFound` - User does not exist
    async fn delete_user(&self, id: &UserId) -> Result<(), AccountError>;
}

/// Storage of user accounts.
///
/// Implementations must enforce email uniqueness themselves: concurrent
/// `save` calls for the same email must let at most one succeed and report
/// `Conflict` for the rest.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Retrieve an account by normalized email.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<UserAccount>, DirectoryError>;

    /// Retrieve an account by identifier.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError>;

    /// Persist a new account in a single write.
    ///
    /// # Returns
    /// Identifier of the stored account
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Unavailable` - Storage operation failed
    async fn save(&self, account: UserAccount) -> Result<UserId, DirectoryError>;

    /// Remove an account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Unavailable` - Storage operation failed
    async fn delete_by_id(&self, id: &UserId) -> Result<(), DirectoryError>;

    /// Retrieve every account's identity.
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_all(&self) -> Result<Vec<UserIdentity>, DirectoryError>;
}
