use auth::TokenError;
use thiserror::Error;

/// Input rejected before any directory access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Email must not be blank")]
    BlankEmail,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Password must not be blank")]
    BlankPassword,

    #[error("Display name must not be blank")]
    BlankDisplayName,

    #[error("Display name too long: maximum {max} characters, got {actual}")]
    DisplayNameTooLong { max: usize, actual: usize },

    #[error("Invalid UUID format: {0}")]
    InvalidUserId(String),
}

/// Failures reported by a user directory implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Unique constraint on the email was violated.
    #[error("Email already exists: {0}")]
    Conflict(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for registration, login and identity resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Account already exists")]
    DuplicateAccount,

    /// Unknown email and wrong password on purpose share this variant and
    /// its message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is malformed")]
    TokenMalformed,

    #[error("Token signature does not match")]
    TokenSignatureMismatch,

    #[error("User not found")]
    UserNotFound,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssue(String),

    #[error("Directory error: {0}")]
    Directory(String),
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AccountError::TokenExpired,
            TokenError::Malformed(_) => AccountError::TokenMalformed,
            TokenError::SignatureMismatch => AccountError::TokenSignatureMismatch,
            TokenError::IssueFailed(msg) => AccountError::TokenIssue(msg),
        }
    }
}

impl From<DirectoryError> for AccountError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Conflict(_) => AccountError::DuplicateAccount,
            DirectoryError::NotFound(_) => AccountError::UserNotFound,
            DirectoryError::Unavailable(msg) => AccountError::Directory(msg),
        }
    }
}

impl AccountError {
    /// Whether the error is a rejected bearer token or a vanished account.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AccountError::TokenExpired
                | AccountError::TokenMalformed
                | AccountError::TokenSignatureMismatch
                | AccountError::UserNotFound
                | AccountError::InvalidCredentials
        )
    }
}
