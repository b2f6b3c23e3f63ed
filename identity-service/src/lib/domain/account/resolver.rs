use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenProvider;

use crate::account::errors::AccountError;
use crate::account::ports::IdentityResolverPort;
use crate::account::ports::UserDirectory;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::UserIdentity;

/// Scheme marker preceding the token in an `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// # Errors
/// * `TokenMalformed` - Header does not carry a bearer token
pub fn bearer_token(header: &str) -> Result<&str, AccountError> {
    header
        .strip_prefix(BEARER_SCHEME)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AccountError::TokenMalformed)
}

/// Recovers the authoritative identity behind a token or an email.
///
/// A request starts unauthenticated and becomes authenticated only when the
/// token verifies and its subject still exists in the directory; every other
/// outcome is a rejection carrying the specific error.
pub struct IdentityResolver<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    token_provider: Arc<TokenProvider>,
}

impl<D> IdentityResolver<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            directory,
            token_provider,
        }
    }
}

#[async_trait]
impl<D> IdentityResolverPort for IdentityResolver<D>
where
    D: UserDirectory,
{
    async fn resolve(&self, token: &str) -> Result<UserIdentity, AccountError> {
        let claims = self.token_provider.validate(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AccountError::from(e)
        })?;

        // Subjects are issued from normalized emails; anything else was not
        // minted here.
        let email = EmailAddress::new(&claims.sub).map_err(|_| AccountError::TokenMalformed)?;

        // A valid token does not guarantee the account still exists.
        let identity = self
            .directory
            .find_by_email(&email)
            .await?
            .map(|account| account.identity)
            .ok_or_else(|| {
                tracing::debug!("Token subject no longer exists");
                AccountError::UserNotFound
            })?;

        Ok(identity)
    }

    async fn load_by_email(&self, email: &str) -> Result<UserIdentity, AccountError> {
        let email = EmailAddress::new(email)?;

        self.directory
            .find_by_email(&email)
            .await?
            .map(|account| account.identity)
            .ok_or(AccountError::UserNotFound)
    }
}
