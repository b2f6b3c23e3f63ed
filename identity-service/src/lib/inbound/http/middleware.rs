use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::account::errors::AccountError;
use crate::account::resolver::bearer_token;
use crate::domain::account::models::UserIdentity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the resolved identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: UserIdentity,
}

/// Middleware that resolves the bearer token and adds the identity to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = {
        let header = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

        bearer_token(header)
            .map_err(|_| {
                ApiError::Unauthorized(
                    "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
                )
            })?
            .to_string()
    };

    let identity = state
        .identity_resolver
        .resolve(&token)
        .await
        .map_err(rejection)?;

    req.extensions_mut().insert(AuthenticatedUser { identity });

    Ok(next.run(req).await)
}

fn rejection(err: AccountError) -> ApiError {
    if err.is_authentication_failure() {
        tracing::warn!(error = %err, "Bearer token rejected");
        ApiError::Unauthorized(err.to_string())
    } else {
        ApiError::from(err)
    }
}
