use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenProvider;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_user::current_user;
use super::handlers::delete_current_user::delete_current_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::CredentialServicePort;
use crate::account::ports::IdentityResolverPort;
use crate::account::ports::UserDirectory;
use crate::account::ports::UserServicePort;
use crate::account::resolver::IdentityResolver;
use crate::account::service::CredentialService;
use crate::account::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<dyn CredentialServicePort>,
    pub identity_resolver: Arc<dyn IdentityResolverPort>,
    pub user_service: Arc<dyn UserServicePort>,
}

impl AppState {
    /// Wire every service over one directory, hasher and token provider.
    pub fn from_directory<D: UserDirectory>(
        directory: Arc<D>,
        password_hasher: PasswordHasher,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            credential_service: Arc::new(CredentialService::new(
                Arc::clone(&directory),
                password_hasher,
                Arc::clone(&token_provider),
            )),
            identity_resolver: Arc::new(IdentityResolver::new(
                Arc::clone(&directory),
                token_provider,
            )),
            user_service: Arc::new(UserService::new(directory)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(current_user))
        .route("/api/users/me", delete(delete_current_user))
        .route("/api/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
