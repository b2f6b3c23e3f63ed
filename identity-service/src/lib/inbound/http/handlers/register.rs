use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::domain::account::models::RegistrationRequest;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    state
        .credential_service
        .register(body.into())
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::CREATED, result.into()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Clone, Deserialize)]
pub struct RegisterRequestBody {
    email: String,
    password: String,
    name: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

impl From<RegisterRequestBody> for RegistrationRequest {
    fn from(body: RegisterRequestBody) -> Self {
        RegistrationRequest {
            email: body.email,
            password: body.password,
            display_name: body.name,
            role: body.role,
            avatar: body.avatar,
        }
    }
}
