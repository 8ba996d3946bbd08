use crate::gatehouse::{error::ErrorBody, login::LoginCoordinator, AuthError};
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

// No Debug: the payload carries a plaintext password.
#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginUser {
    id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginResponse {
    success: bool,
    user: LoginUser,
    /// Provider session, unmodified.
    #[schema(value_type = Object)]
    session: Value,
}

#[utoipa::path(
    post,
    path= "/api/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Credentials accepted", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Email and password are required", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    ),
    tag= "auth"
)]
#[instrument(skip(coordinator, payload))]
pub async fn login(
    coordinator: Extension<Arc<LoginCoordinator>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation);
    };

    let outcome = coordinator.login(request.email, request.password).await?;

    Ok(Json(LoginResponse {
        success: true,
        user: LoginUser {
            id: outcome.user.id,
            email: outcome.user.email,
        },
        session: outcome.session,
    }))
}
