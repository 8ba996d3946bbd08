use crate::{
    gatehouse::{error::ErrorBody, signup::SignupCoordinator, AuthError},
    profile::ProfileRecord,
};
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

// No Debug: the payload carries a plaintext password.
#[derive(ToSchema, Deserialize)]
pub struct SignupRequest {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct SignupResponse {
    success: bool,
    user: ProfileRecord,
}

#[utoipa::path(
    post,
    path= "/api/auth/signup",
    request_body = SignupRequest,
    responses (
        (status = 200, description = "Identity and profile created", body = SignupResponse, content_type = "application/json"),
        (status = 400, description = "Email and password are required", body = ErrorBody),
        (status = 500, description = "Identity provider or profile store failure", body = ErrorBody),
    ),
    tag= "auth"
)]
#[instrument(skip(coordinator, payload))]
pub async fn signup(
    coordinator: Extension<Arc<SignupCoordinator>>,
    payload: Option<Json<SignupRequest>>,
) -> Result<Json<SignupResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation);
    };

    let user = coordinator
        .signup(request.email, request.password, request.name)
        .await?;

    Ok(Json(SignupResponse {
        success: true,
        user,
    }))
}
