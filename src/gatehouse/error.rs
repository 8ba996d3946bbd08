use crate::{identity::IdentityError, profile::ProfileError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures of the signup and login flows, mapped to a fixed status each.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    Validation,
    #[error("{0}")]
    IdentityProvider(IdentityError),
    #[error("{0}")]
    ProfileStore(ProfileError),
    /// Carries no cause; every login failure renders the same body.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::IdentityProvider(_) | Self::ProfileStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(ToSchema, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    success: bool,
    status_code: u16,
    message: String,
}

impl From<&AuthError> for ErrorBody {
    fn from(error: &AuthError) -> Self {
        Self {
            success: false,
            status_code: error.status_code().as_u16(),
            message: error.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from(&self))).into_response()
    }
}
