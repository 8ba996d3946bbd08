use super::{
    diagnostics::ProviderStatus,
    error::ErrorBody,
    handlers::{self, health, login, public_config, signup},
};
use crate::profile::ProfileRecord;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::signup::signup,
        handlers::login::login,
        handlers::diagnostics::test_supabase,
        handlers::public_config::public_config,
    ),
    components(schemas(
        health::Health,
        signup::SignupRequest,
        signup::SignupResponse,
        login::LoginRequest,
        login::LoginResponse,
        login::LoginUser,
        public_config::PublicConfig,
        ProviderStatus,
        ProfileRecord,
        ErrorBody,
    )),
    tags(
        (name = "auth", description = "Signup and login against the identity provider"),
        (name = "health", description = "Liveness of the profile store"),
        (name = "diagnostics", description = "Identity provider connectivity"),
        (name = "config", description = "Public client settings"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
