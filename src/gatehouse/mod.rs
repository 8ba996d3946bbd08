//! HTTP surface and signup/login coordination.

pub mod diagnostics;
pub mod error;
pub mod handlers;
pub mod health;
pub mod login;
mod openapi;
pub mod signup;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::error::AuthError;
pub use self::handlers::PublicConfig;
pub use self::openapi::openapi;

use self::{
    diagnostics::ProviderDiagnostics, health::HealthReporter, login::LoginCoordinator,
    signup::SignupCoordinator,
};
use crate::{
    identity::{Credentials, IdentityProvider},
    profile::ProfileStore,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

/// Clients the coordinators are built from. Constructed once at startup.
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub public_config: PublicConfig,
}

/// Both fields must be present and non-empty.
pub(crate) fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<Credentials, AuthError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok(Credentials::new(email, password))
        }
        _ => Err(AuthError::Validation),
    }
}

/// Build the application router with every coordinator injected.
#[must_use]
pub fn router(services: Services) -> Router {
    let signup = Arc::new(SignupCoordinator::new(
        services.identity.clone(),
        services.profiles.clone(),
    ));
    let login = Arc::new(LoginCoordinator::new(services.identity.clone()));
    let health = Arc::new(HealthReporter::new(services.profiles));
    let diagnostics = Arc::new(ProviderDiagnostics::new(services.identity));

    Router::new()
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/health", get(handlers::health))
        .route("/api/test-supabase", get(handlers::test_supabase))
        .route("/api/config", get(handlers::public_config))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(signup))
                .layer(Extension(login))
                .layer(Extension(health))
                .layer(Extension(diagnostics))
                .layer(Extension(services.public_config)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, services: Services) -> Result<()> {
    let app = router(services);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
