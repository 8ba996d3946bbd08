use crate::gatehouse::diagnostics::{ProviderDiagnostics, ProviderStatus};
use axum::{extract::Extension, Json};
use std::sync::Arc;

#[utoipa::path(
    get,
    path= "/api/test-supabase",
    responses (
        (status = 200, description = "Provider reachability; failures are reported in the body", body = ProviderStatus),
    ),
    tag= "diagnostics"
)]
pub async fn test_supabase(diagnostics: Extension<Arc<ProviderDiagnostics>>) -> Json<ProviderStatus> {
    Json(diagnostics.provider_status().await)
}
