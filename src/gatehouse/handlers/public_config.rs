use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Settings a browser client needs to talk to the identity provider directly.
/// Only the public (anon) key belongs here; the service role key never leaves
/// the server.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

#[utoipa::path(
    get,
    path= "/api/config",
    responses (
        (status = 200, description = "Public identity provider settings", body = PublicConfig),
    ),
    tag= "config"
)]
pub async fn public_config(config: Extension<PublicConfig>) -> Json<PublicConfig> {
    Json(config.0)
}
