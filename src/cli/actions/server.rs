use crate::{
    gatehouse::{self, PublicConfig, Services},
    identity::SupabaseClient,
    profile::PgProfileStore,
};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub database_password: SecretString,
    pub supabase_url: Url,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: SecretString,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database URL is invalid, a client cannot be built, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let dsn = database_dsn(&args.database_url, &args.database_name, &args.database_password)?;

    let profiles = PgProfileStore::connect_lazy(dsn.expose_secret())
        .context("Failed to configure database pool")?;

    let identity = SupabaseClient::new(&args.supabase_url, args.supabase_service_role_key)
        .context("Failed to build identity provider client")?;

    let public_config = PublicConfig {
        supabase_url: args.supabase_url.as_str().trim_end_matches('/').to_string(),
        supabase_anon_key: args.supabase_anon_key,
    };

    debug!("Public config: {:?}", public_config);

    gatehouse::new(
        args.port,
        Services {
            identity: Arc::new(identity),
            profiles: Arc::new(profiles),
            public_config,
        },
    )
    .await
}

/// Set the database name and password on the connection string.
fn database_dsn(url: &str, name: &str, password: &SecretString) -> Result<SecretString> {
    let mut dsn = Url::parse(url).context("Invalid database URL")?;

    dsn.set_password(Some(password.expose_secret()))
        .map_err(|()| anyhow!("Error setting password"))?;

    dsn.set_path(&format!("/{name}"));

    Ok(SecretString::from(dsn.to_string()))
}
