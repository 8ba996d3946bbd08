//! Maps validated command-line arguments to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{database, identity, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let database_opts = database::Options::parse(matches)?;
    let identity_opts = identity::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        database_url: database_opts.url,
        database_name: database_opts.name,
        database_password: database_opts.password,
        supabase_url: identity_opts.url,
        supabase_anon_key: identity_opts.anon_key,
        supabase_service_role_key: identity_opts.service_role_key,
    }))
}
