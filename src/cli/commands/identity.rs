use anyhow::{Context, Result};
use clap::{builder::NonEmptyStringValueParser, Arg, ArgMatches, Command};
use secrecy::SecretString;
use url::Url;

pub const ARG_SUPABASE_URL: &str = "supabase-url";
pub const ARG_SUPABASE_ANON_KEY: &str = "supabase-anon-key";
pub const ARG_SUPABASE_SERVICE_ROLE_KEY: &str = "supabase-service-role-key";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SUPABASE_URL)
                .long(ARG_SUPABASE_URL)
                .help("Identity provider (Supabase) project URL, example: https://<project>.supabase.co")
                .env("SUPABASE_URL")
                .required(true)
                .value_parser(clap::value_parser!(Url)),
        )
        .arg(
            Arg::new(ARG_SUPABASE_ANON_KEY)
                .long(ARG_SUPABASE_ANON_KEY)
                .help("Identity provider public (anon) key, handed to browser clients")
                .env("SUPABASE_ANON_KEY")
                .required(true)
                .value_parser(NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new(ARG_SUPABASE_SERVICE_ROLE_KEY)
                .long(ARG_SUPABASE_SERVICE_ROLE_KEY)
                .help("Identity provider service role key, used for all server-side calls")
                .env("SUPABASE_SERVICE_ROLE_KEY")
                .hide_env_values(true)
                .required(true)
                .value_parser(NonEmptyStringValueParser::new()),
        )
}

#[derive(Debug)]
pub struct Options {
    pub url: Url,
    pub anon_key: String,
    pub service_role_key: SecretString,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<Url>(ARG_SUPABASE_URL)
            .cloned()
            .context("missing required argument: --supabase-url")?;
        let anon_key = matches
            .get_one::<String>(ARG_SUPABASE_ANON_KEY)
            .cloned()
            .context("missing required argument: --supabase-anon-key")?;
        let service_role_key = matches
            .get_one::<String>(ARG_SUPABASE_SERVICE_ROLE_KEY)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --supabase-service-role-key")?;

        Ok(Self {
            url,
            anon_key,
            service_role_key,
        })
    }
}
