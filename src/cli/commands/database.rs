use anyhow::{Context, Result};
use clap::{builder::NonEmptyStringValueParser, Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_DATABASE_URL: &str = "database-url";
pub const ARG_DATABASE_NAME: &str = "database-name";
pub const ARG_DATABASE_PASSWORD: &str = "database-password";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DATABASE_URL)
                .long(ARG_DATABASE_URL)
                .help("Postgres connection string")
                .long_help(
                    "Postgres connection string. The database name and password are replaced by --database-name and --database-password.",
                )
                .env("DATABASE_URL")
                .required(true)
                .value_parser(NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new(ARG_DATABASE_NAME)
                .long(ARG_DATABASE_NAME)
                .help("Postgres database name")
                .env("DATABASE_NAME")
                .required(true)
                .value_parser(NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new(ARG_DATABASE_PASSWORD)
                .long(ARG_DATABASE_PASSWORD)
                .help("Postgres password")
                .env("DATABASE_PASSWORD")
                .hide_env_values(true)
                .required(true)
                .value_parser(NonEmptyStringValueParser::new()),
        )
}

#[derive(Debug)]
pub struct Options {
    pub url: String,
    pub name: String,
    pub password: SecretString,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_DATABASE_URL)
            .cloned()
            .context("missing required argument: --database-url")?;
        let name = matches
            .get_one::<String>(ARG_DATABASE_NAME)
            .cloned()
            .context("missing required argument: --database-name")?;
        let password = matches
            .get_one::<String>(ARG_DATABASE_PASSWORD)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --database-password")?;

        Ok(Self {
            url,
            name,
            password,
        })
    }
}
