//! # Gatehouse
//!
//! `gatehouse` fronts a hosted identity provider (Supabase/GoTrue) and keeps a
//! local profile row for every user that signs up.
//!
//! ## Signup
//!
//! Signup is a two-step write: the identity is created in the provider, then a
//! profile row keyed by the provider's user id is inserted into Postgres. The
//! two writes are not atomic. If the insert fails the identity stays in the
//! provider without a profile (an *orphaned identity*); nothing is rolled back.
//!
//! ## Login
//!
//! Credentials are checked by the provider. Every failure is reported as the
//! same `401 Invalid credentials` so callers cannot enumerate accounts. The
//! provider session is returned untouched.
//!
//! ## Health
//!
//! `/api/health` always answers `200`; a broken database is reported in the body.

pub mod cli;
pub mod gatehouse;
pub mod identity;
pub mod profile;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
