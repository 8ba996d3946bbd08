//! Identity provider abstraction.
//!
//! The provider is the service of record for credentials and sessions. This
//! crate only ever creates identities (signup), verifies credentials (login)
//! and lists users for diagnostics; it never mutates or deletes an identity.

pub mod supabase;

pub use self::supabase::SupabaseClient;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Email and password supplied with a single request. Never stored.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Identity as issued by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Outcome of a password sign-in. `user` may be absent even when the provider
/// answered successfully; the session is kept exactly as the provider sent it.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: Option<IdentityRecord>,
    pub session: Value,
}

/// A user from the provider's admin listing. Attributes other than `id` and
/// `email` are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider returned an unexpected response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new identity. `Ok(None)` means the provider accepted the
    /// request but did not return a user.
    async fn sign_up(&self, credentials: &Credentials)
        -> Result<Option<IdentityRecord>, IdentityError>;

    async fn sign_in_with_password(&self, credentials: &Credentials)
        -> Result<SignIn, IdentityError>;

    async fn list_users(&self) -> Result<Vec<ProviderUser>, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials::new("a@b.com", "hunter2");
        assert_eq!(credentials.password.expose_secret(), "hunter2");
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[test]
    fn provider_user_keeps_extra_attributes() -> Result<(), serde_json::Error> {
        let raw = json!({
            "id": "6f1c1a52-6f1e-4c34-9d6a-3f9a8f0c2b11",
            "email": "a@b.com",
            "role": "authenticated",
            "app_metadata": {"provider": "email"}
        });
        let user: ProviderUser = serde_json::from_value(raw.clone())?;
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
        assert_eq!(user.attributes.get("role"), Some(&json!("authenticated")));
        assert_eq!(serde_json::to_value(&user)?, raw);
        Ok(())
    }
}
