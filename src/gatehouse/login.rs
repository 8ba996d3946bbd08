use super::{require_credentials, AuthError};
use crate::identity::{IdentityProvider, IdentityRecord, SignIn};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: IdentityRecord,
    /// Exactly as issued by the provider.
    pub session: Value,
}

pub struct LoginCoordinator {
    identity: Arc<dyn IdentityProvider>,
}

impl LoginCoordinator {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Verify credentials with the provider.
    ///
    /// Every provider failure, including a successful answer without a user,
    /// becomes `AuthError::InvalidCredentials` so callers cannot tell an
    /// unknown email from a wrong password or an outage.
    ///
    /// # Errors
    /// `AuthError::Validation` for missing fields, otherwise `AuthError::InvalidCredentials`.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<LoginOutcome, AuthError> {
        let credentials = require_credentials(email, password)?;

        match self.identity.sign_in_with_password(&credentials).await {
            Ok(SignIn {
                user: Some(user),
                session,
            }) => {
                info!(user.id = %user.id, "User logged in");
                Ok(LoginOutcome { user, session })
            }
            Ok(SignIn { user: None, .. }) => {
                debug!("Identity provider returned a session without a user");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                debug!("Sign in rejected: {}", e);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
