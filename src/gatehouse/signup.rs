//! Signup coordination.
//!
//! Signup is a two-step write across two systems: the identity is created in
//! the provider first, then a profile row keyed by the identity id is inserted
//! locally. The steps are not atomic. When the insert fails the provider
//! identity is left in place (an orphaned identity); no compensating delete is
//! attempted.

use super::{require_credentials, AuthError};
use crate::{
    identity::{IdentityError, IdentityProvider},
    profile::{NewProfile, ProfileRecord, ProfileStore},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct SignupCoordinator {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl SignupCoordinator {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Create the provider identity, then its profile.
    ///
    /// # Errors
    /// - `AuthError::Validation` if email or password is missing or empty.
    /// - `AuthError::IdentityProvider` if the provider fails or returns no usable user.
    /// - `AuthError::ProfileStore` if the profile insert fails.
    #[instrument(skip_all)]
    pub async fn signup(
        &self,
        email: Option<String>,
        password: Option<String>,
        name: Option<String>,
    ) -> Result<ProfileRecord, AuthError> {
        let credentials = require_credentials(email, password)?;

        let identity = match self.identity.sign_up(&credentials).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                error!("Identity provider accepted signup but returned no user");
                return Err(AuthError::IdentityProvider(IdentityError::InvalidResponse(
                    "user creation failed".to_string(),
                )));
            }
            Err(e) => {
                error!("Error creating identity: {}", e);
                return Err(AuthError::IdentityProvider(e));
            }
        };

        let identity_id = identity.id;
        let Some(email) = identity.email.filter(|email| !email.is_empty()) else {
            error!(identity.id = %identity_id, "Identity provider returned a user without an email");
            return Err(AuthError::IdentityProvider(IdentityError::InvalidResponse(
                "user has no email".to_string(),
            )));
        };

        let profile = NewProfile {
            id: identity_id,
            email,
            name: name.filter(|name| !name.is_empty()),
        };

        match self.profiles.create_profile(profile).await {
            Ok(record) => {
                info!(user.id = %record.id, "User signed up");
                Ok(record)
            }
            Err(e) => {
                warn!(
                    identity.id = %identity_id,
                    "Profile creation failed, identity left without a profile: {}", e
                );
                Err(AuthError::ProfileStore(e))
            }
        }
    }
}
