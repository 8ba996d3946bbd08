use crate::identity::{IdentityProvider, ProviderUser};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, instrument};
use utoipa::ToSchema;

/// Result of listing users through the identity provider's admin API.
#[derive(ToSchema, Serialize, Debug)]
#[serde(untagged)]
pub enum ProviderStatus {
    Connected {
        success: bool,
        message: String,
        #[serde(rename = "userCount")]
        user_count: usize,
        #[schema(value_type = Vec<Object>)]
        users: Vec<ProviderUser>,
    },
    Failed {
        success: bool,
        error: String,
    },
}

pub struct ProviderDiagnostics {
    identity: Arc<dyn IdentityProvider>,
}

impl ProviderDiagnostics {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// List provider users. Failures are reported in the returned value.
    #[instrument(skip_all)]
    pub async fn provider_status(&self) -> ProviderStatus {
        match self.identity.list_users().await {
            Ok(users) => ProviderStatus::Connected {
                success: true,
                message: "Supabase connection working!".to_string(),
                user_count: users.len(),
                users,
            },
            Err(e) => {
                error!("Failed to list identity provider users: {}", e);

                ProviderStatus::Failed {
                    success: false,
                    error: e.to_string(),
                }
            }
        }
    }
}
