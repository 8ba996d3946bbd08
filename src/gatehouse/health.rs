use crate::profile::ProfileStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Error,
}

impl HealthStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub database_connected: bool,
    /// Store error text when the ping failed.
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct HealthReporter {
    profiles: Arc<dyn ProfileStore>,
}

impl HealthReporter {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    /// Ping the profile store. Never fails; a broken store is reported in
    /// the returned value.
    #[instrument(skip_all)]
    pub async fn health_check(&self) -> HealthReport {
        match self.profiles.ping().await {
            Ok(()) => {
                debug!("Database connection is healthy");

                HealthReport {
                    status: HealthStatus::Ok,
                    database_connected: true,
                    message: None,
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                error!("Failed to ping database: {}", e);

                HealthReport {
                    status: HealthStatus::Error,
                    database_connected: false,
                    message: Some(e.to_string()),
                    timestamp: Utc::now(),
                }
            }
        }
    }
}
