//! Local profile persistence.
//!
//! A profile row shares its primary key with the provider identity that
//! authorized it. There is no update or delete path.

pub mod postgres;

pub use self::postgres::PgProfileStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, profile: NewProfile) -> Result<ProfileRecord, ProfileError>;

    /// Trivial liveness query.
    async fn ping(&self) -> Result<(), ProfileError>;
}
