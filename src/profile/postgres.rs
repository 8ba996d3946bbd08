use super::{NewProfile, ProfileError, ProfileRecord, ProfileStore};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tracing::{info_span, instrument, Instrument};

#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a store whose pool connects on first use, so the service can
    /// start (and report unhealthy) while the database is unreachable.
    ///
    /// # Errors
    /// Returns an error if the DSN cannot be parsed.
    pub fn connect_lazy(dsn: &str) -> Result<Self, ProfileError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .acquire_timeout(Duration::from_secs(5))
            .test_before_acquire(true)
            .connect_lazy(dsn)?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    #[instrument(skip(self, profile), fields(profile.id = %profile.id))]
    async fn create_profile(&self, profile: NewProfile) -> Result<ProfileRecord, ProfileError> {
        let query = "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) RETURNING id, email, name";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );

        let row = sqlx::query(query)
            .bind(profile.id)
            .bind(&profile.email)
            .bind(&profile.name)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;

        Ok(ProfileRecord {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
        })
    }

    async fn ping(&self) -> Result<(), ProfileError> {
        let query = "SELECT 1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );

        sqlx::query(query)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use uuid::Uuid;

    // Nothing listens on port 1, so every query fails fast with an I/O error.
    const UNREACHABLE_DSN: &str = "postgres://gatehouse@127.0.0.1:1/gatehouse";

    fn unreachable_store() -> Result<PgProfileStore> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy(UNREACHABLE_DSN)?;
        Ok(PgProfileStore::new(pool))
    }

    #[tokio::test]
    async fn connect_lazy_rejects_malformed_dsn() {
        assert!(PgProfileStore::connect_lazy("not a dsn").is_err());
    }

    #[tokio::test]
    async fn ping_fails_when_database_is_down() -> Result<()> {
        let store = unreachable_store()?;
        assert!(store.ping().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn create_profile_fails_when_database_is_down() -> Result<()> {
        let store = unreachable_store()?;
        let result = store
            .create_profile(NewProfile {
                id: Uuid::new_v4(),
                email: "a@b.com".to_string(),
                name: None,
            })
            .await;
        assert!(matches!(result, Err(ProfileError::Database(_))));
        Ok(())
    }
}
