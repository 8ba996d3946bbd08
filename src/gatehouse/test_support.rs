//! In-memory providers for coordinator and router tests.

use crate::{
    identity::{Credentials, IdentityError, IdentityProvider, IdentityRecord, ProviderUser, SignIn},
    profile::{NewProfile, ProfileError, ProfileRecord, ProfileStore},
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, PoisonError,
};
use uuid::Uuid;

pub const USER_ID: &str = "6f1c1a52-6f1e-4c34-9d6a-3f9a8f0c2b11";

pub fn user_id() -> Uuid {
    Uuid::parse_str(USER_ID).unwrap_or_default()
}

pub fn identity(email: &str) -> IdentityRecord {
    IdentityRecord {
        id: user_id(),
        email: Some(email.to_string()),
    }
}

pub fn session() -> Value {
    json!({
        "access_token": "jwt",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_700_000_000,
        "refresh_token": "refresh",
        "user": {"id": USER_ID, "email": "a@b.com"}
    })
}

#[derive(Default)]
pub struct FakeIdentityProvider {
    /// Returned by `sign_up` unless `sign_up_error` is set.
    pub issued: Option<IdentityRecord>,
    pub sign_up_error: Option<String>,
    /// `None` rejects the sign-in.
    pub sign_in: Option<SignIn>,
    /// `None` fails the listing.
    pub users: Option<Vec<ProviderUser>>,
    /// Every identity this fake has created.
    pub identities: Mutex<Vec<IdentityRecord>>,
    pub calls: AtomicUsize,
}

impl FakeIdentityProvider {
    pub fn issuing(identity: IdentityRecord) -> Self {
        Self {
            issued: Some(identity),
            ..Self::default()
        }
    }

    pub fn signing_in(sign_in: SignIn) -> Self {
        Self {
            sign_in: Some(sign_in),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn identities(&self) -> Vec<IdentityRecord> {
        self.identities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_up(
        &self,
        _credentials: &Credentials,
    ) -> Result<Option<IdentityRecord>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.sign_up_error {
            return Err(IdentityError::Rejected {
                status: 422,
                message: message.clone(),
            });
        }

        if let Some(identity) = &self.issued {
            self.identities
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(identity.clone());
        }

        Ok(self.issued.clone())
    }

    async fn sign_in_with_password(
        &self,
        _credentials: &Credentials,
    ) -> Result<SignIn, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.sign_in.clone().ok_or_else(|| IdentityError::Rejected {
            status: 400,
            message: "Invalid login credentials".to_string(),
        })
    }

    async fn list_users(&self) -> Result<Vec<ProviderUser>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.users.clone().ok_or_else(|| IdentityError::Rejected {
            status: 401,
            message: "Invalid API key".to_string(),
        })
    }
}

#[derive(Default)]
pub struct FakeProfileStore {
    pub fail: bool,
    pub profiles: Mutex<Vec<ProfileRecord>>,
    pub calls: AtomicUsize,
}

impl FakeProfileStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn profiles(&self) -> Vec<ProfileRecord> {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn create_profile(&self, profile: NewProfile) -> Result<ProfileRecord, ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ProfileError::Database(sqlx::Error::PoolTimedOut));
        }

        let record = ProfileRecord {
            id: profile.id,
            email: profile.email,
            name: profile.name,
        };
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());

        Ok(record)
    }

    async fn ping(&self) -> Result<(), ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ProfileError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}
