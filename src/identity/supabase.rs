//! Supabase (GoTrue) REST client.
//!
//! Requests are authenticated with the service role key, sent both as the
//! `apikey` header and as a bearer token. The client never refreshes or
//! persists sessions.

use super::{
    Credentials, IdentityError, IdentityProvider, IdentityRecord, ProviderUser, SignIn,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

#[derive(Debug)]
pub struct SupabaseClient {
    base_url: String,
    service_role_key: SecretString,
    client: Client,
}

#[derive(Deserialize)]
struct GoTrueUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<GoTrueUser> for IdentityRecord {
    fn from(user: GoTrueUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Deserialize)]
struct UserList {
    users: Vec<ProviderUser>,
}

impl SupabaseClient {
    /// Build a client for the project at `url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: &Url, service_role_key: SecretString) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            service_role_key,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let key = self.service_role_key.expose_secret();
        self.client
            .post(self.endpoint(path))
            .header("apikey", key)
            .bearer_auth(key)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    #[instrument(skip(self, credentials))]
    async fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<IdentityRecord>, IdentityError> {
        let response = self
            .post("signup")
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await?;

        let body = read_json(response).await?;

        // With auto-confirm enabled the provider answers with a session that
        // wraps the user; otherwise the body is the user itself.
        let user = if body.get("access_token").is_some() {
            body.get("user").cloned()
        } else {
            Some(body)
        };

        user.map(parse_user).transpose().map(Option::flatten)
    }

    #[instrument(skip(self, credentials))]
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<SignIn, IdentityError> {
        let response = self
            .post("token?grant_type=password")
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await?;

        let session = read_json(response).await?;
        let user = match session.get("user") {
            Some(user) => parse_user(user.clone())?,
            None => None,
        };

        Ok(SignIn { user, session })
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<ProviderUser>, IdentityError> {
        let key = self.service_role_key.expose_secret();
        let response = self
            .client
            .get(self.endpoint("admin/users"))
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await?;

        let body = read_json(response).await?;
        let list: UserList = serde_json::from_value(body)
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        debug!("provider returned {} users", list.users.len());

        Ok(list.users)
    }
}

/// A JSON object without an `id` is treated as "no user".
fn parse_user(value: Value) -> Result<Option<IdentityRecord>, IdentityError> {
    if value.get("id").map_or(true, Value::is_null) {
        return Ok(None);
    }

    serde_json::from_value::<GoTrueUser>(value)
        .map(|user| Some(user.into()))
        .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
}

async fn read_json(response: Response) -> Result<Value, IdentityError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body: Option<Value> = serde_json::from_slice(&bytes).ok();

    if !status.is_success() {
        let message = body
            .as_ref()
            .and_then(error_message)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| format!("identity provider returned {status}"));

        debug!(status = status.as_u16(), %message, "identity provider rejected request");

        return Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    body.ok_or_else(|| IdentityError::InvalidResponse("body is not JSON".to_string()))
}

/// GoTrue has used several field names for error text across versions.
fn error_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "6f1c1a52-6f1e-4c34-9d6a-3f9a8f0c2b11";

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(server: &MockServer) -> Result<SupabaseClient> {
        let url = Url::parse(&server.uri())?;
        Ok(SupabaseClient::new(
            &url,
            SecretString::from("service-key".to_string()),
        )?)
    }

    #[test]
    fn error_message_prefers_msg() {
        let body = json!({"msg": "User already registered", "error": "conflict"});
        assert_eq!(
            error_message(&body),
            Some("User already registered".to_string())
        );
        assert_eq!(
            error_message(&json!({"error_description": "Invalid login credentials"})),
            Some("Invalid login credentials".to_string())
        );
        assert_eq!(error_message(&json!({"code": 400})), None);
    }

    #[test]
    fn parse_user_without_id_is_none() -> Result<()> {
        assert!(parse_user(json!({"email": "a@b.com"}))?.is_none());
        assert!(parse_user(json!({"id": null}))?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_returns_plain_user() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(header("apikey", "service-key"))
            .and(header("Authorization", "Bearer service-key"))
            .and(body_json(json!({"email": "a@b.com", "password": "x"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID, "email": "a@b.com"})),
            )
            .mount(&server)
            .await;

        let identity = client(&server)?
            .sign_up(&Credentials::new("a@b.com", "x"))
            .await?;

        assert_eq!(
            identity,
            Some(IdentityRecord {
                id: Uuid::parse_str(USER_ID)?,
                email: Some("a@b.com".to_string()),
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_unwraps_auto_confirmed_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt",
                "refresh_token": "refresh",
                "user": {"id": USER_ID, "email": "a@b.com"}
            })))
            .mount(&server)
            .await;

        let identity = client(&server)?
            .sign_up(&Credentials::new("a@b.com", "x"))
            .await?;

        assert_eq!(identity.map(|i| i.id), Some(Uuid::parse_str(USER_ID)?));
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_rejection_carries_provider_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({"msg": "User already registered"})),
            )
            .mount(&server)
            .await;

        let result = client(&server)?
            .sign_up(&Credentials::new("a@b.com", "x"))
            .await;

        match result {
            Err(IdentityError::Rejected { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "User already registered");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_keeps_session_untouched() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let session = json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {"id": USER_ID, "email": "a@b.com", "role": "authenticated"}
        });

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session.clone()))
            .mount(&server)
            .await;

        let sign_in = client(&server)?
            .sign_in_with_password(&Credentials::new("a@b.com", "x"))
            .await?;

        assert_eq!(sign_in.session, session);
        assert_eq!(
            sign_in.user.and_then(|u| u.email),
            Some("a@b.com".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_rejects_wrong_password() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let result = client(&server)?
            .sign_in_with_password(&Credentials::new("a@b.com", "wrong"))
            .await;

        match result {
            Err(IdentityError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_user_without_email() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt",
                "user": {"id": USER_ID, "phone": "15550100"}
            })))
            .mount(&server)
            .await;

        let sign_in = client(&server)?
            .sign_in_with_password(&Credentials::new("+15550100", "x"))
            .await?;

        assert_eq!(
            sign_in.user,
            Some(IdentityRecord {
                id: Uuid::parse_str(USER_ID)?,
                email: None,
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn list_users_reads_admin_listing() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/admin/users"))
            .and(header("Authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aud": "authenticated",
                "users": [{"id": USER_ID, "email": "a@b.com"}]
            })))
            .mount(&server)
            .await;

        let users = client(&server)?.list_users().await?;

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email.as_deref(), Some("a@b.com"));
        Ok(())
    }

    #[tokio::test]
    async fn non_json_success_is_invalid_response() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/admin/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = client(&server)?.list_users().await;
        assert!(matches!(result, Err(IdentityError::InvalidResponse(_))));
        Ok(())
    }
}
