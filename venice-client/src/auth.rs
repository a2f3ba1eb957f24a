//! Auth client
//!
//! Thin client for the backend's auth interface: sign-up, password
//! sign-in, sign-out, session lookup, and user-metadata updates.

use crate::rest::RestClient;
use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authenticated user as returned by the auth interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    /// Free-form metadata set at sign-up (name, role, avatar) — the
    /// fallback source for the profile-merge rule
    #[serde(default)]
    pub user_metadata: Value,
}

impl AuthUser {
    /// Read a string field out of the user metadata, if present and
    /// non-empty.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.user_metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// An auth session: access token plus the identity it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub user: AuthUser,
}

/// Client for the backend auth interface
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: &'a Value,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct MetadataUpdateRequest<'a> {
    data: &'a Value,
}

impl AuthClient {
    pub fn new(config: &ClientConfig, client: Client) -> Self {
        Self {
            client,
            base_url: format!("{}/auth/v1", config.base_url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Create a new auth identity with sign-up metadata
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &Value,
    ) -> ClientResult<AuthSession> {
        let operation = "auth_sign_up";
        let response = self
            .client
            .post(self.url("signup"))
            .header("apikey", &self.anon_key)
            .json(&SignUpRequest {
                email,
                password,
                data: metadata,
            })
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        let response = RestClient::check_status(operation, response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let operation = "auth_sign_in";
        let response = self
            .client
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&SignInRequest { email, password })
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        if response.status() == reqwest::StatusCode::BAD_REQUEST
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(ClientError::Unauthorized);
        }
        let response = RestClient::check_status(operation, response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))
    }

    /// Invalidate the backend session for this token
    pub async fn sign_out(&self, access_token: &str) -> ClientResult<()> {
        let operation = "auth_sign_out";
        let response = self
            .client
            .post(self.url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        RestClient::check_status(operation, response)
            .await
            .map(|_| ())
    }

    /// Look up the identity behind a persisted token (session restore).
    /// Returns `None` when the token is no longer valid.
    pub async fn get_user(&self, access_token: &str) -> ClientResult<Option<AuthUser>> {
        let operation = "auth_get_user";
        let response = self
            .client
            .get(self.url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let response = RestClient::check_status(operation, response).await?;
        response
            .json()
            .await
            .map(Some)
            .map_err(|e| ClientError::from_reqwest(operation, e))
    }

    /// Merge new fields into the identity's user metadata
    pub async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: &Value,
    ) -> ClientResult<()> {
        let operation = "auth_update_metadata";
        let response = self
            .client
            .put(self.url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&MetadataUpdateRequest { data: metadata })
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        RestClient::check_status(operation, response)
            .await
            .map(|_| ())
    }
}
