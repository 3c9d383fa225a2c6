//! External authentication collaborator.
//!
//! The session machine talks to the backend through [`AuthBackend`] so the
//! state machine, refresher, and scheduler are testable without HTTP. The
//! production implementation speaks plain `reqwest` on purpose: these calls
//! must never pass through the gateway's 401 handling, or refresh would
//! recurse into itself.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use portico_auth::UserProfile;
use portico_core::UserId;

use crate::config::ClientConfig;
use crate::envelope::read_envelope;
use crate::error::ApiError;

/// Credentials and options for a login attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

/// Token pair plus profile returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub email: String,
    pub email_verification_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// The authentication endpoints the session machine depends on.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;

    /// Exchange a refresh token for a fresh pair.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse, ApiError>;

    /// Invalidate the session server-side. Best-effort for callers.
    async fn logout(&self, access_token: Option<&str>) -> Result<(), ApiError>;
}

/// Production [`AuthBackend`] over HTTP.
pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::unknown(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        read_envelope::<T>(response).await?.into_data()
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.post_json("/auth/register", request).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse, ApiError> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post_json("/auth/refresh-token", &request).await
    }

    async fn logout(&self, access_token: Option<&str>) -> Result<(), ApiError> {
        let url = format!("{}/auth/logout", self.base_url);
        let mut request = self.http.post(&url);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(ApiError::from_transport)?;
        read_envelope::<serde_json::Value>(response).await?.ensure_success()
    }
}
