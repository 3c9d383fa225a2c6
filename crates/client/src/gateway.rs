//! HTTP gateway with transparent re-authentication.
//!
//! Every application-level request goes through here. The gateway attaches
//! the stored bearer token, and on a 401 it refreshes the pair once and
//! resubmits the original request with the new token. A second 401, or a
//! failed refresh, propagates as a classified error.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::envelope::{ApiResponse, read_envelope};
use crate::error::ApiError;
use crate::refresh::TokenRefresher;
use crate::store::CredentialStore;

pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
    refresher: Arc<TokenRefresher>,
}

impl HttpGateway {
    pub(crate) fn new(
        config: &ClientConfig,
        store: Arc<CredentialStore>,
        refresher: Arc<TokenRefresher>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::unknown(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            store,
            refresher,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.execute(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(Method::GET, path, query, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.execute(Method::POST, path, &[], Some(to_body(body)?))
            .await
    }

    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(Method::POST, path, &[], None).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.execute(Method::PUT, path, &[], Some(to_body(body)?))
            .await
    }

    pub async fn put_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(Method::PUT, path, &[], None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.execute(Method::DELETE, path, &[], None).await
    }

    /// Liveness probe against the health endpoint. Never attaches a token.
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Send the request, re-authenticating transparently on the first 401.
    ///
    /// The body is pre-serialized so the request can be resubmitted after a
    /// refresh. A refresh failure propagates instead of the original 401 (the
    /// refresher has already torn the session down).
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let mut retried = false;
        let mut bearer = self.store.read_tokens().access_token;

        loop {
            let response = self
                .send_once(method.clone(), path, query, body.as_ref(), bearer.as_deref())
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                tracing::debug!("got 401 on {}, refreshing token and retrying", path);
                let pair = self.refresher.refresh().await?;
                bearer = Some(pair.access_token);
                continue;
            }

            return read_envelope(response).await;
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(ApiError::from_transport)
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|err| ApiError::unknown(format!("failed to serialize request body: {err}")))
}
