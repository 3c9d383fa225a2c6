//! Account endpoints under `/auth`.
//!
//! Login, registration, refresh, and logout belong to
//! [`crate::session::Session`]; this group carries the account-management
//! calls that ride the gateway like any other authenticated request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use portico_auth::UserProfile;

use crate::error::ApiError;
use crate::gateway::HttpGateway;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Partial profile update; unset fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateTokenRequest<'a> {
    token: &'a str,
}

pub struct AuthApi {
    gateway: Arc<HttpGateway>,
}

impl AuthApi {
    pub(crate) fn new(gateway: Arc<HttpGateway>) -> Self {
        Self { gateway }
    }

    /// Request a password-reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.gateway
            .post::<serde_json::Value, _>("/auth/forgot-password", &request)
            .await?
            .ensure_success()
    }

    /// Complete a password reset using the emailed token.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.gateway
            .post::<serde_json::Value, _>("/auth/reset-password", request)
            .await?
            .ensure_success()
    }

    /// Change the signed-in user's password.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        self.gateway
            .post::<serde_json::Value, _>("/auth/change-password", request)
            .await?
            .ensure_success()
    }

    /// Fetch the signed-in user's profile from the server.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.gateway.get("/auth/me").await?.into_data()
    }

    /// Update the signed-in user's profile.
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        self.gateway.put("/auth/me", request).await?.into_data()
    }

    /// Ask the server whether a token is still valid.
    pub async fn validate_token(&self, token: &str) -> Result<bool, ApiError> {
        self.gateway
            .post("/auth/validate-token", &ValidateTokenRequest { token })
            .await?
            .into_data()
    }
}
