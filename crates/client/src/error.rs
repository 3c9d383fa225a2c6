//! Error taxonomy for API calls.
//!
//! Every failure is classified into exactly one [`ApiError`] kind before it
//! reaches application code; raw transport errors never escape the gateway.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::envelope::ApiErrorBody;

/// Classified API failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication is missing, expired, or was rejected.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Authenticated but not allowed to perform the operation.
    #[error("forbidden: {message}")]
    Forbidden {
        message: String,
        details: Option<Value>,
    },

    #[error("not found: {message}")]
    NotFound {
        message: String,
        details: Option<Value>,
    },

    /// The request payload failed server-side validation.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// The server failed with a 5xx status.
    #[error("server error ({status}): {message}")]
    Server {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// The request never produced a response.
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Anything that fits no other kind, preserving the server's message.
    #[error("unexpected error: {message}")]
    Unknown {
        message: String,
        details: Option<Value>,
    },
}

/// Discriminant of [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Server,
    Network,
    Timeout,
    Unknown,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
            details: None,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Unauthorized { .. } => ApiErrorKind::Unauthorized,
            Self::Forbidden { .. } => ApiErrorKind::Forbidden,
            Self::NotFound { .. } => ApiErrorKind::NotFound,
            Self::Validation { .. } => ApiErrorKind::Validation,
            Self::Server { .. } => ApiErrorKind::Server,
            Self::Network { .. } => ApiErrorKind::Network,
            Self::Timeout { .. } => ApiErrorKind::Timeout,
            Self::Unknown { .. } => ApiErrorKind::Unknown,
        }
    }

    /// The raw message, usually as the server sent it.
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message, .. }
            | Self::NotFound { message, .. }
            | Self::Validation { message, .. }
            | Self::Server { message, .. }
            | Self::Network { message }
            | Self::Timeout { message }
            | Self::Unknown { message, .. } => message,
        }
    }

    /// Structured detail payload the server attached, if any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Forbidden { details, .. }
            | Self::NotFound { details, .. }
            | Self::Validation { details, .. }
            | Self::Server { details, .. }
            | Self::Unknown { details, .. } => details.as_ref(),
            Self::Unauthorized { .. } | Self::Network { .. } | Self::Timeout { .. } => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ApiErrorKind::Unauthorized
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ApiErrorKind::Validation
    }

    /// Human-readable message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Forbidden { .. } => "You don't have permission to perform this action.".to_string(),
            Self::NotFound { .. } => "The requested resource was not found.".to_string(),
            Self::Validation { message, .. } => {
                if message.is_empty() {
                    "Please check your input and try again.".to_string()
                } else {
                    message.clone()
                }
            }
            Self::Server { .. } => "Server error. Please try again later.".to_string(),
            Self::Network { .. } => "Network error. Please check your connection.".to_string(),
            Self::Timeout { .. } => "Request timeout. Please try again.".to_string(),
            Self::Unknown { message, .. } => {
                if message.is_empty() {
                    "An unexpected error occurred.".to_string()
                } else {
                    message.clone()
                }
            }
        }
    }

    /// Field-level validation messages for form binding.
    ///
    /// Only present on [`ApiError::Validation`] whose details are a flat
    /// field-to-message object.
    pub fn validation_details(&self) -> Option<HashMap<String, String>> {
        match self {
            Self::Validation {
                details: Some(details),
                ..
            } => serde_json::from_value(details.clone()).ok(),
            _ => None,
        }
    }

    /// Classify a non-success HTTP status plus the server's error block.
    pub(crate) fn from_status(status: u16, body: Option<ApiErrorBody>) -> Self {
        let (message, details) = match body {
            Some(body) => (Some(body.message), body.details),
            None => (None, None),
        };
        let message = |fallback: &str| message.clone().unwrap_or_else(|| fallback.to_string());

        match status {
            401 => Self::Unauthorized {
                message: message("Authentication required"),
            },
            403 => Self::Forbidden {
                message: message("You don't have permission to access this resource"),
                details,
            },
            404 => Self::NotFound {
                message: message("Resource not found"),
                details,
            },
            422 => Self::Validation {
                message: message("Validation error"),
                details,
            },
            500..=599 => Self::Server {
                status,
                message: message("Server error. Please try again later."),
                details,
            },
            _ => Self::Unknown {
                message: message("An unexpected error occurred"),
                details,
            },
        }
    }

    /// Classify a transport-level failure (no HTTP response was produced).
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::debug!("request timed out: {err}");
            Self::Timeout {
                message: "Request timeout. Please try again.".to_string(),
            }
        } else {
            tracing::debug!("network failure: {err}");
            Self::Network {
                message: "Network error. Please check your connection.".to_string(),
            }
        }
    }
}
