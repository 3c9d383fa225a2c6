//! Response envelope and pagination contract.
//!
//! Every endpoint answers with the same `{success, data?, message?, error?}`
//! wrapper; list endpoints add the pagination block. The helpers here unwrap
//! that wrapper into `Result`s carrying the classified error taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use portico_core::DomainError;

use crate::error::ApiError;

/// Standard wrapper every API response arrives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    // No `default` here: it would put a `Default` bound on `T` in the
    // derived impl, and missing optional fields read as `None` anyway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// Server-provided error block inside an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Failed envelope carrying an error block.
    pub fn err(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(ApiErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            }),
        }
    }

    /// Unwrap the payload of a successful envelope.
    ///
    /// Anything else (failure flag, missing payload) becomes an error carrying
    /// the server's message where one exists.
    pub fn into_data(self) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(envelope_error(self.error)),
        }
    }

    /// Accept a successful envelope that carries no payload.
    pub fn ensure_success(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(envelope_error(self.error))
        }
    }
}

fn envelope_error(error: Option<ApiErrorBody>) -> ApiError {
    match error {
        Some(body) => ApiError::Unknown {
            message: body.message,
            details: body.details,
        },
        None => ApiError::unknown("Invalid API response"),
    }
}

/// Read a response body as an envelope, classifying failures.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<T>, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(ApiError::from_transport)?;

    if !status.is_success() {
        let error = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.error);
        return Err(ApiError::from_status(status.as_u16(), error));
    }

    serde_json::from_str(&body).map_err(|err| {
        tracing::debug!("response body did not match the expected shape: {err}");
        ApiError::unknown("Invalid API response")
    })
}

/// Sort direction accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::validation(format!(
                "sort order must be 'asc' or 'desc', got '{other}'"
            ))),
        }
    }
}

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
}

impl PaginationParams {
    /// Parameters for a specific page with everything else unset.
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Render set fields as wire query pairs.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            query.push(("sortBy", sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            query.push(("sortOrder", order.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}

/// Pagination block returned alongside list items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of a list endpoint's results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}
