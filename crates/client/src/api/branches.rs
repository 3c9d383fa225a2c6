//! Branch management endpoints under `/branches`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portico_auth::UserProfile;
use portico_core::{BranchId, RegionId};

use crate::envelope::{Paginated, PaginationParams};
use crate::error::ApiError;
use crate::gateway::HttpGateway;

/// A branch office inside a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub region_id: RegionId,
    pub region_code: String,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    pub region_id: RegionId,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Extra filters accepted by the branch list endpoint.
#[derive(Debug, Clone, Default)]
pub struct BranchListFilter {
    pub region_id: Option<RegionId>,
    pub is_active: Option<bool>,
}

pub struct BranchesApi {
    gateway: Arc<HttpGateway>,
}

impl BranchesApi {
    pub(crate) fn new(gateway: Arc<HttpGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(
        &self,
        pagination: &PaginationParams,
        filter: &BranchListFilter,
    ) -> Result<Paginated<Branch>, ApiError> {
        let mut query = pagination.to_query();
        if let Some(region_id) = filter.region_id {
            query.push(("regionId", region_id.to_string()));
        }
        if let Some(is_active) = filter.is_active {
            query.push(("isActive", is_active.to_string()));
        }
        self.gateway
            .get_with_query("/branches", &query)
            .await?
            .into_data()
    }

    pub async fn get(&self, id: BranchId) -> Result<Branch, ApiError> {
        self.gateway
            .get(&format!("/branches/{id}"))
            .await?
            .into_data()
    }

    pub async fn create(&self, request: &CreateBranchRequest) -> Result<Branch, ApiError> {
        self.gateway.post("/branches", request).await?.into_data()
    }

    pub async fn update(
        &self,
        id: BranchId,
        request: &UpdateBranchRequest,
    ) -> Result<Branch, ApiError> {
        self.gateway
            .put(&format!("/branches/{id}"), request)
            .await?
            .into_data()
    }

    pub async fn delete(&self, id: BranchId) -> Result<(), ApiError> {
        self.gateway
            .delete::<serde_json::Value>(&format!("/branches/{id}"))
            .await?
            .ensure_success()
    }

    /// Users assigned to a branch.
    pub async fn users(
        &self,
        id: BranchId,
        pagination: &PaginationParams,
    ) -> Result<Paginated<UserProfile>, ApiError> {
        self.gateway
            .get_with_query(&format!("/branches/{id}/users"), &pagination.to_query())
            .await?
            .into_data()
    }

    pub async fn activate(&self, id: BranchId) -> Result<(), ApiError> {
        self.gateway
            .put_empty::<serde_json::Value>(&format!("/branches/{id}/activate"))
            .await?
            .ensure_success()
    }

    pub async fn deactivate(&self, id: BranchId) -> Result<(), ApiError> {
        self.gateway
            .put_empty::<serde_json::Value>(&format!("/branches/{id}/deactivate"))
            .await?
            .ensure_success()
    }
}
