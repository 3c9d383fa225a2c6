//! Region management endpoints under `/regions`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portico_auth::UserProfile;
use portico_core::{RegionId, UserId};

use crate::api::branches::Branch;
use crate::envelope::{Paginated, PaginationParams};
use crate::error::ApiError;
use crate::gateway::HttpGateway;

/// A geographic region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionId,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_count: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
}

/// Shorthand reference to the creating user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBy {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegionRequest {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Extra filters accepted by the region list endpoint.
#[derive(Debug, Clone, Default)]
pub struct RegionListFilter {
    pub is_active: Option<bool>,
}

pub struct RegionsApi {
    gateway: Arc<HttpGateway>,
}

impl RegionsApi {
    pub(crate) fn new(gateway: Arc<HttpGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(
        &self,
        pagination: &PaginationParams,
        filter: &RegionListFilter,
    ) -> Result<Paginated<Region>, ApiError> {
        let mut query = pagination.to_query();
        if let Some(is_active) = filter.is_active {
            query.push(("isActive", is_active.to_string()));
        }
        self.gateway
            .get_with_query("/regions", &query)
            .await?
            .into_data()
    }

    pub async fn get(&self, id: RegionId) -> Result<Region, ApiError> {
        self.gateway
            .get(&format!("/regions/{id}"))
            .await?
            .into_data()
    }

    pub async fn create(&self, request: &CreateRegionRequest) -> Result<Region, ApiError> {
        self.gateway.post("/regions", request).await?.into_data()
    }

    pub async fn update(
        &self,
        id: RegionId,
        request: &UpdateRegionRequest,
    ) -> Result<Region, ApiError> {
        self.gateway
            .put(&format!("/regions/{id}"), request)
            .await?
            .into_data()
    }

    pub async fn delete(&self, id: RegionId) -> Result<(), ApiError> {
        self.gateway
            .delete::<serde_json::Value>(&format!("/regions/{id}"))
            .await?
            .ensure_success()
    }

    /// Branches belonging to a region.
    pub async fn branches(
        &self,
        id: RegionId,
        pagination: &PaginationParams,
    ) -> Result<Paginated<Branch>, ApiError> {
        self.gateway
            .get_with_query(&format!("/regions/{id}/branches"), &pagination.to_query())
            .await?
            .into_data()
    }

    /// Users assigned to a region.
    pub async fn users(
        &self,
        id: RegionId,
        pagination: &PaginationParams,
    ) -> Result<Paginated<UserProfile>, ApiError> {
        self.gateway
            .get_with_query(&format!("/regions/{id}/users"), &pagination.to_query())
            .await?
            .into_data()
    }

    pub async fn activate(&self, id: RegionId) -> Result<(), ApiError> {
        self.gateway
            .put_empty::<serde_json::Value>(&format!("/regions/{id}/activate"))
            .await?
            .ensure_success()
    }

    pub async fn deactivate(&self, id: RegionId) -> Result<(), ApiError> {
        self.gateway
            .put_empty::<serde_json::Value>(&format!("/regions/{id}/deactivate"))
            .await?
            .ensure_success()
    }
}
