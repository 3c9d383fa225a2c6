//! User management endpoints under `/users`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use portico_auth::{BranchGrant, UserProfile};
use portico_core::{BranchId, RegionId, RoleId, UserId};

use crate::envelope::{Paginated, PaginationParams};
use crate::error::ApiError;
use crate::gateway::HttpGateway;

/// Payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role_ids: Vec<RoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_branch_assignments: Option<Vec<RegionBranchAssignment>>,
}

/// Region scope granted to a user. `branch_ids: None` serializes as `null`
/// and grants every branch in the region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBranchAssignment {
    pub region_id: RegionId,
    pub branch_ids: Option<Vec<BranchId>>,
}

/// Partial user update; unset fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Extra filters accepted by the user list endpoint.
#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    pub is_active: Option<bool>,
    pub role_id: Option<RoleId>,
}

/// One region assignment as reported back by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegionBranchAssignment {
    pub region_id: RegionId,
    pub region_code: String,
    pub region_name: String,
    #[serde(default)]
    pub branches: Option<Vec<BranchGrant>>,
    pub has_all_branches: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegionBranches {
    pub user_id: UserId,
    pub assignments: Vec<UserRegionBranchAssignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRolesRequest<'a> {
    role_ids: &'a [RoleId],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRegionsBranchesRequest<'a> {
    assignments: &'a [RegionBranchAssignment],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminResetPasswordRequest<'a> {
    new_password: &'a str,
}

pub struct UsersApi {
    gateway: Arc<HttpGateway>,
}

impl UsersApi {
    pub(crate) fn new(gateway: Arc<HttpGateway>) -> Self {
        Self { gateway }
    }

    /// List users with pagination and optional filters.
    pub async fn list(
        &self,
        pagination: &PaginationParams,
        filter: &UserListFilter,
    ) -> Result<Paginated<UserProfile>, ApiError> {
        let mut query = pagination.to_query();
        if let Some(is_active) = filter.is_active {
            query.push(("isActive", is_active.to_string()));
        }
        if let Some(role_id) = filter.role_id {
            query.push(("roleId", role_id.to_string()));
        }
        self.gateway
            .get_with_query("/users", &query)
            .await?
            .into_data()
    }

    pub async fn get(&self, id: UserId) -> Result<UserProfile, ApiError> {
        self.gateway
            .get(&format!("/users/{id}"))
            .await?
            .into_data()
    }

    pub async fn create(&self, request: &CreateUserRequest) -> Result<UserProfile, ApiError> {
        self.gateway.post("/users", request).await?.into_data()
    }

    pub async fn update(
        &self,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        self.gateway
            .put(&format!("/users/{id}"), request)
            .await?
            .into_data()
    }

    pub async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        self.gateway
            .delete::<serde_json::Value>(&format!("/users/{id}"))
            .await?
            .ensure_success()
    }

    /// Replace the user's role set.
    pub async fn assign_roles(&self, id: UserId, role_ids: &[RoleId]) -> Result<(), ApiError> {
        self.gateway
            .post::<serde_json::Value, _>(
                &format!("/users/{id}/assign-roles"),
                &AssignRolesRequest { role_ids },
            )
            .await?
            .ensure_success()
    }

    /// Replace the user's region/branch assignments.
    pub async fn assign_regions_branches(
        &self,
        id: UserId,
        assignments: &[RegionBranchAssignment],
    ) -> Result<(), ApiError> {
        self.gateway
            .post::<serde_json::Value, _>(
                &format!("/users/{id}/assign-regions-branches"),
                &AssignRegionsBranchesRequest { assignments },
            )
            .await?
            .ensure_success()
    }

    /// Current region/branch assignments of a user.
    pub async fn regions_branches(&self, id: UserId) -> Result<UserRegionBranches, ApiError> {
        self.gateway
            .get(&format!("/users/{id}/regions-branches"))
            .await?
            .into_data()
    }

    pub async fn activate(&self, id: UserId) -> Result<(), ApiError> {
        self.gateway
            .put_empty::<serde_json::Value>(&format!("/users/{id}/activate"))
            .await?
            .ensure_success()
    }

    pub async fn deactivate(&self, id: UserId) -> Result<(), ApiError> {
        self.gateway
            .put_empty::<serde_json::Value>(&format!("/users/{id}/deactivate"))
            .await?
            .ensure_success()
    }

    /// Administrative password reset for another user.
    pub async fn reset_password(&self, id: UserId, new_password: &str) -> Result<(), ApiError> {
        self.gateway
            .post::<serde_json::Value, _>(
                &format!("/users/{id}/reset-password"),
                &AdminResetPasswordRequest { new_password },
            )
            .await?
            .ensure_success()
    }

    /// Audit trail entries for a user. The entry shape is backend-defined.
    pub async fn audit_logs(
        &self,
        id: UserId,
        pagination: &PaginationParams,
    ) -> Result<Paginated<serde_json::Value>, ApiError> {
        self.gateway
            .get_with_query(&format!("/users/{id}/audit-logs"), &pagination.to_query())
            .await?
            .into_data()
    }
}
