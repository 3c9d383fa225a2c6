//! Navigation menu endpoints under `/menus`, plus the client-side
//! permission filter for rendering a user's menu tree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use portico_auth::{UserProfile, permissions};
use portico_core::MenuItemId;

use crate::error::ApiError;
use crate::gateway::HttpGateway;

/// One node of the navigation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MenuItemId>,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub order_index: i32,
    pub is_visible: bool,
    /// Permission name required to see this entry; `None` means public.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MenuItemId>,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub order_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MenuItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}

pub struct MenusApi {
    gateway: Arc<HttpGateway>,
}

impl MenusApi {
    pub(crate) fn new(gateway: Arc<HttpGateway>) -> Self {
        Self { gateway }
    }

    /// The full menu tree (administration view).
    pub async fn structure(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.gateway.get("/menus").await?.into_data()
    }

    /// The menu tree already scoped server-side to the signed-in user.
    pub async fn user_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.gateway.get("/menus/user-menu").await?.into_data()
    }

    pub async fn get(&self, id: MenuItemId) -> Result<MenuItem, ApiError> {
        self.gateway.get(&format!("/menus/{id}")).await?.into_data()
    }

    pub async fn create(&self, request: &CreateMenuItemRequest) -> Result<MenuItem, ApiError> {
        self.gateway.post("/menus", request).await?.into_data()
    }

    pub async fn update(
        &self,
        id: MenuItemId,
        request: &UpdateMenuItemRequest,
    ) -> Result<MenuItem, ApiError> {
        self.gateway
            .put(&format!("/menus/{id}"), request)
            .await?
            .into_data()
    }

    pub async fn delete(&self, id: MenuItemId) -> Result<(), ApiError> {
        self.gateway
            .delete::<serde_json::Value>(&format!("/menus/{id}"))
            .await?
            .ensure_success()
    }
}

/// Filter a menu tree down to the entries `user` may see.
///
/// An entry survives when it is visible and its `required_permission` (if
/// any) is held; children are filtered recursively and the result is ordered
/// by `order_index`. This is display gating only; the server re-checks
/// permissions on every request.
pub fn visible_menu(user: Option<&UserProfile>, items: &[MenuItem]) -> Vec<MenuItem> {
    let mut visible: Vec<MenuItem> = items
        .iter()
        .filter(|item| item.is_visible)
        .filter(|item| match &item.required_permission {
            Some(permission) => permissions::has_permission(user, permission),
            None => true,
        })
        .map(|item| MenuItem {
            children: visible_menu(user, &item.children),
            ..item.clone()
        })
        .collect();
    visible.sort_by_key(|item| item.order_index);
    visible
}
