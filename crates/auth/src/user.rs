//! Authenticated user profile as served by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portico_core::{RoleId, UserId};

use crate::regions::RegionGrant;

/// A role assigned to a user.
///
/// Role names (not IDs) drive access decisions; see [`crate::roles`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Full user profile.
///
/// `permissions` carries flat permission names (e.g. `"Users.Create"`);
/// `regions` carries the geographic access grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub is_email_verified: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub regions: Vec<RegionGrant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::profile;

    #[test]
    fn profile_round_trips_camel_case_wire_shape() {
        let user = profile(&["Admin"], &["Users.Read"]);
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("firstName").is_some());
        assert!(json.get("isEmailVerified").is_some());
        assert!(json.get("phoneNumber").is_none());

        let back: super::UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let user = profile(&[], &[]);
        assert_eq!(user.full_name(), "Jordan Reyes");
    }
}
