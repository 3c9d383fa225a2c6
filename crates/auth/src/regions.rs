//! Region/branch access grants and their evaluation.
//!
//! A grant scopes a user to a region and, optionally, to a subset of its
//! branches. `branches: None` is the wire sentinel for "every branch in the
//! region"; an explicit list restricts access to exactly those branches.

use serde::{Deserialize, Serialize};

use portico_core::{BranchId, RegionId};

use crate::user::UserProfile;

/// Access grant for a single region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionGrant {
    pub region_id: RegionId,
    pub region_code: String,
    pub region_name: String,

    /// `None` means all branches in the region are accessible.
    #[serde(default)]
    pub branches: Option<Vec<BranchGrant>>,
}

/// Access grant for a single branch within a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchGrant {
    pub branch_id: BranchId,
    pub branch_code: String,
    pub branch_name: String,
}

impl RegionGrant {
    /// True when the grant covers every branch in the region.
    pub fn covers_all_branches(&self) -> bool {
        self.branches.is_none()
    }

    pub fn allows_branch(&self, branch_id: BranchId) -> bool {
        match &self.branches {
            None => true,
            Some(branches) => branches.iter().any(|b| b.branch_id == branch_id),
        }
    }
}

/// Check whether the user may access the given region.
///
/// Fail-closed: an absent user can access nothing.
pub fn can_access_region(user: Option<&UserProfile>, region_id: RegionId) -> bool {
    let Some(user) = user else { return false };
    user.regions.iter().any(|r| r.region_id == region_id)
}

/// Check whether the user may access the given branch of the given region.
pub fn can_access_branch(
    user: Option<&UserProfile>,
    region_id: RegionId,
    branch_id: BranchId,
) -> bool {
    let Some(user) = user else { return false };
    user.regions
        .iter()
        .find(|r| r.region_id == region_id)
        .is_some_and(|region| region.allows_branch(branch_id))
}

/// All region IDs the user holds a grant for.
pub fn accessible_region_ids(user: Option<&UserProfile>) -> Vec<RegionId> {
    let Some(user) = user else { return Vec::new() };
    user.regions.iter().map(|r| r.region_id).collect()
}

/// All branch IDs explicitly granted to the user.
///
/// Unrestricted grants (`branches: None`) contribute no IDs here: the full
/// branch list of a region is server data this layer does not have.
pub fn accessible_branch_ids(user: Option<&UserProfile>) -> Vec<BranchId> {
    let Some(user) = user else { return Vec::new() };
    user.regions
        .iter()
        .filter_map(|r| r.branches.as_ref())
        .flatten()
        .map(|b| b.branch_id)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
