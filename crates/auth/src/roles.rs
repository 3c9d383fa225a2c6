//! Role checks and the fixed role hierarchy.
//!
//! Levels are coarse precedence weights: a higher number outranks a lower
//! one. Role names absent from the table weigh zero, so unknown roles grant
//! nothing.

use crate::user::{Role, UserProfile};

/// Role precedence table, strongest first.
pub const ROLE_HIERARCHY: &[(&str, u8)] = &[
    ("SuperAdmin", 100),
    ("Admin", 90),
    ("RegionalManager", 80),
    ("BranchManager", 70),
    ("Supervisor", 60),
    ("Staff", 50),
    ("User", 40),
    ("Guest", 10),
];

/// Precedence level of a role name (0 for unknown roles).
pub fn role_level(name: &str) -> u8 {
    ROLE_HIERARCHY
        .iter()
        .find(|(role, _)| *role == name)
        .map(|(_, level)| *level)
        .unwrap_or(0)
}

/// The user's effective level: the highest level among their roles.
pub fn user_role_level(user: Option<&UserProfile>) -> u8 {
    let Some(user) = user else { return 0 };
    user.roles
        .iter()
        .map(|role| role_level(&role.name))
        .max()
        .unwrap_or(0)
}

/// Check whether the user holds a role by exact name.
pub fn has_role(user: Option<&UserProfile>, name: &str) -> bool {
    let Some(user) = user else { return false };
    user.roles.iter().any(|role| role.name == name)
}

/// Check whether the user holds at least one of the given roles.
///
/// An empty list is never satisfied.
pub fn has_any_role(user: Option<&UserProfile>, names: &[&str]) -> bool {
    let Some(user) = user else { return false };
    if names.is_empty() {
        return false;
    }
    names
        .iter()
        .any(|name| user.roles.iter().any(|role| role.name == *name))
}

/// Check whether the user holds every one of the given roles.
///
/// An empty list is never satisfied.
pub fn has_all_roles(user: Option<&UserProfile>, names: &[&str]) -> bool {
    let Some(user) = user else { return false };
    if names.is_empty() {
        return false;
    }
    names
        .iter()
        .all(|name| user.roles.iter().any(|role| role.name == *name))
}

/// Check whether the user's effective level reaches `required_level`.
pub fn can_access_level(user: Option<&UserProfile>, required_level: u8) -> bool {
    user_role_level(user) >= required_level
}

/// Check whether `user` strictly outranks `other`.
pub fn has_higher_role(user: Option<&UserProfile>, other: Option<&UserProfile>) -> bool {
    user_role_level(user) > user_role_level(other)
}

/// Name of the user's highest-ranked role.
///
/// Roles outside the hierarchy never win; a user with only unknown roles has
/// no highest role.
pub fn highest_role_name(user: Option<&UserProfile>) -> Option<&str> {
    let user = user?;
    let mut best: Option<&str> = None;
    let mut best_level = 0;
    for role in &user.roles {
        let level = role_level(&role.name);
        if level > best_level {
            best_level = level;
            best = Some(role.name.as_str());
        }
    }
    best
}

/// Check whether the user is an administrator.
pub fn is_admin(user: Option<&UserProfile>) -> bool {
    has_role(user, "Admin")
}

/// Check whether the user is a super administrator.
///
/// Plain administrators are accepted here as well: they hold every
/// permission in practice.
pub fn is_super_admin(user: Option<&UserProfile>) -> bool {
    has_role(user, "SuperAdmin") || has_role(user, "Admin")
}

/// Human-readable role list for display.
pub fn format_roles(roles: &[Role]) -> String {
    match roles {
        [] => "No roles".to_string(),
        [only] => only.name.clone(),
        many => many
            .iter()
            .map(|role| role.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
