//! Permission checks over a user profile.
//!
//! Permissions are flat opaque names (e.g. `"Users.Create"`) granted to the
//! user by the backend. Every check is fail-closed: no user means no access,
//! and an empty requirement list satisfies nothing.

use crate::user::UserProfile;

/// Check whether the user holds a specific permission.
pub fn has_permission(user: Option<&UserProfile>, permission: &str) -> bool {
    let Some(user) = user else { return false };
    user.permissions.iter().any(|p| p == permission)
}

/// Check whether the user holds at least one of the given permissions.
///
/// An empty list is never satisfied.
pub fn has_any_permission(user: Option<&UserProfile>, permissions: &[&str]) -> bool {
    let Some(user) = user else { return false };
    if permissions.is_empty() {
        return false;
    }
    permissions
        .iter()
        .any(|required| user.permissions.iter().any(|p| p == required))
}

/// Check whether the user holds every one of the given permissions.
///
/// An empty list is never satisfied.
pub fn has_all_permissions(user: Option<&UserProfile>, permissions: &[&str]) -> bool {
    let Some(user) = user else { return false };
    if permissions.is_empty() {
        return false;
    }
    permissions
        .iter()
        .all(|required| user.permissions.iter().any(|p| p == required))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::test_support::profile;
    use proptest::prelude::*;

    #[test]
    fn absent_user_has_no_permissions() {
        assert!(!has_permission(None, "Users.Read"));
        assert!(!has_any_permission(None, &["Users.Read"]));
        assert!(!has_all_permissions(None, &["Users.Read"]));
    }

    #[test]
    fn held_permission_is_found() {
        let user = profile(&[], &["Users.Read", "Users.Create"]);
        assert!(has_permission(Some(&user), "Users.Read"));
        assert!(!has_permission(Some(&user), "Users.Delete"));
    }

    #[test]
    fn any_requires_at_least_one_match() {
        let user = profile(&[], &["Regions.Read"]);
        assert!(has_any_permission(Some(&user), &["Users.Read", "Regions.Read"]));
        assert!(!has_any_permission(Some(&user), &["Users.Read", "Users.Create"]));
    }

    #[test]
    fn all_requires_every_match() {
        let user = profile(&[], &["Users.Read", "Users.Create"]);
        assert!(has_all_permissions(Some(&user), &["Users.Read", "Users.Create"]));
        assert!(!has_all_permissions(Some(&user), &["Users.Read", "Users.Delete"]));
    }

    #[test]
    fn empty_requirement_lists_are_never_satisfied() {
        let user = profile(&["Admin"], &["Users.Read"]);
        assert!(!has_any_permission(Some(&user), &[]));
        assert!(!has_all_permissions(Some(&user), &[]));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Nothing grants access to a user that is not there.
        #[test]
        fn absent_user_fails_closed_for_any_input(perm in "[A-Za-z.]{0,24}") {
            prop_assert!(!has_permission(None, &perm));
            prop_assert!(!has_any_permission(None, &[&perm]));
            prop_assert!(!has_all_permissions(None, &[&perm]));
        }
    }
}
