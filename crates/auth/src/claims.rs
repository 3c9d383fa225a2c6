//! Access-token claim model (transport-agnostic).

use serde::{Deserialize, Serialize};

use portico_core::UserId;

use crate::regions::RegionGrant;

/// Claims carried by an access token, as emitted by the backend.
///
/// Only `sub` and `userId` are structurally required; everything else is
/// tolerated as absent so that [`crate::token::decode`] stays usable on
/// tokens from older backend revisions. Expiry in particular is optional;
/// the codec treats a missing `exp` as already expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject: the user's identifier.
    pub sub: UserId,

    #[serde(default)]
    pub email: String,

    /// Issued-at, seconds since the epoch.
    #[serde(default)]
    pub iat: i64,

    /// Expiry, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Token identifier (revocation handle).
    #[serde(default)]
    pub jti: String,

    /// User GUID, duplicated from `sub` by the backend.
    pub user_id: UserId,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Role names, e.g. `["Admin", "Staff"]`.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Flat permission names, e.g. `["Users.Create"]`.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Geographic access grants.
    #[serde(default)]
    pub regions: Vec<RegionGrant>,

    /// Server-side session identifier.
    #[serde(default)]
    pub session_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Bumped server-side to invalidate outstanding tokens.
    #[serde(default)]
    pub token_version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}
