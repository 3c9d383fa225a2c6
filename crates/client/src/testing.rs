//! Shared fixtures for in-crate tests.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};

use portico_auth::{Role, TokenClaims, UserProfile};
use portico_core::{RoleId, UserId};

pub(crate) const JWT_SECRET: &[u8] = b"portico-test-secret";

pub(crate) fn sample_user() -> UserProfile {
    let now = Utc::now();
    UserProfile {
        id: UserId::new(),
        email: "jordan.reyes@example.com".to_string(),
        first_name: "Jordan".to_string(),
        last_name: "Reyes".to_string(),
        phone_number: None,
        is_active: true,
        is_email_verified: true,
        roles: vec![Role {
            id: RoleId::new(),
            name: "Staff".to_string(),
            description: None,
        }],
        permissions: vec!["Users.Read".to_string()],
        regions: Vec::new(),
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Mint a real HS256 token for `user` expiring `expires_in_secs` from now.
pub(crate) fn mint_token(user: &UserProfile, expires_in_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: user.id,
        email: user.email.clone(),
        iat: now,
        exp: Some(now + expires_in_secs),
        jti: "test-jti".to_string(),
        user_id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        roles: user.roles.iter().map(|role| role.name.clone()).collect(),
        permissions: user.permissions.clone(),
        regions: user.regions.clone(),
        session_id: "test-session".to_string(),
        device_id: None,
        token_version: 1,
        ip_address: None,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .expect("failed to mint test token")
}
