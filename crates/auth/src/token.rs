//! Unverified access-token inspection.
//!
//! Everything here decodes the token payload **without** checking the
//! signature. That is an explicit design choice: the results are advisory,
//! used for refresh scheduling and UX, and the server re-validates every
//! request. Nothing security-relevant may be derived from these functions.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};

use crate::claims::TokenClaims;

/// Refresh headroom: a token within this window of its expiry is due for
/// rotation.
pub const EXPIRY_THRESHOLD_SECS: i64 = 5 * 60;

/// Decode the claims of a compact JWT without verifying it.
///
/// Requires at least three dot-separated segments, then parses the second
/// segment as URL-safe base64 JSON. Any failure yields `None`, never a panic.
pub fn decode(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    // The signature segment must exist even though it is never checked.
    segments.next()?;

    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "token payload is not valid base64");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(claims) => Some(claims),
        Err(err) => {
            tracing::debug!(error = %err, "token payload is not a valid claim set");
            None
        }
    }
}

/// Whether the token is expired at `now`.
///
/// Fail-closed: an undecodable token or one without an expiry counts as
/// expired.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode(token).and_then(|claims| claims.exp) {
        Some(exp) => exp < now.timestamp(),
        None => true,
    }
}

/// Whether the token is expired right now.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

/// Whether the token expires within `threshold_secs` of `now`.
///
/// Fail-closed like [`is_expired_at`].
pub fn is_expiring_soon_at(token: &str, now: DateTime<Utc>, threshold_secs: i64) -> bool {
    match decode(token).and_then(|claims| claims.exp) {
        Some(exp) => exp - now.timestamp() < threshold_secs,
        None => true,
    }
}

/// Whether the token expires within the default refresh headroom.
pub fn is_expiring_soon(token: &str) -> bool {
    is_expiring_soon_at(token, Utc::now(), EXPIRY_THRESHOLD_SECS)
}

/// Expiry instant in milliseconds since the epoch, if the token carries one.
pub fn expiration_time_millis(token: &str) -> Option<i64> {
    decode(token)
        .and_then(|claims| claims.exp)
        .map(|exp| exp * 1000)
}

/// Structural check: exactly three dot-separated segments.
pub fn is_valid_format(token: &str) -> bool {
    !token.is_empty() && token.split('.').count() == 3
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const NOW_SECS: i64 = 1_700_000_000;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW_SECS, 0).unwrap()
    }

    /// Build an unsigned token around the given payload.
    fn forge(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.forged-signature")
    }

    fn payload_with_exp(exp: i64) -> serde_json::Value {
        let user_id = uuid::Uuid::now_v7();
        json!({
            "sub": user_id,
            "userId": user_id,
            "email": "staff@example.com",
            "iat": NOW_SECS - 60,
            "exp": exp,
            "sessionId": "c2f6a0d4",
            "tokenVersion": 3,
        })
    }

    #[test]
    fn decode_extracts_custom_claims() {
        let user_id = uuid::Uuid::now_v7();
        let region_id = uuid::Uuid::now_v7();
        let token = forge(&json!({
            "sub": user_id,
            "userId": user_id,
            "email": "staff@example.com",
            "iat": NOW_SECS,
            "exp": NOW_SECS + 3600,
            "roles": ["Admin", "Staff"],
            "permissions": ["Users.Read"],
            "regions": [{
                "regionId": region_id,
                "regionCode": "R-001",
                "regionName": "North",
                "branches": null,
            }],
            "sessionId": "c2f6a0d4",
            "tokenVersion": 1,
        }));

        let claims = decode(&token).unwrap();
        assert_eq!(claims.roles, vec!["Admin", "Staff"]);
        assert_eq!(claims.permissions, vec!["Users.Read"]);
        assert_eq!(claims.exp, Some(NOW_SECS + 3600));
        assert!(claims.regions[0].covers_all_branches());
    }

    #[test]
    fn decode_ignores_signature_content() {
        let mut token = forge(&payload_with_exp(NOW_SECS + 3600));
        token.truncate(token.rfind('.').unwrap());
        token.push_str(".!!not-even-base64!!");

        assert!(decode(&token).is_some());
    }

    #[test]
    fn decode_requires_three_segments() {
        let full = forge(&payload_with_exp(NOW_SECS + 3600));
        let two_segments = full.rsplit_once('.').unwrap().0;

        assert!(decode(two_segments).is_none());
        assert!(decode("").is_none());
        assert!(decode("only-one-segment").is_none());
    }

    #[test]
    fn decode_rejects_malformed_payloads() {
        assert!(decode("a.%%%.c").is_none());

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"not json"));
        assert!(decode(&not_json).is_none());

        let wrong_shape = format!("h.{}.s", URL_SAFE_NO_PAD.encode(br#"{"sub":"not-a-uuid"}"#));
        assert!(decode(&wrong_shape).is_none());
    }

    #[test]
    fn expired_token_is_detected() {
        let token = forge(&payload_with_exp(NOW_SECS - 1));
        assert!(is_expired_at(&token, now()));
    }

    #[test]
    fn fresh_token_is_not_expired() {
        let token = forge(&payload_with_exp(NOW_SECS + 3600));
        assert!(!is_expired_at(&token, now()));
    }

    #[test]
    fn missing_expiry_counts_as_expired() {
        let user_id = uuid::Uuid::now_v7();
        let token = forge(&json!({ "sub": user_id, "userId": user_id }));

        assert!(decode(&token).is_some(), "payload without exp still decodes");
        assert!(is_expired_at(&token, now()));
        assert!(is_expiring_soon_at(&token, now(), EXPIRY_THRESHOLD_SECS));
        assert_eq!(expiration_time_millis(&token), None);
    }

    #[test]
    fn undecodable_token_counts_as_expired() {
        assert!(is_expired_at("garbage", now()));
        assert!(is_expiring_soon_at("garbage", now(), EXPIRY_THRESHOLD_SECS));
    }

    #[test]
    fn expiring_soon_honors_the_threshold() {
        let inside = forge(&payload_with_exp(NOW_SECS + 200));
        let outside = forge(&payload_with_exp(NOW_SECS + 400));

        assert!(is_expiring_soon_at(&inside, now(), 300));
        assert!(!is_expiring_soon_at(&outside, now(), 300));
        // The boundary itself is not "soon": the window is strictly less-than.
        let boundary = forge(&payload_with_exp(NOW_SECS + 300));
        assert!(!is_expiring_soon_at(&boundary, now(), 300));
    }

    #[test]
    fn expiration_time_is_reported_in_millis() {
        let token = forge(&payload_with_exp(NOW_SECS + 3600));
        assert_eq!(
            expiration_time_millis(&token),
            Some((NOW_SECS + 3600) * 1000)
        );
    }

    #[test]
    fn format_check_requires_exactly_three_segments() {
        assert!(is_valid_format("a.b.c"));
        assert!(!is_valid_format(""));
        assert!(!is_valid_format("a.b"));
        assert!(!is_valid_format("a.b.c.d"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn decode_never_panics(token in ".*") {
            let _ = decode(&token);
            let _ = is_expired_at(&token, now());
            let _ = is_valid_format(&token);
        }

        #[test]
        fn tokens_without_a_third_segment_fail_closed(
            header in "[A-Za-z0-9_-]{0,32}",
            payload in "[A-Za-z0-9_-]{0,32}",
        ) {
            let token = format!("{header}.{payload}");
            prop_assert!(decode(&token).is_none());
            prop_assert!(is_expired_at(&token, now()));
        }
    }
}
