use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default validity window of a freshly issued grant (three days).
pub const DEFAULT_GRANT_TTL_SECONDS: u64 = 3 * 24 * 60 * 60;

/// Longest grant identifier accepted from callers.
const MAX_GRANT_ID_LEN: usize = 128;

/// A time-bounded binding from a grant identifier to an object-store key
/// prefix.
///
/// Grants are immutable once issued. The listing engine only reads them; the
/// grant store owns their persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccessGrant {
    /// Opaque identifier (32 lowercase hex characters for issued grants).
    #[cfg_attr(feature = "openapi", schema(example = "3f2b8c1d9e7a4b6c8d0e1f2a3b4c5d6e"))]
    pub id: String,
    /// Key prefix exposed by this grant, without leading or trailing `/`.
    #[cfg_attr(feature = "openapi", schema(example = "reports/2026"))]
    pub root_prefix: String,
    /// When the grant was issued.
    pub created_at: DateTime<Utc>,
    /// The grant is live strictly before this instant.
    pub expires_at: DateTime<Utc>,
}

impl AccessGrant {
    /// Issue a new grant for `raw_prefix`, valid for `ttl_seconds` from `now`.
    ///
    /// The prefix is normalised with [`normalize_root_prefix`]; an empty
    /// result is rejected.
    pub fn issue(
        raw_prefix: &str,
        now: DateTime<Utc>,
        ttl_seconds: u64,
    ) -> Result<Self, CoreError> {
        let root_prefix = normalize_root_prefix(raw_prefix).ok_or(CoreError::EmptyPrefix)?;

        let expires_at = i64::try_from(ttl_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(CoreError::InvalidLifetime(ttl_seconds))?;

        Ok(Self {
            id: generate_grant_id(),
            root_prefix,
            created_at: now,
            expires_at,
        })
    }

    /// Returns `true` while `now` is strictly before the expiration time.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Strip leading and trailing `/` and whitespace from a caller-supplied
/// prefix. Returns `None` when nothing is left.
pub fn normalize_root_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| c == '/' || c.is_whitespace());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Generate a fresh grant identifier: a v4 UUID rendered as 32 hex digits
/// with no separators.
pub fn generate_grant_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Check that a caller-supplied grant id is non-empty, bounded, and made of
/// ASCII alphanumerics, `-` or `_`.
pub fn is_valid_grant_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_GRANT_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn normalize_strips_slashes_and_whitespace() {
        assert_eq!(
            normalize_root_prefix("  /reports/2026/ ").as_deref(),
            Some("reports/2026")
        );
        assert_eq!(normalize_root_prefix("a").as_deref(), Some("a"));
        assert_eq!(normalize_root_prefix("//a/b//").as_deref(), Some("a/b"));
    }

    #[test]
    fn normalize_rejects_empty() {
        assert!(normalize_root_prefix("").is_none());
        assert!(normalize_root_prefix(" / /  ").is_none());
    }

    #[test]
    fn normalize_keeps_interior_whitespace() {
        assert_eq!(
            normalize_root_prefix("/my docs/").as_deref(),
            Some("my docs")
        );
    }

    #[test]
    fn issue_sets_window_and_id() {
        let now = at("2026-03-01T12:00:00Z");
        let grant = AccessGrant::issue("/photos/", now, DEFAULT_GRANT_TTL_SECONDS).unwrap();
        assert_eq!(grant.root_prefix, "photos");
        assert_eq!(grant.created_at, now);
        assert_eq!(grant.expires_at, at("2026-03-04T12:00:00Z"));
        assert_eq!(grant.id.len(), 32);
        assert!(grant.id.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn issue_rejects_empty_prefix() {
        let err = AccessGrant::issue(" // ", Utc::now(), 60).unwrap_err();
        assert_eq!(err, CoreError::EmptyPrefix);
    }

    #[test]
    fn issue_rejects_unrepresentable_lifetime() {
        let err = AccessGrant::issue("a", Utc::now(), u64::MAX).unwrap_err();
        assert_eq!(err, CoreError::InvalidLifetime(u64::MAX));
    }

    #[test]
    fn issued_ids_are_unique() {
        let a = generate_grant_id();
        let b = generate_grant_id();
        assert_ne!(a, b);
        assert!(is_valid_grant_id(&a));
    }

    #[test]
    fn liveness_is_strict() {
        let now = at("2026-03-01T00:00:00Z");
        let grant = AccessGrant::issue("a", now, 60).unwrap();
        assert!(grant.is_live_at(now));
        assert!(grant.is_live_at(at("2026-03-01T00:00:59Z")));
        assert!(!grant.is_live_at(at("2026-03-01T00:01:00Z")));
        assert!(!grant.is_live_at(at("2026-03-02T00:00:00Z")));
    }

    #[test]
    fn grant_id_validation() {
        assert!(is_valid_grant_id("3f2b8c1d9e7a4b6c8d0e1f2a3b4c5d6e"));
        assert!(is_valid_grant_id("legacy-id_01"));
        assert!(!is_valid_grant_id(""));
        assert!(!is_valid_grant_id("has space"));
        assert!(!is_valid_grant_id("a/b"));
        assert!(!is_valid_grant_id(&"x".repeat(129)));
    }

    #[test]
    fn grant_serializes_camel_case() {
        let grant = AccessGrant {
            id: "abc".into(),
            root_prefix: "root".into(),
            created_at: at("2026-01-01T00:00:00Z"),
            expires_at: at("2026-01-04T00:00:00Z"),
        };
        let json = serde_json::to_value(&grant).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["rootPrefix"], "root");
        assert_eq!(json["expiresAt"], "2026-01-04T00:00:00Z");
    }
}
