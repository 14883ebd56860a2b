use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// A single object returned by a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Full object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// One page of a prefix listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects in this page, in ascending key order.
    pub objects: Vec<ObjectSummary>,
    /// Token to pass to the next request, if any.
    pub next_token: Option<String>,
    /// Whether the backend reported more data after this page.
    pub has_more: bool,
}

impl ListPage {
    /// A final page (no continuation).
    pub fn last(objects: Vec<ObjectSummary>) -> Self {
        Self {
            objects,
            next_token: None,
            has_more: false,
        }
    }

    /// A page followed by more data reachable through `token`.
    pub fn with_next(objects: Vec<ObjectSummary>, token: impl Into<String>) -> Self {
        Self {
            objects,
            next_token: Some(token.into()),
            has_more: true,
        }
    }
}

/// Read-only access to a flat, prefix-addressed object store.
///
/// Implementations must be `Send + Sync`. A listing request returns at most
/// one page; callers drive pagination with the returned token.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of objects in `bucket` whose key starts with `prefix`.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, StoreError>;

    /// Issue a credential-free download link for `key`, valid until
    /// `expires_at`.
    async fn sign_url(
        &self,
        bucket: &str,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StoreError>;
}
