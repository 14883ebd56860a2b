use std::sync::Arc;
use std::time::Duration;

use folio_core::DEFAULT_GRANT_TTL_SECONDS;
use folio_store::{GrantStore, ObjectStore};

use crate::error::EngineError;
use crate::lister::DEFAULT_PAGE_TIMEOUT;
use crate::service::FolderService;

/// Default cap on concurrent signing calls within one listing.
pub const DEFAULT_MAX_CONCURRENT_SIGNATURES: usize = 16;

/// Fluent builder for constructing a [`FolderService`].
///
/// A [`GrantStore`], an [`ObjectStore`] and a bucket name must be supplied.
/// Everything else has a default.
pub struct FolderServiceBuilder {
    grants: Option<Arc<dyn GrantStore>>,
    objects: Option<Arc<dyn ObjectStore>>,
    bucket: Option<String>,
    grant_ttl_seconds: u64,
    page_timeout: Duration,
    max_concurrent_signatures: usize,
}

impl FolderServiceBuilder {
    pub fn new() -> Self {
        Self {
            grants: None,
            objects: None,
            bucket: None,
            grant_ttl_seconds: DEFAULT_GRANT_TTL_SECONDS,
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            max_concurrent_signatures: DEFAULT_MAX_CONCURRENT_SIGNATURES,
        }
    }

    /// Set the grant store implementation.
    #[must_use]
    pub fn grant_store(mut self, store: Arc<dyn GrantStore>) -> Self {
        self.grants = Some(store);
        self
    }

    /// Set the object store implementation.
    #[must_use]
    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.objects = Some(store);
        self
    }

    /// Set the bucket every grant's prefix lives in.
    #[must_use]
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set how long newly created grants stay live.
    #[must_use]
    pub fn grant_ttl_seconds(mut self, ttl: u64) -> Self {
        self.grant_ttl_seconds = ttl;
        self
    }

    /// Bound each listing page request.
    #[must_use]
    pub fn page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    /// Cap concurrent signing calls within one listing.
    #[must_use]
    pub fn max_concurrent_signatures(mut self, limit: usize) -> Self {
        self.max_concurrent_signatures = limit;
        self
    }

    /// Consume the builder and produce a [`FolderService`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] if a store or the bucket is
    /// missing, or if the grant lifetime or page timeout is zero.
    pub fn build(self) -> Result<FolderService, EngineError> {
        let grants = self
            .grants
            .ok_or_else(|| EngineError::Configuration("grant store is required".into()))?;
        let objects = self
            .objects
            .ok_or_else(|| EngineError::Configuration("object store is required".into()))?;
        let bucket = self
            .bucket
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| EngineError::Configuration("bucket is required".into()))?;

        if self.grant_ttl_seconds == 0 {
            return Err(EngineError::Configuration(
                "grant lifetime must be positive".into(),
            ));
        }
        if self.page_timeout.is_zero() {
            return Err(EngineError::Configuration(
                "page timeout must be positive".into(),
            ));
        }

        Ok(FolderService {
            grants,
            objects,
            bucket,
            grant_ttl_seconds: self.grant_ttl_seconds,
            page_timeout: self.page_timeout,
            max_concurrent_signatures: self.max_concurrent_signatures.max(1),
        })
    }
}

impl Default for FolderServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
