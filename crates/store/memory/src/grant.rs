use async_trait::async_trait;
use dashmap::DashMap;

use folio_core::AccessGrant;
use folio_store::error::StoreError;
use folio_store::grant::GrantStore;

/// In-memory [`GrantStore`] backed by a [`DashMap`].
///
/// Grants are kept until deleted; expired grants are returned as stored.
#[derive(Debug, Default)]
pub struct MemoryGrantStore {
    grants: DashMap<String, AccessGrant>,
}

impl MemoryGrantStore {
    /// Create a new, empty in-memory grant store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored grants.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns `true` if no grants are stored.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn load(&self, id: &str) -> Result<Option<AccessGrant>, StoreError> {
        Ok(self.grants.get(id).map(|g| g.value().clone()))
    }

    async fn save(&self, grant: &AccessGrant) -> Result<(), StoreError> {
        self.grants.insert(grant.id.clone(), grant.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.grants.remove(id).is_some())
    }
}
