use async_trait::async_trait;

use folio_core::AccessGrant;

use crate::error::StoreError;

/// Persistence for access grants.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// Stores return grants as saved; expiration is judged by the caller.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Load a grant by id. Returns `None` if no grant has that id.
    async fn load(&self, id: &str) -> Result<Option<AccessGrant>, StoreError>;

    /// Persist a grant, overwriting any grant with the same id.
    async fn save(&self, grant: &AccessGrant) -> Result<(), StoreError>;

    /// Delete a grant. Returns `true` if the grant existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}
