use folio_core::CoreError;
use folio_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`FolderService`](crate::FolderService) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required parameter was missing or malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The grant does not exist or has expired. The two cases are
    /// deliberately indistinguishable.
    #[error("folder not found")]
    NotFound,

    /// The grant store or object store failed.
    #[error("upstream store error: {0}")]
    Upstream(#[from] StoreError),

    /// The service was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyPrefix | CoreError::InvalidGrantId(_) => {
                EngineError::BadRequest(err.to_string())
            }
            CoreError::InvalidLifetime(_) => EngineError::Configuration(err.to_string()),
        }
    }
}
