mod grants;
mod listing;
mod logging;
mod server;
mod storage;


pub use grants::*;
pub use listing::*;
pub use logging::*;
pub use server::*;
pub use storage::*;

use std::path::Path;

use serde::Deserialize;

use crate::error::ServerError;

/// Top-level configuration for the Folio server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct FolioConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Grant persistence and lifetime.
    #[serde(default)]
    pub grants: GrantsConfig,
    /// Object storage holding the listed files.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Listing safeguards.
    #[serde(default)]
    pub listing: ListingConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FolioConfig {
    /// Load configuration from `path`, or defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the file exists but cannot be read, and
    /// [`ServerError::Config`] if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] on malformed input.
    pub fn from_toml(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))
    }
}
