use folio_core::DEFAULT_GRANT_TTL_SECONDS;
use serde::Deserialize;

/// Grant store backend and grant lifetime.
#[derive(Debug, Deserialize)]
pub struct GrantsConfig {
    /// Which backend to use: `"memory"` or `"dynamodb"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Lifetime of newly created grants, in seconds (default three days).
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// `DynamoDB` table name.
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// AWS region for the `DynamoDB` backend.
    pub region: Option<String>,
    /// Endpoint override for `DynamoDB` Local or `LocalStack`.
    pub endpoint_url: Option<String>,
    /// Create the `DynamoDB` table at startup if it does not exist.
    #[serde(default)]
    pub create_table: bool,
}

impl Default for GrantsConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            ttl_seconds: default_ttl(),
            table_name: default_table_name(),
            region: None,
            endpoint_url: None,
            create_table: false,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

fn default_ttl() -> u64 {
    DEFAULT_GRANT_TTL_SECONDS
}

fn default_table_name() -> String {
    "folio_grants".to_owned()
}
