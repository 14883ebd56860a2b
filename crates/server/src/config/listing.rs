use serde::Deserialize;

/// Safeguards applied while listing a folder.
#[derive(Debug, Deserialize)]
pub struct ListingConfig {
    /// Upper bound on one listing page request, in seconds.
    #[serde(default = "default_page_timeout")]
    pub page_timeout_seconds: u64,
    /// Keys per listing page requested from the store. Store default when
    /// unset.
    pub max_keys_per_page: Option<i32>,
    /// Signing calls allowed in flight at once for one listing.
    #[serde(default = "default_max_concurrent_signatures")]
    pub max_concurrent_signatures: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_timeout_seconds: default_page_timeout(),
            max_keys_per_page: None,
            max_concurrent_signatures: default_max_concurrent_signatures(),
        }
    }
}

fn default_page_timeout() -> u64 {
    30
}

fn default_max_concurrent_signatures() -> usize {
    16
}
