use std::collections::HashSet;
use std::time::Duration;

use folio_store::{ObjectStore, ObjectSummary, StoreError};
use tracing::{debug, instrument, warn};

/// Default bound on a single page request.
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Counters from one complete walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListingStats {
    pub pages: usize,
    pub objects: usize,
}

/// Walks a paginated listing to completion.
///
/// Pages are requested strictly one after another; each request carries the
/// token returned by the previous one. A token may be issued only once per
/// walk.
pub struct PaginatedLister<'a> {
    store: &'a dyn ObjectStore,
    page_timeout: Duration,
}

impl<'a> PaginatedLister<'a> {
    pub fn new(store: &'a dyn ObjectStore, page_timeout: Duration) -> Self {
        Self {
            store,
            page_timeout,
        }
    }

    /// List every object under `prefix`, handing each one to `visit` in
    /// key order.
    ///
    /// # Errors
    ///
    /// Fails with the store's error if any page request fails,
    /// [`StoreError::Timeout`] if a page takes longer than the page timeout,
    /// and [`StoreError::Backend`] if the store hands back any token it has
    /// already issued during this walk.
    #[instrument(skip(self, visit), fields(bucket = %bucket, prefix = %prefix))]
    pub async fn walk(
        &self,
        bucket: &str,
        prefix: &str,
        mut visit: impl FnMut(ObjectSummary) + Send,
    ) -> Result<ListingStats, StoreError> {
        let mut stats = ListingStats::default();
        let mut token: Option<String> = None;
        let mut issued: HashSet<String> = HashSet::new();

        loop {
            let page = tokio::time::timeout(
                self.page_timeout,
                self.store.list_objects(bucket, prefix, token.as_deref()),
            )
            .await
            .map_err(|_| StoreError::Timeout(self.page_timeout))??;

            stats.pages += 1;
            stats.objects += page.objects.len();
            debug!(page = stats.pages, count = page.objects.len(), "received page");
            for object in page.objects {
                visit(object);
            }

            match page.next_token {
                Some(next) if issued.contains(&next) => {
                    return Err(StoreError::Backend(format!(
                        "listing reissued continuation token {next} after {} pages",
                        stats.pages
                    )));
                }
                Some(next) => {
                    issued.insert(next.clone());
                    token = Some(next);
                }
                None => {
                    if page.has_more {
                        warn!(
                            pages = stats.pages,
                            "store reported more data without a continuation token; stopping"
                        );
                    }
                    break;
                }
            }
        }

        Ok(stats)
    }
}
