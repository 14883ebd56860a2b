use chrono::{DateTime, Utc};
use folio_core::Entry;
use folio_store::{ObjectStore, StoreError};
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::classify::FileChild;

/// Attach a signed download link to every file, valid until `expires_at`.
///
/// At most `max_concurrent` signing calls are in flight at once (a value of
/// zero is treated as one). Output order is unspecified.
///
/// # Errors
///
/// Returns the first signing failure; no partial result is produced.
pub async fn sign_files(
    store: &dyn ObjectStore,
    bucket: &str,
    files: Vec<FileChild>,
    expires_at: DateTime<Utc>,
    max_concurrent: usize,
) -> Result<Vec<Entry>, StoreError> {
    stream::iter(files)
        .map(|file| async move {
            let url = store.sign_url(bucket, &file.key, expires_at).await?;
            Ok::<_, StoreError>(Entry::file(file.name, url, file.size))
        })
        .buffer_unordered(max_concurrent.max(1))
        .try_collect()
        .await
}
