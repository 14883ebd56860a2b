use std::sync::Arc;

#[cfg(feature = "s3")]
use folio_aws::{AwsBaseConfig, S3Config, S3ObjectStore};
use folio_store::ObjectStore;
use folio_store_memory::MemoryObjectStore;
use tracing::info;

use crate::config::{ListingConfig, StorageConfig};
use crate::error::ServerError;

/// Bucket used by the memory backend when none is configured.
pub const DEFAULT_MEMORY_BUCKET: &str = "folio";

/// An object store together with the bucket it serves.
pub struct ObjectStoreHandle {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
}

/// Create an object store from the given configuration.
///
/// # Errors
///
/// Returns [`ServerError::Config`] for an unknown backend or missing bucket.
#[allow(clippy::unused_async)]
pub async fn create_object_store(
    storage: &StorageConfig,
    listing: &ListingConfig,
) -> Result<ObjectStoreHandle, ServerError> {
    let handle = match storage.backend.as_str() {
        "memory" => {
            let bucket = storage
                .bucket
                .clone()
                .unwrap_or_else(|| DEFAULT_MEMORY_BUCKET.to_owned());
            let store = listing
                .max_keys_per_page
                .and_then(|n| usize::try_from(n).ok())
                .map_or_else(MemoryObjectStore::new, MemoryObjectStore::with_page_size);
            store.create_bucket(&bucket);
            ObjectStoreHandle {
                store: Arc::new(store),
                bucket,
            }
        }
        #[cfg(feature = "s3")]
        "s3" => {
            let bucket = storage.bucket.clone().ok_or_else(|| {
                ServerError::Config("s3 storage backend requires [storage] bucket".into())
            })?;
            let store = S3ObjectStore::new(s3_config(storage, listing)).await;
            ObjectStoreHandle {
                store: Arc::new(store),
                bucket,
            }
        }
        other => {
            return Err(ServerError::Config(format!(
                "unknown storage backend: {other} (is the feature enabled?)"
            )));
        }
    };
    info!(backend = %storage.backend, bucket = %handle.bucket, "object store ready");
    Ok(handle)
}

#[cfg(feature = "s3")]
fn s3_config(storage: &StorageConfig, listing: &ListingConfig) -> S3Config {
    let defaults = AwsBaseConfig::default();
    S3Config {
        aws: AwsBaseConfig {
            region: storage.region.clone().unwrap_or(defaults.region),
            role_arn: storage.role_arn.clone(),
            endpoint_url: storage.endpoint_url.clone(),
            session_name: storage.session_name.clone(),
            external_id: storage.external_id.clone(),
        },
        force_path_style: storage.force_path_style,
        max_keys_per_page: listing.max_keys_per_page,
    }
}
