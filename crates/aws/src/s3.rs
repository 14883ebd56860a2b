use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use folio_store::error::StoreError;
use folio_store::object::{ListPage, ObjectStore, ObjectSummary};

use crate::auth::build_sdk_config;
use crate::config::AwsBaseConfig;
use crate::error::{AwsStoreError, classify_sdk_error};

/// Longest validity S3 accepts for a `SigV4` presigned request.
pub const MAX_PRESIGN_VALIDITY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Configuration for the S3 object store.
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Shared AWS configuration (region, role ARN, endpoint URL).
    #[serde(flatten)]
    pub aws: AwsBaseConfig,

    /// Use path-style addressing (`endpoint/bucket/key`). Required by most
    /// S3-compatible servers.
    #[serde(default)]
    pub force_path_style: bool,

    /// Upper bound on keys per `ListObjectsV2` page. `None` lets S3 pick
    /// (1000).
    #[serde(default)]
    pub max_keys_per_page: Option<i32>,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("aws", &self.aws)
            .field("force_path_style", &self.force_path_style)
            .field("max_keys_per_page", &self.max_keys_per_page)
            .finish()
    }
}

impl S3Config {
    /// Create a new `S3Config` with the given AWS region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            aws: AwsBaseConfig::new(region),
            force_path_style: false,
            max_keys_per_page: None,
        }
    }

    /// Set the endpoint URL override.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.aws.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Enable or disable path-style addressing.
    #[must_use]
    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Cap the number of keys returned per listing page.
    #[must_use]
    pub fn with_max_keys_per_page(mut self, max_keys: i32) -> Self {
        self.max_keys_per_page = Some(max_keys);
        self
    }
}

/// [`ObjectStore`] backed by Amazon S3 (or an S3-compatible server).
///
/// One client is built at construction and shared by every request.
pub struct S3ObjectStore {
    config: S3Config,
    client: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("config", &self.config)
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3ObjectStore {
    /// Create a new `S3ObjectStore` by building an AWS SDK client.
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = build_sdk_config(&config.aws).await;
        let client_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();
        let client = aws_sdk_s3::Client::from_conf(client_config);
        Self { config, client }
    }
}

fn sdk_failure<E: std::error::Error>(operation: &str, err: &E) -> StoreError {
    let message = DisplayErrorContext(err).to_string();
    error!(operation, error = %message, "S3 request failed");
    classify_sdk_error(&message).into()
}

/// Validity window for a link expiring at `expires_at`, clamped to what S3
/// will sign.
fn presign_validity(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Duration {
    let remaining = (expires_at - now).to_std().unwrap_or(Duration::ZERO);
    remaining.clamp(Duration::from_secs(1), MAX_PRESIGN_VALIDITY)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self), fields(store = "s3"))]
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation_token.map(str::to_owned))
            .set_max_keys(self.config.max_keys_per_page)
            .send()
            .await
            .map_err(|e| sdk_failure("ListObjectsV2", &e))?;

        let objects: Vec<ObjectSummary> = response
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?;
                let size = object
                    .size()
                    .and_then(|s| u64::try_from(s).ok())
                    .unwrap_or(0);
                Some(ObjectSummary::new(key, size))
            })
            .collect();

        let has_more = response.is_truncated().unwrap_or(false);
        let next_token = response.next_continuation_token().map(str::to_owned);
        debug!(
            count = objects.len(),
            has_more,
            "listed S3 page"
        );

        Ok(ListPage {
            objects,
            next_token,
            has_more,
        })
    }

    #[instrument(skip(self), fields(store = "s3"))]
    async fn sign_url(
        &self,
        bucket: &str,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let validity = presign_validity(Utc::now(), expires_at);
        if validity == MAX_PRESIGN_VALIDITY {
            warn!(%expires_at, "link validity capped at seven days");
        }
        let presigning = PresigningConfig::expires_in(validity)
            .map_err(|e| StoreError::from(AwsStoreError::Configuration(e.to_string())))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| sdk_failure("PresignGetObject", &e))?;

        Ok(request.uri().to_owned())
    }
}
