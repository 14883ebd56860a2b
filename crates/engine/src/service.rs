use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use folio_core::{AccessGrant, CoreError, Entry, is_valid_grant_id};
use folio_store::{GrantStore, ObjectStore};
use tracing::{info, instrument, warn};

use crate::classify::ChildClassifier;
use crate::error::EngineError;
use crate::lister::PaginatedLister;
use crate::nav::folder_url;
use crate::prefix::resolve_query_prefix;
use crate::present::sort_entries;
use crate::signer::sign_files;

/// One folder listing request as seen by the engine.
#[derive(Debug, Clone, Copy)]
pub struct ListingRequest<'a> {
    /// Grant identifier from the request path.
    pub grant_id: &'a str,
    /// URL-decoded virtual path below the grant root; may be empty.
    pub sub_path: &'a str,
    /// Externally visible listing root, e.g. `https://host/v1/folders`.
    pub base_url: &'a str,
}

/// Grant lifecycle and folder listings over injected stores.
///
/// Construct with [`FolderServiceBuilder`](crate::FolderServiceBuilder).
/// The service holds no per-request state and is shared across requests.
pub struct FolderService {
    pub(crate) grants: Arc<dyn GrantStore>,
    pub(crate) objects: Arc<dyn ObjectStore>,
    pub(crate) bucket: String,
    pub(crate) grant_ttl_seconds: u64,
    pub(crate) page_timeout: Duration,
    pub(crate) max_concurrent_signatures: usize,
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService")
            .field("bucket", &self.bucket)
            .field("grant_ttl_seconds", &self.grant_ttl_seconds)
            .field("page_timeout", &self.page_timeout)
            .field("max_concurrent_signatures", &self.max_concurrent_signatures)
            .finish_non_exhaustive()
    }
}

fn check_grant_id(id: &str) -> Result<(), EngineError> {
    if id.is_empty() {
        return Err(EngineError::BadRequest(
            "Missing required parameter folderId".into(),
        ));
    }
    if !is_valid_grant_id(id) {
        return Err(CoreError::InvalidGrantId(id.to_owned()).into());
    }
    Ok(())
}

impl FolderService {
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn grant_ttl_seconds(&self) -> u64 {
        self.grant_ttl_seconds
    }

    /// Issue and persist a grant for `prefix`, valid from now.
    ///
    /// # Errors
    ///
    /// [`EngineError::BadRequest`] if the prefix is empty once trimmed,
    /// [`EngineError::Upstream`] if the grant cannot be saved.
    pub async fn create_grant(&self, prefix: &str) -> Result<AccessGrant, EngineError> {
        self.create_grant_at(prefix, Utc::now()).await
    }

    /// [`create_grant`](Self::create_grant) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`create_grant`](Self::create_grant).
    #[instrument(skip(self, now))]
    pub async fn create_grant_at(
        &self,
        prefix: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessGrant, EngineError> {
        let grant = AccessGrant::issue(prefix, now, self.grant_ttl_seconds)?;
        self.grants.save(&grant).await?;
        info!(
            grant_id = %grant.id,
            root_prefix = %grant.root_prefix,
            expires_at = %grant.expires_at,
            "grant created"
        );
        Ok(grant)
    }

    /// Delete a grant. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// [`EngineError::BadRequest`] for a malformed id,
    /// [`EngineError::Upstream`] if the store fails.
    #[instrument(skip(self))]
    pub async fn delete_grant(&self, grant_id: &str) -> Result<bool, EngineError> {
        check_grant_id(grant_id)?;
        let existed = self.grants.delete(grant_id).await?;
        info!(existed, "grant deleted");
        Ok(existed)
    }

    /// List the immediate children of `request.sub_path` under the grant.
    ///
    /// # Errors
    ///
    /// [`EngineError::BadRequest`] for a malformed id,
    /// [`EngineError::NotFound`] for an unknown or expired grant, and
    /// [`EngineError::Upstream`] for any store failure.
    pub async fn list_folder(
        &self,
        request: ListingRequest<'_>,
    ) -> Result<Vec<Entry>, EngineError> {
        self.list_folder_at(request, Utc::now()).await
    }

    /// [`list_folder`](Self::list_folder) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`list_folder`](Self::list_folder).
    #[instrument(
        skip(self, request, now),
        fields(grant_id = %request.grant_id, sub_path = %request.sub_path)
    )]
    pub async fn list_folder_at(
        &self,
        request: ListingRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>, EngineError> {
        check_grant_id(request.grant_id)?;
        let grant = self.live_grant(request.grant_id, now).await?;

        let query_prefix = resolve_query_prefix(&grant.root_prefix, request.sub_path);
        let mut classifier = ChildClassifier::new(&query_prefix);
        let stats = PaginatedLister::new(self.objects.as_ref(), self.page_timeout)
            .walk(&self.bucket, &query_prefix, |object| classifier.observe(object))
            .await?;
        let classified = classifier.finish();

        let mut entries: Vec<Entry> = classified
            .folders
            .iter()
            .map(|name| {
                let url = folder_url(request.base_url, request.grant_id, request.sub_path, name);
                Entry::folder(name.as_str(), url)
            })
            .collect();

        let files = sign_files(
            self.objects.as_ref(),
            &self.bucket,
            classified.files,
            grant.expires_at,
            self.max_concurrent_signatures,
        )
        .await?;
        entries.extend(files);
        sort_entries(&mut entries);

        info!(
            prefix = %query_prefix,
            pages = stats.pages,
            objects = stats.objects,
            entries = entries.len(),
            "folder listed"
        );
        Ok(entries)
    }

    async fn live_grant(&self, id: &str, now: DateTime<Utc>) -> Result<AccessGrant, EngineError> {
        let Some(grant) = self.grants.load(id).await? else {
            warn!("grant not found");
            return Err(EngineError::NotFound);
        };
        if !grant.is_live_at(now) {
            warn!(expires_at = %grant.expires_at, "grant expired");
            return Err(EngineError::NotFound);
        }
        Ok(grant)
    }
}
