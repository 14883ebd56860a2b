use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use folio_store::error::StoreError;
use folio_store::object::{ListPage, ObjectStore, ObjectSummary};

/// Default number of objects returned per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// In-memory [`ObjectStore`] holding `key -> size` maps per bucket.
///
/// Listings are paginated with a fixed page size; the continuation token is
/// the last key of the previous page. Signed links use the `memory://`
/// scheme and embed the expiration as epoch seconds.
#[derive(Debug)]
pub struct MemoryObjectStore {
    buckets: DashMap<String, BTreeMap<String, u64>>,
    page_size: usize,
    list_calls: AtomicUsize,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl MemoryObjectStore {
    /// Create an empty store with the default page size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store returning at most `page_size` objects per page.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            buckets: DashMap::new(),
            page_size: page_size.max(1),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Create `bucket` if it does not exist yet.
    pub fn create_bucket(&self, bucket: &str) {
        self.buckets.entry(bucket.to_owned()).or_default();
    }

    /// Insert or replace an object.
    pub fn put(&self, bucket: &str, key: impl Into<String>, size: u64) {
        self.buckets
            .entry(bucket.to_owned())
            .or_default()
            .insert(key.into(), size);
    }

    /// Insert many objects at once.
    pub fn put_all(&self, bucket: &str, objects: impl IntoIterator<Item = ObjectSummary>) {
        let mut entry = self.buckets.entry(bucket.to_owned()).or_default();
        for object in objects {
            entry.insert(object.key, object.size);
        }
    }

    /// Number of `list_objects` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        let Some(objects) = self.buckets.get(bucket) else {
            return Err(StoreError::Backend(format!("no such bucket: {bucket}")));
        };

        let start = match continuation_token {
            Some(token) => Bound::Excluded(token.to_owned()),
            None => Bound::Included(prefix.to_owned()),
        };

        let mut matching = objects
            .range((start, Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix));

        let page: Vec<ObjectSummary> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, size)| ObjectSummary::new(key.clone(), *size))
            .collect();

        let has_more = matching.next().is_some();
        match (has_more, page.last()) {
            (true, Some(last)) => {
                let token = last.key.clone();
                Ok(ListPage::with_next(page, token))
            }
            _ => Ok(ListPage::last(page)),
        }
    }

    async fn sign_url(
        &self,
        bucket: &str,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let exists = self
            .buckets
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key));
        if !exists {
            return Err(StoreError::Backend(format!(
                "no such object: {bucket}/{key}"
            )));
        }
        Ok(format!(
            "memory://{bucket}/{key}?expires={}",
            expires_at.timestamp()
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use folio_store::testing::{object_fixture, run_object_store_conformance_tests};

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryObjectStore::new();
        store.put_all("bucket", object_fixture("conformance/root/"));
        run_object_store_conformance_tests(&store, "bucket", "conformance/root/")
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn conformance_with_tiny_pages() {
        let store = MemoryObjectStore::with_page_size(2);
        store.put_all("bucket", object_fixture("conformance/root/"));
        run_object_store_conformance_tests(&store, "bucket", "conformance/root/")
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn pages_carry_tokens_until_exhausted() {
        let store = MemoryObjectStore::with_page_size(2);
        for key in ["p/1", "p/2", "p/3", "p/4", "p/5"] {
            store.put("b", key, 1);
        }

        let first = store.list_objects("b", "p/", None).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.next_token.as_deref(), Some("p/2"));

        let second = store
            .list_objects("b", "p/", first.next_token.as_deref())
            .await
            .unwrap();
        assert_eq!(second.objects[0].key, "p/3");

        let third = store
            .list_objects("b", "p/", second.next_token.as_deref())
            .await
            .unwrap();
        assert_eq!(third.objects.len(), 1);
        assert!(!third.has_more);
        assert!(third.next_token.is_none());
        assert_eq!(store.list_calls(), 3);
    }

    #[tokio::test]
    async fn exact_page_boundary_has_no_trailing_token() {
        let store = MemoryObjectStore::with_page_size(2);
        store.put("b", "p/1", 1);
        store.put("b", "p/2", 1);
        let page = store.list_objects("b", "p/", None).await.unwrap();
        assert_eq!(page.objects.len(), 2);
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn unknown_bucket_is_an_error() {
        let store = MemoryObjectStore::new();
        let err = store.list_objects("missing", "", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn sign_url_embeds_expiry() {
        let store = MemoryObjectStore::new();
        store.put("b", "dir/file.txt", 3);
        let expires = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        let url = store.sign_url("b", "dir/file.txt", expires).await.unwrap();
        assert_eq!(url, "memory://b/dir/file.txt?expires=1800000000");
    }

    #[tokio::test]
    async fn sign_url_rejects_missing_object() {
        let store = MemoryObjectStore::new();
        store.put("b", "x", 1);
        let err = store
            .sign_url("b", "y", Utc::now() + TimeDelta::hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
