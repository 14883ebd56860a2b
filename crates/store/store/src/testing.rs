use chrono::{TimeDelta, Utc};

use folio_core::AccessGrant;

use crate::error::StoreError;
use crate::grant::GrantStore;
use crate::object::{ObjectStore, ObjectSummary};

/// Keys (relative to the fixture root) that the object store conformance
/// suite expects to find.
const FIXTURE_KEYS: &[(&str, u64)] = &[
    ("", 0),
    ("a.txt", 11),
    ("b.txt", 22),
    ("nested/c.txt", 33),
    ("nested/deeper/d.txt", 44),
    ("z/e.bin", 55),
];

fn test_grant(id: &str) -> AccessGrant {
    let now = Utc::now();
    AccessGrant {
        id: id.to_owned(),
        root_prefix: "conformance/root".to_owned(),
        created_at: now,
        expires_at: now + TimeDelta::hours(1),
    }
}

/// Objects to seed into an object store before running
/// [`run_object_store_conformance_tests`].
///
/// `root` must end with `/`. The fixture includes one decoy object whose key
/// shares `root` as a string prefix without the separator; it must never
/// appear in listings of `root`.
pub fn object_fixture(root: &str) -> Vec<ObjectSummary> {
    let mut objects: Vec<ObjectSummary> = FIXTURE_KEYS
        .iter()
        .map(|(rel, size)| ObjectSummary::new(format!("{root}{rel}"), *size))
        .collect();
    let decoy_root = root.trim_end_matches('/');
    objects.push(ObjectSummary::new(format!("{decoy_root}2/decoy.txt"), 1));
    objects
}

/// Run the full grant store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any store call fails.
pub async fn run_grant_store_conformance_tests(store: &dyn GrantStore) -> Result<(), StoreError> {
    test_load_missing(store).await?;
    test_save_and_load(store).await?;
    test_save_overwrites(store).await?;
    test_delete(store).await?;
    test_expired_grant_is_still_returned(store).await?;
    Ok(())
}

async fn test_load_missing(store: &dyn GrantStore) -> Result<(), StoreError> {
    let loaded = store.load("conformance-missing").await?;
    assert!(loaded.is_none(), "load on missing id should return None");
    Ok(())
}

async fn test_save_and_load(store: &dyn GrantStore) -> Result<(), StoreError> {
    let grant = test_grant("conformance-save");
    store.save(&grant).await?;
    let loaded = store.load(&grant.id).await?;
    let loaded = loaded.expect("saved grant should load");
    assert_eq!(loaded.id, grant.id);
    assert_eq!(loaded.root_prefix, grant.root_prefix);
    assert_eq!(
        loaded.expires_at.timestamp(),
        grant.expires_at.timestamp(),
        "expiration should survive persistence"
    );
    Ok(())
}

async fn test_save_overwrites(store: &dyn GrantStore) -> Result<(), StoreError> {
    let mut grant = test_grant("conformance-overwrite");
    store.save(&grant).await?;
    grant.root_prefix = "conformance/other".to_owned();
    store.save(&grant).await?;
    let loaded = store.load(&grant.id).await?.expect("grant should load");
    assert_eq!(loaded.root_prefix, "conformance/other");
    Ok(())
}

async fn test_delete(store: &dyn GrantStore) -> Result<(), StoreError> {
    let grant = test_grant("conformance-delete");
    store.save(&grant).await?;
    let existed = store.delete(&grant.id).await?;
    assert!(existed, "delete should return true for existing grant");
    assert!(store.load(&grant.id).await?.is_none());

    let existed = store.delete(&grant.id).await?;
    assert!(!existed, "delete on missing grant should return false");
    Ok(())
}

async fn test_expired_grant_is_still_returned(store: &dyn GrantStore) -> Result<(), StoreError> {
    let mut grant = test_grant("conformance-expired");
    grant.created_at -= TimeDelta::days(4);
    grant.expires_at = grant.created_at + TimeDelta::days(3);
    store.save(&grant).await?;
    let loaded = store.load(&grant.id).await?;
    assert!(
        loaded.is_some(),
        "stores return expired grants; the caller judges liveness"
    );
    Ok(())
}

/// Run the object store conformance test suite.
///
/// The store must contain exactly the objects from [`object_fixture`] for
/// `root` (and may contain unrelated objects elsewhere in `bucket`).
///
/// # Errors
///
/// Returns an error if any store call fails.
pub async fn run_object_store_conformance_tests(
    store: &dyn ObjectStore,
    bucket: &str,
    root: &str,
) -> Result<(), StoreError> {
    test_walk_all_pages(store, bucket, root).await?;
    test_prefix_respects_separator(store, bucket, root).await?;
    test_empty_prefix_listing(store, bucket, root).await?;
    test_sign_url(store, bucket, root).await?;
    Ok(())
}

async fn walk(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<ObjectSummary>, StoreError> {
    let mut all = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = store.list_objects(bucket, prefix, token.as_deref()).await?;
        all.extend(page.objects);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(all)
}

async fn test_walk_all_pages(
    store: &dyn ObjectStore,
    bucket: &str,
    root: &str,
) -> Result<(), StoreError> {
    let objects = walk(store, bucket, root).await?;
    let keys: Vec<&str> = objects.iter().map(|o| o.key.as_str()).collect();
    let expected: Vec<String> = FIXTURE_KEYS
        .iter()
        .map(|(rel, _)| format!("{root}{rel}"))
        .collect();
    assert_eq!(keys, expected, "listing should return every key once, in key order");

    let nested = objects
        .iter()
        .find(|o| o.key.ends_with("nested/c.txt"))
        .expect("nested object should be listed");
    assert_eq!(nested.size, 33);
    Ok(())
}

async fn test_prefix_respects_separator(
    store: &dyn ObjectStore,
    bucket: &str,
    root: &str,
) -> Result<(), StoreError> {
    let objects = walk(store, bucket, root).await?;
    assert!(
        objects.iter().all(|o| o.key.starts_with(root)),
        "every listed key should start with the prefix"
    );
    assert!(
        !objects.iter().any(|o| o.key.ends_with("decoy.txt")),
        "keys that only share the prefix as a string must not be listed"
    );
    Ok(())
}

async fn test_empty_prefix_listing(
    store: &dyn ObjectStore,
    bucket: &str,
    root: &str,
) -> Result<(), StoreError> {
    let prefix = format!("{root}does-not-exist/");
    let objects = walk(store, bucket, &prefix).await?;
    assert!(objects.is_empty(), "listing an empty prefix should succeed with no objects");
    Ok(())
}

async fn test_sign_url(
    store: &dyn ObjectStore,
    bucket: &str,
    root: &str,
) -> Result<(), StoreError> {
    let key = format!("{root}a.txt");
    let url = store
        .sign_url(bucket, &key, Utc::now() + TimeDelta::hours(1))
        .await?;
    assert!(!url.is_empty(), "signed url should not be empty");
    Ok(())
}
