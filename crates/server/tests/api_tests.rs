use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use chrono::{DateTime, TimeDelta, Utc};
use tower::ServiceExt;

use folio_core::AccessGrant;
use folio_engine::FolderServiceBuilder;
use folio_server::api::{AppState, router};
use folio_store::{GrantStore, ListPage, ObjectStore, StoreError};
use folio_store_memory::{MemoryGrantStore, MemoryObjectStore};

const BUCKET: &str = "folio";

// -- Failing object store -------------------------------------------------

struct UnreachableObjectStore;

#[async_trait]
impl ObjectStore for UnreachableObjectStore {
    async fn list_objects(
        &self,
        _bucket: &str,
        _prefix: &str,
        _continuation_token: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }

    async fn sign_url(
        &self,
        _bucket: &str,
        _key: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }
}

// -- Helpers --------------------------------------------------------------

struct Harness {
    grants: Arc<MemoryGrantStore>,
    state: AppState,
}

fn seeded_objects() -> Arc<MemoryObjectStore> {
    let objects = MemoryObjectStore::with_page_size(2);
    objects.create_bucket(BUCKET);
    objects.put(BUCKET, "reports/", 0);
    objects.put(BUCKET, "reports/summary.txt", 3);
    objects.put(BUCKET, "reports/q1/jan.csv", 10);
    objects.put(BUCKET, "reports/q1/feb.csv", 11);
    objects.put(BUCKET, "reports/q1/archive/old.csv", 12);
    objects.put(BUCKET, "reports/my docs/r&d <draft>.txt", 5);
    objects.put(BUCKET, "reports/alpha/readme.md", 7);
    objects.put(BUCKET, "other/secret.txt", 99);
    Arc::new(objects)
}

fn harness_with(objects: Arc<dyn ObjectStore>, external_url: Option<&str>) -> Harness {
    let grants = Arc::new(MemoryGrantStore::new());
    let service = FolderServiceBuilder::new()
        .grant_store(Arc::clone(&grants) as Arc<dyn GrantStore>)
        .object_store(objects)
        .bucket(BUCKET)
        .build()
        .expect("service should build");
    let state = AppState::new(Arc::new(service), external_url.map(str::to_owned))
        .expect("templates should compile");
    Harness { grants, state }
}

fn harness() -> Harness {
    harness_with(seeded_objects(), None)
}

async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, String) {
    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn send_json(state: &AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(state, request).await;
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(http::header::HOST, "files.test")
        .body(Body::empty())
        .unwrap()
}

fn get_accepting(uri: &str, accept: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(http::header::HOST, "files.test")
        .header(http::header::ACCEPT, accept)
        .body(Body::empty())
        .unwrap()
}

fn create(body: &str) -> Request<Body> {
    Request::builder()
        .method(http::Method::POST)
        .uri("/v1/folders")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(http::Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_grant(state: &AppState, prefix: &str) -> String {
    let body = serde_json::json!({ "prefix": prefix }).to_string();
    let (status, json) = send_json(state, create(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_owned()
}

fn names(listing: &serde_json::Value) -> Vec<&str> {
    listing
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["relativePath"].as_str().unwrap())
        .collect()
}

// -- Health & docs --------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let h = harness();
    let (status, json) = send_json(&h.state, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn openapi_document_lists_folder_routes() {
    let h = harness();
    let (status, json) = send_json(&h.state, get("/api-doc/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    let paths = json["paths"].as_object().unwrap();
    assert!(paths.contains_key("/v1/folders"));
    assert!(paths.contains_key("/v1/folders/{id}"));
    assert!(paths.contains_key("/v1/folders/{id}/{path}"));
    assert!(json["components"]["schemas"]["Entry"].is_object());
}

// -- Grant creation -------------------------------------------------------

#[tokio::test]
async fn create_returns_normalized_grant() {
    let h = harness();
    let (status, json) = send_json(&h.state, create(r#"{"prefix":" /reports/ "}"#)).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = json["id"].as_str().unwrap();
    assert_eq!(id.len(), 32);
    assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
    assert_eq!(json["rootPrefix"], "reports");

    let created: DateTime<Utc> = json["createdAt"].as_str().unwrap().parse().unwrap();
    let expires: DateTime<Utc> = json["expiresAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(expires - created, TimeDelta::days(3));
    assert_eq!(h.grants.len(), 1);
}

#[tokio::test]
async fn create_rejects_blank_prefix() {
    let h = harness();
    let (status, json) = send_json(&h.state, create(r#"{"prefix":" // "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
    assert!(h.grants.is_empty());
}

#[tokio::test]
async fn create_requires_prefix() {
    let h = harness();
    let (status, json) = send_json(&h.state, create("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required parameter prefix");
}

#[tokio::test]
async fn create_rejects_malformed_body() {
    let h = harness();
    let (status, json) = send_json(&h.state, create("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

// -- Listing --------------------------------------------------------------

#[tokio::test]
async fn root_listing_is_json_by_default() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let (status, json) = send_json(&h.state, get(&format!("/v1/folders/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), ["alpha", "my docs", "q1", "summary.txt"]);

    let entries = json.as_array().unwrap();
    assert_eq!(entries[0]["isFolder"], true);
    assert_eq!(entries[0]["fileSize"], 0);
    assert_eq!(
        entries[1]["url"],
        format!("http://files.test/v1/folders/{id}/my%20docs")
    );
    assert_eq!(entries[3]["isFolder"], false);
    assert_eq!(entries[3]["fileSize"], 3);
    assert!(
        entries[3]["url"]
            .as_str()
            .unwrap()
            .starts_with("memory://folio/reports/summary.txt?expires=")
    );
}

#[tokio::test]
async fn sub_path_listing() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let (status, json) = send_json(&h.state, get(&format!("/v1/folders/{id}/q1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), ["archive", "feb.csv", "jan.csv"]);
    assert_eq!(
        json[0]["url"],
        format!("http://files.test/v1/folders/{id}/q1/archive")
    );

    let (status, json) = send_json(&h.state, get(&format!("/v1/folders/{id}/q1/archive/"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), ["old.csv"]);
}

#[tokio::test]
async fn percent_encoded_sub_path_is_decoded() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let (status, json) = send_json(&h.state, get(&format!("/v1/folders/{id}/my%20docs"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), ["r&d <draft>.txt"]);
}

#[tokio::test]
async fn listing_never_escapes_the_grant_root() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let (_, json) = send_json(&h.state, get(&format!("/v1/folders/{id}"))).await;
    assert!(!names(&json).contains(&"secret.txt"));
    assert!(!names(&json).contains(&"other"));
}

#[tokio::test]
async fn missing_folder_lists_empty() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let (status, json) = send_json(&h.state, get(&format!("/v1/folders/{id}/nope"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn external_url_drives_folder_links() {
    let h = harness_with(seeded_objects(), Some("https://files.example.com/"));
    let id = create_grant(&h.state, "reports").await;

    let (_, json) = send_json(&h.state, get(&format!("/v1/folders/{id}"))).await;
    assert_eq!(
        json[0]["url"],
        format!("https://files.example.com/v1/folders/{id}/alpha")
    );
}

// -- Formats --------------------------------------------------------------

#[tokio::test]
async fn html_listing_via_accept_header() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let response = router(h.state.clone())
        .oneshot(get_accepting(
            &format!("/v1/folders/{id}/my%20docs"),
            "text/html,application/xhtml+xml",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[http::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("r&amp;d &lt;draft&gt;.txt"));
    assert!(!html.contains("<draft>"));
}

#[tokio::test]
async fn xml_listing_via_query_parameter() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let response = router(h.state.clone())
        .oneshot(get(&format!("/v1/folders/{id}/q1?format=xml")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[http::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let xml = String::from_utf8(body.to_vec()).unwrap();
    assert_eq!(xml.matches("<entry ").count(), 3);
    assert!(xml.contains(r#"relativePath="archive" isFolder="true""#));
    assert!(xml.contains(r#"fileSize="11""#));
}

#[tokio::test]
async fn format_parameter_overrides_accept() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let (status, json) = send_json(
        &h.state,
        get_accepting(&format!("/v1/folders/{id}?format=json"), "text/html"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.is_array());
}

#[tokio::test]
async fn unknown_format_is_rejected() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;

    let (status, json) = send_json(&h.state, get(&format!("/v1/folders/{id}?format=yaml"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("yaml"));
}

// -- Grant gate -----------------------------------------------------------

#[tokio::test]
async fn unknown_grant_is_not_found() {
    let h = harness();
    let (status, json) = send_json(&h.state, get("/v1/folders/0123456789abcdef")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "folder not found");
}

#[tokio::test]
async fn expired_grant_is_indistinguishable_from_unknown() {
    let h = harness();
    let now = Utc::now();
    let expired = AccessGrant {
        id: "expiredgrant".into(),
        root_prefix: "reports".into(),
        created_at: now - TimeDelta::days(4),
        expires_at: now - TimeDelta::days(1),
    };
    h.grants.save(&expired).await.unwrap();

    let (status, json) = send_json(&h.state, get("/v1/folders/expiredgrant")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "folder not found");
}

#[tokio::test]
async fn malformed_grant_id_is_bad_request() {
    let h = harness();
    let (status, _) = send_json(&h.state, get("/v1/folders/not.a.grant")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn object_store_failure_is_bad_gateway() {
    let h = harness_with(Arc::new(UnreachableObjectStore), None);
    let id = create_grant(&h.state, "reports").await;

    let (status, json) = send_json(&h.state, get(&format!("/v1/folders/{id}"))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("connection refused"));
}

// -- Deletion -------------------------------------------------------------

#[tokio::test]
async fn delete_revokes_and_is_idempotent() {
    let h = harness();
    let id = create_grant(&h.state, "reports").await;
    let uri = format!("/v1/folders/{id}");

    let (status, _) = send(&h.state, delete(&uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(h.grants.is_empty());

    let (status, _) = send(&h.state, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.state, delete(&uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_rejects_malformed_id() {
    let h = harness();
    let (status, _) = send(&h.state, delete("/v1/folders/bad%20id")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
