use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_core::AccessGrant;
use folio_engine::{EngineError, ListingRequest};
use serde::Deserialize;
use utoipa::IntoParams;

use super::AppState;
use super::render::{Format, ListingView};
use super::schemas::{CreateFolderRequest, ErrorResponse};
use crate::error::ServerError;

/// Path under which listings are served; folder links point back here.
pub const FOLDERS_PATH: &str = "/v1/folders";

/// Query parameters accepted by the listing endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// Response format: `json`, `html` or `xml`. Overrides `Accept`.
    pub format: Option<String>,
}

/// `POST /v1/folders` -- issue a new grant for a prefix.
#[utoipa::path(
    post,
    path = "/v1/folders",
    tag = "Folders",
    summary = "Create folder grant",
    request_body(content = CreateFolderRequest, description = "Prefix to expose"),
    responses(
        (status = 201, description = "Grant created", body = AccessGrant),
        (status = 400, description = "Missing or empty prefix", body = ErrorResponse),
        (status = 502, description = "Grant store unavailable", body = ErrorResponse)
    )
)]
pub async fn create_folder(
    State(state): State<AppState>,
    body: Result<Json<CreateFolderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(request) = body.map_err(|e| EngineError::BadRequest(e.body_text()))?;
    let prefix = request
        .prefix
        .ok_or_else(|| EngineError::BadRequest("Missing required parameter prefix".into()))?;

    let grant = state.service.create_grant(&prefix).await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

/// `GET /v1/folders/{id}` -- list the root of a grant.
#[utoipa::path(
    get,
    path = "/v1/folders/{id}",
    tag = "Folders",
    summary = "List grant root",
    params(
        ("id" = String, Path, description = "Grant identifier"),
        ListingQuery
    ),
    responses(
        (status = 200, description = "Immediate children, folders first", body = Vec<folio_core::Entry>),
        (status = 400, description = "Malformed grant id or unknown format", body = ErrorResponse),
        (status = 404, description = "Grant unknown or expired", body = ErrorResponse),
        (status = 502, description = "Object store failure", body = ErrorResponse)
    )
)]
pub async fn list_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListingQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    respond_with_listing(&state, &id, "", query.format.as_deref(), &headers).await
}

/// `GET /v1/folders/{id}/{path}` -- list a sub-folder of a grant.
#[utoipa::path(
    get,
    path = "/v1/folders/{id}/{path}",
    tag = "Folders",
    summary = "List grant sub-folder",
    params(
        ("id" = String, Path, description = "Grant identifier"),
        ("path" = String, Path, description = "Sub-folder below the grant root, `/`-separated"),
        ListingQuery
    ),
    responses(
        (status = 200, description = "Immediate children, folders first", body = Vec<folio_core::Entry>),
        (status = 400, description = "Malformed grant id or unknown format", body = ErrorResponse),
        (status = 404, description = "Grant unknown or expired", body = ErrorResponse),
        (status = 502, description = "Object store failure", body = ErrorResponse)
    )
)]
pub async fn list_folder_path(
    State(state): State<AppState>,
    Path((id, path)): Path<(String, String)>,
    Query(query): Query<ListingQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    respond_with_listing(&state, &id, &path, query.format.as_deref(), &headers).await
}

/// `DELETE /v1/folders/{id}` -- revoke a grant.
#[utoipa::path(
    delete,
    path = "/v1/folders/{id}",
    tag = "Folders",
    summary = "Delete folder grant",
    description = "Idempotent: succeeds whether or not the grant existed.",
    params(("id" = String, Path, description = "Grant identifier")),
    responses(
        (status = 204, description = "Grant removed"),
        (status = 400, description = "Malformed grant id", body = ErrorResponse),
        (status = 502, description = "Grant store unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.service.delete_grant(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn respond_with_listing(
    state: &AppState,
    grant_id: &str,
    sub_path: &str,
    format: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    let format = Format::negotiate(format, accept)?;
    let base_url = listing_base_url(state.external_url.as_deref(), headers);

    let entries = state
        .service
        .list_folder(ListingRequest {
            grant_id,
            sub_path,
            base_url: &base_url,
        })
        .await?;

    state.renderer.respond(
        format,
        &ListingView {
            grant_id,
            path: sub_path,
            entries: &entries,
        },
    )
}

/// Externally visible listing root: the configured external URL, or one
/// derived from `X-Forwarded-Proto` and `Host`.
fn listing_base_url(external_url: Option<&str>, headers: &HeaderMap) -> String {
    let origin = match external_url {
        Some(url) => url.trim_end_matches('/').to_owned(),
        None => {
            let proto = headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or("http");
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("localhost");
            format!("{proto}://{host}")
        }
    };
    format!("{origin}{FOLDERS_PATH}")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn external_url_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:8080"));
        assert_eq!(
            listing_base_url(Some("https://files.example.com/"), &headers),
            "https://files.example.com/v1/folders"
        );
    }

    #[test]
    fn derived_from_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("files.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(
            listing_base_url(None, &headers),
            "https://files.example.com/v1/folders"
        );
    }

    #[test]
    fn falls_back_to_plain_http_localhost() {
        assert_eq!(
            listing_base_url(None, &HeaderMap::new()),
            "http://localhost/v1/folders"
        );
    }
}
