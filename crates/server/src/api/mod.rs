pub mod folders;
pub mod health;
pub mod openapi;
pub mod render;
pub mod schemas;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use folio_engine::FolderService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::error::ServerError;

use self::openapi::ApiDoc;
use self::render::Renderer;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Grant lifecycle and listing service.
    pub service: Arc<FolderService>,
    /// Externally visible origin used for folder links, if configured.
    pub external_url: Option<String>,
    /// Compiled HTML/XML listing templates.
    pub renderer: Arc<Renderer>,
}

impl AppState {
    /// Wrap `service` and compile the listing templates.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Render`] if a template does not compile.
    pub fn new(
        service: Arc<FolderService>,
        external_url: Option<String>,
    ) -> Result<Self, ServerError> {
        Ok(Self {
            service,
            external_url,
            renderer: Arc::new(Renderer::new()?),
        })
    }
}

/// Build the Axum router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .route(folders::FOLDERS_PATH, post(folders::create_folder))
        .route(
            "/v1/folders/{id}",
            get(folders::list_folder).delete(folders::delete_folder),
        )
        .route("/v1/folders/{id}/{*path}", get(folders::list_folder_path))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
