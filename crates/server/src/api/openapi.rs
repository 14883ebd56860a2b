#![allow(clippy::needless_for_each)]

use folio_core::{AccessGrant, Entry};

use super::schemas::{CreateFolderRequest, ErrorResponse, HealthResponse};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "0.1.0",
        description = "Time-limited folder grants over an object store, listed one level at a time with signed download links.",
        license(name = "MIT")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Folders", description = "Folder grants and listings")
    ),
    paths(
        super::health::health,
        super::folders::create_folder,
        super::folders::list_folder,
        super::folders::list_folder_path,
        super::folders::delete_folder,
    ),
    components(schemas(
        AccessGrant,
        Entry,
        CreateFolderRequest,
        ErrorResponse,
        HealthResponse,
    ))
)]
pub struct ApiDoc;
