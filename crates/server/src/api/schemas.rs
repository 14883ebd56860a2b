use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving.
    #[schema(example = "ok")]
    pub status: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "folder not found")]
    pub error: String,
}

/// Body of `POST /v1/folders`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateFolderRequest {
    /// Object key prefix to expose. Leading and trailing `/` are ignored.
    #[schema(example = "reports/2026")]
    pub prefix: Option<String>,
}
