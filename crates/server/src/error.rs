use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_engine::EngineError;
use thiserror::Error;
use tracing::error;

/// Errors that can occur when running the Folio server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An engine error surfaced through the API.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A response template failed to render.
    #[error("render error: {0}")]
    Render(String),
}

impl ServerError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Engine(EngineError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::NotFound) => StatusCode::NOT_FOUND,
            Self::Engine(EngineError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            Self::Engine(EngineError::Configuration(_))
            | Self::Config(_)
            | Self::Io(_)
            | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use folio_store::StoreError;

    use super::*;

    #[test]
    fn engine_errors_map_to_statuses() {
        let cases = [
            (
                ServerError::from(EngineError::BadRequest("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ServerError::from(EngineError::NotFound), StatusCode::NOT_FOUND),
            (
                ServerError::from(EngineError::Upstream(StoreError::Connection("reset".into()))),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ServerError::Config("nope".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn bad_request_message_is_passed_through() {
        let err = ServerError::from(EngineError::BadRequest(
            "Missing required parameter folderId".into(),
        ));
        assert_eq!(err.to_string(), "Missing required parameter folderId");
    }
}
