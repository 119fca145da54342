//! Request handling errors and their response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use plantd_service::RenderError;
use serde::Serialize;

use crate::handlers::{METHOD_SYNC, timestamp_millis};

/// Errors surfaced by the synchronous JSON endpoints.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Request carried a blank diagram source; rejected before the service.
    #[error("plantumlText is required")]
    BlankSource,

    /// The rendering service reported a failure.
    #[error("Failed to generate diagram: {0}")]
    Render(#[from] RenderError),

    /// The blocking render task itself failed (panic or cancellation).
    #[error("Render task failed: {0}")]
    Worker(String),
}

/// JSON error body for synchronous endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    method: &'static str,
    timestamp: i64,
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BlankSource => StatusCode::BAD_REQUEST,
            Self::Render(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            method: METHOD_SYNC,
            timestamp: timestamp_millis(),
        };
        (status, Json(body)).into_response()
    }
}
