//! HTTP request handlers.

pub(crate) mod render;
pub(crate) mod status;

use plantd_service::RenderError;
use serde::Deserialize;

use crate::error::ServerError;

/// Render method tag for synchronous responses.
pub(crate) const METHOD_SYNC: &str = "plantuml-pipe";

/// Render method tag for async responses.
pub(crate) const METHOD_ASYNC: &str = "plantuml-pipe-async";

/// License tag reported in responses.
pub(crate) const LICENSE: &str = "MIT";

/// Request body for render and validate endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiagramRequest {
    /// Diagram markup text.
    pub(crate) plantuml_text: String,
}

impl DiagramRequest {
    /// Extract the source text, rejecting blank input before it reaches
    /// the rendering service.
    pub(crate) fn non_blank(self) -> Result<String, ServerError> {
        if self.plantuml_text.trim().is_empty() {
            Err(ServerError::BlankSource)
        } else {
            Ok(self.plantuml_text)
        }
    }
}

/// Current time as epoch milliseconds.
pub(crate) fn timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Run a blocking render operation off the async runtime.
pub(crate) async fn run_blocking<T, F>(job: F) -> Result<T, ServerError>
where
    F: FnOnce() -> Result<T, RenderError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(ServerError::from),
        Err(err) => Err(ServerError::Worker(err.to_string())),
    }
}
