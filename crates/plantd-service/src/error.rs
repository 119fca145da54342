//! Render failure type.

use plantd_engine::{EngineError, OutputFormat};

/// A render request failed.
///
/// Wraps the engine's own failure with the requested output format. The
/// message originates from the engine whenever one is available; the
/// service never substitutes a pre-emptive message of its own.
#[derive(Debug, thiserror::Error)]
#[error("failed to generate {format} diagram: {message}")]
pub struct RenderError {
    /// Output format of the failed render.
    pub format: OutputFormat,
    /// Failure message, engine-reported where possible.
    pub message: String,
    /// Underlying engine error, when the failure came from the engine.
    #[source]
    pub source: Option<EngineError>,
}

impl RenderError {
    /// Wrap an engine failure.
    #[must_use]
    pub fn engine(format: OutputFormat, source: EngineError) -> Self {
        Self {
            format,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// A failure in the service layer itself (worker panic, bad output
    /// encoding). Carries no engine error.
    #[must_use]
    pub fn service(format: OutputFormat, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
            source: None,
        }
    }
}
