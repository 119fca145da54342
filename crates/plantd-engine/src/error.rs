//! Engine invocation errors.

use std::io;
use std::process::ExitStatus;

/// Error raised while invoking the external PlantUML engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine command could not be started.
    #[error("failed to start engine command '{command}': {source}")]
    Spawn {
        /// Command that was attempted.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O with the engine process failed after it was started.
    #[error("engine I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The engine exited with a failure status.
    ///
    /// The message is the engine's own stderr output, trimmed.
    #[error("engine exited with {status}: {message}")]
    Failed {
        /// Exit status reported by the engine process.
        status: ExitStatus,
        /// Engine-reported error message.
        message: String,
    },
}

impl EngineError {
    /// The engine-reported message, when one exists.
    #[must_use]
    pub fn engine_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            Self::Spawn { .. } | Self::Io(_) => None,
        }
    }
}
