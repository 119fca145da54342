//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use plantd_service::RenderService;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Rendering service.
    pub(crate) service: Arc<RenderService>,
    /// Application version reported by the info endpoint.
    pub(crate) version: String,
}
