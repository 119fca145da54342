//! HTTP server for PlantD.
//!
//! This crate provides a native Rust HTTP server using axum, exposing the
//! rendering service as a REST API under `/api/plantuml`:
//!
//! - `POST /svg`, `POST /png`: synchronous diagram rendering
//! - `POST /svg/async`: rendering through the bounded async pool
//! - `POST /validate`: render-based syntax validation
//! - `GET /health`: render-path health probe plus statistics
//! - `GET /info`: static capability descriptor
//!
//! # Quick Start
//!
//! ```ignore
//! use plantd_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 8080,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use plantd_engine::Engine;
use plantd_service::RenderService;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Engine command to invoke for rendering.
    pub engine_command: PathBuf,
    /// Explicitly configured GraphViz dot path (probed first by the
    /// locator; `None` means built-in candidates only).
    pub graphviz_dot: Option<PathBuf>,
    /// Application version (reported by the info endpoint).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            engine_command: PathBuf::from("plantuml"),
            graphviz_dot: None,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// Initializes the rendering service (layout tool discovery, version probe,
/// startup self-test) before accepting requests; initialization failures
/// degrade the service but never prevent startup.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Engine::new(config.engine_command.clone());
    let service = Arc::new(RenderService::new(engine, config.graphviz_dot.clone()));

    // Startup sequence runs probe renders; keep it off the async runtime.
    {
        let service = Arc::clone(&service);
        tokio::task::spawn_blocking(move || service.init()).await?;
    }

    let state = Arc::new(AppState {
        service,
        version: config.version.clone(),
    });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
