//! Health and info endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::handlers::{LICENSE, timestamp_millis};
use crate::state::AppState;

/// Response for GET /api/plantuml/health.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthResponse {
    status: &'static str,
    message: &'static str,
    license: &'static str,
    commercial: bool,
    timestamp: i64,
    /// `"available"` when the render probe succeeded, `"error"` otherwise.
    plantuml: &'static str,
    stats: StatsResponse,
}

/// Service statistics in health responses.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    version: String,
    license: &'static str,
    commercial: bool,
    thread_pool: String,
    graphviz: GraphvizStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    self_test: Option<SelfTestStats>,
}

/// GraphViz availability in health responses.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphvizStats {
    available: bool,
    path: String,
}

/// Startup self-test outcome in health responses.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelfTestStats {
    engine: bool,
    layout: bool,
}

/// Response for GET /api/plantuml/info.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InfoResponse {
    server: &'static str,
    version: String,
    license: &'static str,
    plantuml_version: String,
    commercial_use: bool,
    features: &'static [&'static str],
}

/// Handle GET /api/plantuml/health.
///
/// Runs a live render probe; distinct from process liveness.
pub(crate) async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let service = Arc::clone(&state.service);
    let healthy = tokio::task::spawn_blocking(move || service.health_check())
        .await
        .unwrap_or(false);

    let stats = state.service.stats();
    let self_test = state.service.self_test();

    Json(HealthResponse {
        status: "OK",
        message: "PlantD diagram rendering server",
        license: LICENSE,
        commercial: true,
        timestamp: timestamp_millis(),
        plantuml: if healthy { "available" } else { "error" },
        stats: StatsResponse {
            version: stats.engine_version,
            license: stats.license,
            commercial: stats.commercial_use,
            thread_pool: format!(
                "fixed pool: {} of {} workers idle",
                stats.pool_idle, stats.pool_capacity
            ),
            graphviz: GraphvizStats {
                available: stats.graphviz_available,
                path: stats
                    .graphviz_path
                    .map_or_else(|| "not configured".to_owned(), |p| p.display().to_string()),
            },
            self_test: self_test.map(|outcome| SelfTestStats {
                engine: outcome.engine_ok,
                layout: outcome.layout_ok,
            }),
        },
    })
}

/// Handle GET /api/plantuml/info.
pub(crate) async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    let stats = state.service.stats();

    Json(InfoResponse {
        server: "PlantD",
        version: state.version.clone(),
        license: LICENSE,
        plantuml_version: stats.engine_version,
        commercial_use: stats.commercial_use,
        features: &[
            "SVG and PNG diagram generation",
            "Async generation with bounded concurrency",
            "Render-based syntax validation",
            "GraphViz auto-discovery with graceful degradation",
            "Startup render self-test",
        ],
    })
}
