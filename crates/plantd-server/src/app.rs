//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/plantuml/svg", post(handlers::render::svg))
        .route("/api/plantuml/png", post(handlers::render::png))
        .route("/api/plantuml/svg/async", post(handlers::render::svg_async))
        .route("/api/plantuml/validate", post(handlers::render::validate))
        .route("/api/plantuml/health", get(handlers::status::health))
        .route("/api/plantuml/info", get(handlers::status::info))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[cfg(all(test, unix))]
mod tests {
    use pretty_assertions::assert_eq;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use plantd_engine::Engine;
    use plantd_service::RenderService;
    use tower::ServiceExt;

    use super::*;

    /// Write an executable stub engine script into `dir`.
    fn stub_engine(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("plantuml-stub");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn router_with(dir: &Path, body: &str) -> Router {
        let stub = stub_engine(dir, body);
        let service = Arc::new(RenderService::with_layout_tool(Engine::new(stub), None));
        create_router(Arc::new(AppState {
            service,
            version: "0.1.0-test".to_owned(),
        }))
    }

    fn ok_router(dir: &Path) -> Router {
        router_with(dir, "cat >/dev/null\nprintf '<svg>diagram</svg>'")
    }

    fn failing_router(dir: &Path) -> Router {
        router_with(dir, "cat >/dev/null\necho 'Syntax error on line 1' >&2\nexit 1")
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const RENDER_BODY: &str = r#"{"plantumlText": "@startuml\nAlice -> Bob: Test\n@enduml"}"#;

    #[tokio::test]
    async fn svg_renders_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let response = ok_router(dir.path())
            .oneshot(post_json("/api/plantuml/svg", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["svg"], "<svg>diagram</svg>");
        assert_eq!(json["method"], "plantuml-pipe");
        assert!(json["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn blank_text_is_rejected_with_400() {
        let dir = tempfile::tempdir().unwrap();
        let response = ok_router(dir.path())
            .oneshot(post_json("/api/plantuml/svg", r#"{"plantumlText": "  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "plantumlText is required");
    }

    #[tokio::test]
    async fn render_failure_is_500_with_error_body() {
        let dir = tempfile::tempdir().unwrap();
        let response = failing_router(dir.path())
            .oneshot(post_json("/api/plantuml/svg", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("Syntax error on line 1"));
        assert_eq!(json["method"], "plantuml-pipe");
    }

    #[tokio::test]
    async fn png_returns_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let response = ok_router(dir.path())
            .oneshot(post_json("/api/plantuml/png", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn png_failure_is_500_with_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let response = failing_router(dir.path())
            .oneshot(post_json("/api/plantuml/png", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn async_svg_matches_sync_result() {
        let dir = tempfile::tempdir().unwrap();
        let response = ok_router(dir.path())
            .oneshot(post_json("/api/plantuml/svg/async", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["svg"], "<svg>diagram</svg>");
        assert_eq!(json["method"], "plantuml-pipe-async");
    }

    #[tokio::test]
    async fn async_blank_text_is_rejected_with_async_method_tag() {
        let dir = tempfile::tempdir().unwrap();
        let response = ok_router(dir.path())
            .oneshot(post_json("/api/plantuml/svg/async", r#"{"plantumlText": "  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "plantumlText is required");
        assert_eq!(json["method"], "plantuml-pipe-async");
    }

    #[tokio::test]
    async fn async_svg_failure_is_500_json() {
        let dir = tempfile::tempdir().unwrap();
        let response = failing_router(dir.path())
            .oneshot(post_json("/api/plantuml/svg/async", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("Async generation failed"));
        assert_eq!(json["method"], "plantuml-pipe-async");
    }

    #[tokio::test]
    async fn validate_reports_invalid_without_erroring() {
        let dir = tempfile::tempdir().unwrap();
        let response = failing_router(dir.path())
            .oneshot(post_json("/api/plantuml/validate", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["valid"], false);
        assert!(json["text"].as_str().unwrap().contains("@startuml"));
    }

    #[tokio::test]
    async fn validate_reports_valid_source() {
        let dir = tempfile::tempdir().unwrap();
        let response = ok_router(dir.path())
            .oneshot(post_json("/api/plantuml/validate", RENDER_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["valid"], true);
    }

    #[tokio::test]
    async fn health_reports_available_engine() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/api/plantuml/health")
            .body(Body::empty())
            .unwrap();
        let response = ok_router(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "OK");
        assert_eq!(json["plantuml"], "available");
        assert_eq!(json["stats"]["graphviz"]["available"], false);
        assert_eq!(json["stats"]["graphviz"]["path"], "not configured");
    }

    #[tokio::test]
    async fn health_reports_broken_engine() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/api/plantuml/health")
            .body(Body::empty())
            .unwrap();
        let response = failing_router(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["plantuml"], "error");
    }

    #[tokio::test]
    async fn info_reports_capabilities() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/api/plantuml/info")
            .body(Body::empty())
            .unwrap();
        let response = ok_router(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["server"], "PlantD");
        assert_eq!(json["version"], "0.1.0-test");
        assert!(json["features"].as_array().unwrap().len() >= 4);
    }
}
