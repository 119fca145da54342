//! Render and validate endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use plantd_service::Validity;
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{
    DiagramRequest, LICENSE, METHOD_ASYNC, METHOD_SYNC, run_blocking, timestamp_millis,
};
use crate::state::AppState;

/// Response for POST /api/plantuml/svg.
#[derive(Serialize)]
struct SvgResponse {
    svg: String,
    method: &'static str,
    license: &'static str,
    performance: String,
    timestamp: i64,
}

/// Response for POST /api/plantuml/svg/async.
#[derive(Serialize)]
struct AsyncSvgResponse {
    svg: String,
    method: &'static str,
    license: &'static str,
    timestamp: i64,
}

/// Error body for the async endpoint.
#[derive(Serialize)]
struct AsyncErrorBody {
    error: String,
    method: &'static str,
}

/// Response for POST /api/plantuml/validate.
#[derive(Serialize)]
pub(crate) struct ValidateResponse {
    valid: bool,
    text: String,
    timestamp: i64,
}

/// Handle POST /api/plantuml/svg.
pub(crate) async fn svg(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DiagramRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let text = request.non_blank()?;
    let started = Instant::now();

    let service = Arc::clone(&state.service);
    let svg = run_blocking(move || service.render_svg(&text)).await?;

    Ok(Json(SvgResponse {
        svg,
        method: METHOD_SYNC,
        license: LICENSE,
        performance: format!("{}ms", started.elapsed().as_millis()),
        timestamp: timestamp_millis(),
    }))
}

/// Handle POST /api/plantuml/png.
///
/// Success is raw PNG bytes; failure is a bare 500 with an empty body.
pub(crate) async fn png(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DiagramRequest>,
) -> Response {
    let Ok(text) = request.non_blank() else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let service = Arc::clone(&state.service);
    match run_blocking(move || service.render_png(&text)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "PNG generation failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle POST /api/plantuml/svg/async.
pub(crate) async fn svg_async(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DiagramRequest>,
) -> Response {
    let text = match request.non_blank() {
        Ok(text) => text,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AsyncErrorBody {
                    error: err.to_string(),
                    method: METHOD_ASYNC,
                }),
            )
                .into_response();
        }
    };

    match state.service.render_svg_async(&text).await {
        Ok(svg) => Json(AsyncSvgResponse {
            svg,
            method: METHOD_ASYNC,
            license: LICENSE,
            timestamp: timestamp_millis(),
        })
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "async SVG generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AsyncErrorBody {
                    error: format!("Async generation failed: {err}"),
                    method: METHOD_ASYNC,
                }),
            )
                .into_response()
        }
    }
}

/// Handle POST /api/plantuml/validate.
///
/// Never reports a server error for invalid input; any render failure is
/// `valid: false`.
pub(crate) async fn validate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DiagramRequest>,
) -> Result<Json<ValidateResponse>, ServerError> {
    let text = request.non_blank()?;

    let service = Arc::clone(&state.service);
    let probe = text.clone();
    let validity = tokio::task::spawn_blocking(move || service.validate(&probe))
        .await
        .unwrap_or_else(|err| Validity::Invalid(err.to_string()));

    Ok(Json(ValidateResponse {
        valid: validity.is_valid(),
        text,
        timestamp: timestamp_millis(),
    }))
}
