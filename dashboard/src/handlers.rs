use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::error;
use vram_view_shared::AggregationResult;

use crate::render::render_dashboard;
use crate::state::AppState;

// Data-layer failures render as a banner with status 200.
pub async fn dashboard_handler(State(state): State<AppState>) -> Response {
    let result = state.aggregator.snapshot().await;

    match render_dashboard(&result, &state.config) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "failed to render dashboard");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render template").into_response()
        }
    }
}

pub async fn snapshot_api(State(state): State<AppState>) -> Json<AggregationResult> {
    Json(state.aggregator.snapshot().await)
}

pub async fn health_handler() -> &'static str {
    "ok"
}
