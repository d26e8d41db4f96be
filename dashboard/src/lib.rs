use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub mod aggregate;
pub mod config;
pub mod handlers;
pub mod render;
pub mod state;
pub mod system;

use crate::handlers::{dashboard_handler, health_handler, snapshot_api};
use crate::state::AppState;

/// GET-only routes; any other method gets 405 from the method router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/snapshot", get(snapshot_api))
        .route("/healthz", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
