// Presentation layer - HTTP routes and shared handler state
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, panel_charts, recent_mp_tasks, refresh_panel};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Compression is applied per response by the handlers, so no
/// compression layer sits on the router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/charts/:panel", get(panel_charts))
        .route("/charts/:panel/refresh", post(refresh_panel))
        .route("/mp/tasks", get(recent_mp_tasks))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
