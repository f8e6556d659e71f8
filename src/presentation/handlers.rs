// HTTP request handlers
use crate::application::chart_panel::RefreshOutcome;
use crate::domain::time_range::PendingRange;
use crate::error::DashboardError;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::{AppState, PanelId, PanelView};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshQuery {
    pub start_at: Option<DateTime<FixedOffset>>,
    pub end_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    pub hours: Option<i64>,
}

#[derive(Serialize)]
struct RefreshResponse {
    outcome: RefreshOutcome,
    #[serde(flatten)]
    panel: PanelView,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current charts of one panel
pub async fn panel_charts(
    Path(panel): Path<PanelId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let view = state.view(panel).await;
    match json_response(&view, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Run a refresh cycle of one panel over `startAt..endAt` and return its charts
pub async fn refresh_panel(
    Path(panel): Path<PanelId>,
    Query(query): Query<RefreshQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let pending = PendingRange {
        start_at: query.start_at,
        end_at: query.end_at,
    };

    let outcome = match state.refresh(panel, pending).await {
        Ok(outcome) => outcome,
        Err(e) => return error_response(e),
    };

    let body = RefreshResponse {
        outcome,
        panel: state.view(panel).await,
    };
    match json_response(&body, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// MP tasks created in the last `hours` hours
pub async fn recent_mp_tasks(
    Query(query): Query<TasksQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hours = query.hours.unwrap_or(state.mp_task_lookback_hours);
    match state.mp_service.recent_tasks(hours).await {
        Ok(rows) => match json_response(&rows, accepts_brotli(&headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => error_response(e),
    }
}

fn error_response(error: DashboardError) -> Response {
    let status = match error {
        DashboardError::InvalidRange { .. } | DashboardError::InvalidLookback { .. } => StatusCode::BAD_REQUEST,
        DashboardError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        DashboardError::Http { .. } | DashboardError::Transport { .. } | DashboardError::Malformed(_) => {
            StatusCode::BAD_GATEWAY
        }
        DashboardError::Superseded => StatusCode::CONFLICT,
    };
    tracing::error!("Request failed with {}: {}", status, error);
    (status, error.to_string()).into_response()
}
