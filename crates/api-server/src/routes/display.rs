//! Stateless display computations for agent progress, wait times and
//! error panels

use axum::{
    extract::Query,
    routing::{get, post},
    Json, Router,
};
use dash_core::agent::{AgentError, ErrorPanel, Progress, DEFAULT_STACK_PREVIEW_LINES};
use dash_core::queue::format_wait;
use serde::{Deserialize, Serialize};

use super::{core_error, RouteError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub turn: i64,
    pub max_turns: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub progress: Progress,
    pub label: String,
    pub finishing_soon: bool,
}

async fn compute_progress(
    Json(req): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>, RouteError> {
    let progress = Progress::compute(req.turn, req.max_turns).map_err(core_error)?;
    Ok(Json(ProgressResponse {
        label: progress.label(),
        finishing_soon: progress.is_finishing_soon(),
        progress,
    }))
}

#[derive(Debug, Deserialize)]
pub struct WaitQuery {
    pub ms: i64,
}

#[derive(Debug, Serialize)]
pub struct WaitResponse {
    pub ms: i64,
    pub label: String,
}

async fn wait_estimate(Query(query): Query<WaitQuery>) -> Result<Json<WaitResponse>, RouteError> {
    let label = format_wait(query.ms).map_err(core_error)?;
    Ok(Json(WaitResponse {
        ms: query.ms,
        label,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPanelRequest {
    pub error: AgentError,
    #[serde(default)]
    pub stack_lines: Option<usize>,
}

async fn error_panel(Json(req): Json<ErrorPanelRequest>) -> Json<ErrorPanel> {
    let lines = req.stack_lines.unwrap_or(DEFAULT_STACK_PREVIEW_LINES);
    Json(ErrorPanel::from_error(&req.error, lines))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/progress", post(compute_progress))
        .route("/api/wait-estimate", get(wait_estimate))
        .route("/api/errors/display", post(error_panel))
}
