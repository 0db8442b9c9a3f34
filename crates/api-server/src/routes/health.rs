//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    feed_subscribers: usize,
    renderer_running: bool,
    queued_tasks: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let renderer_running = state.renderer_running().await;
    Json(HealthResponse {
        status: if renderer_running { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        feed_subscribers: state.feed().subscriber_count(),
        renderer_running,
        queued_tasks: state.board().len().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
