//! Queue feed API
//!
//! The queue service pushes snapshots and removals here; dashboard clients
//! read the rendered waiting indicators back.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dash_core::queue::{QueueDisplay, QueueSnapshot, QueueUpdate, RemovalReason};
use queue_feed::FeedError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{core_error, plain_error, RouteError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub task_id: Uuid,
    pub receivers: usize,
}

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub reason: String,
}

fn feed_error(err: FeedError) -> RouteError {
    match err {
        FeedError::Rejected(e) => core_error(e),
        FeedError::NoSubscribers | FeedError::Closed => {
            plain_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    }
}

fn publish(state: &AppState, update: QueueUpdate) -> Result<(StatusCode, Json<PublishResponse>), RouteError> {
    let task_id = update.task_id();
    let receivers = state.feed().publish(update).map_err(feed_error)?;
    // Only the renderer subscribes, so zero receivers means it has stopped
    if receivers == 0 {
        tracing::error!(%task_id, "Queue renderer is not running, update dropped");
        return Err(feed_error(FeedError::NoSubscribers));
    }
    Ok((
        StatusCode::ACCEPTED,
        Json(PublishResponse { task_id, receivers }),
    ))
}

async fn publish_snapshot(
    State(state): State<AppState>,
    Json(snapshot): Json<QueueSnapshot>,
) -> Result<(StatusCode, Json<PublishResponse>), RouteError> {
    publish(&state, QueueUpdate::Snapshot(snapshot))
}

async fn remove_from_queue(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Query(query): Query<RemoveQuery>,
) -> Result<(StatusCode, Json<PublishResponse>), RouteError> {
    let reason: RemovalReason = query.reason.parse().map_err(core_error)?;
    publish(&state, QueueUpdate::Removed { task_id, reason })
}

async fn get_display(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<QueueDisplay>, RouteError> {
    state
        .board()
        .get(task_id)
        .await
        .map(Json)
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "Task is not queued"))
}

async fn list_displays(State(state): State<AppState>) -> Json<Vec<QueueDisplay>> {
    Json(state.board().list().await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/queue", get(list_displays))
        .route("/api/queue/snapshots", post(publish_snapshot))
        .route(
            "/api/queue/{task_id}",
            get(get_display).delete(remove_from_queue),
        )
}
