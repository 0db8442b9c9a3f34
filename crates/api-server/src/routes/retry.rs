//! Retry composition API
//!
//! Turns the error panel's retry dialog into the request body the agent
//! service's retry endpoint accepts.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use dash_core::retry::{RetryOptions, RetryOptionsComposer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{core_error, RouteError};
use crate::state::AppState;

/// Retry dialog inputs; omitted toggles keep the safe defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryDialogRequest {
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub from_checkpoint: Option<bool>,
    #[serde(default)]
    pub increase_turns: Option<bool>,
    #[serde(default)]
    pub use_stronger_model: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryRequestResponse {
    pub run_id: Uuid,
    pub options: RetryOptions,
    pub requested_at: DateTime<Utc>,
}

async fn compose_retry(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    Json(req): Json<RetryDialogRequest>,
) -> Result<Json<RetryRequestResponse>, RouteError> {
    let mut composer = RetryOptionsComposer::with_config(state.retry_config());
    if let Some(feedback) = req.feedback {
        composer = composer.feedback(feedback);
    }
    if let Some(enabled) = req.from_checkpoint {
        composer = composer.from_checkpoint(enabled);
    }
    if let Some(enabled) = req.increase_turns {
        composer = composer.increase_turns(enabled);
    }
    if let Some(enabled) = req.use_stronger_model {
        composer = composer.use_stronger_model(enabled);
    }

    let response = composer
        .submit(|options| RetryRequestResponse {
            run_id,
            options,
            requested_at: Utc::now(),
        })
        .map_err(core_error)?;

    tracing::info!(%run_id, "Composed retry request");
    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/runs/{run_id}/retry", post(compose_retry))
}
