//! Project settings validation API
//!
//! Called on every field blur and on submit. Saving is the project
//! service's job; this only reports field errors.

use std::path::PathBuf;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use dash_core::project::{SettingsForm, SettingsFormValidator};
use dash_core::ValidationErrors;
use git_probe::PathProbe;
use serde::Serialize;

use super::{plain_error, RouteError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSettingsResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

async fn validate_settings(
    State(state): State<AppState>,
    Json(form): Json<SettingsForm>,
) -> Result<Json<ValidateSettingsResponse>, RouteError> {
    let paths: Vec<PathBuf> = form
        .path
        .iter()
        .map(|path| PathBuf::from(path.trim()))
        .filter(|path| !path.as_os_str().is_empty())
        .collect();

    let probed = state.probe().probe_all(&paths).await.map_err(|e| {
        tracing::error!("Path probe failed: {}", e);
        plain_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let errors = SettingsFormValidator::new(&probed).validate(&form);
    Ok(Json(ValidateSettingsResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings/validate", post(validate_settings))
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use git_probe::{PathFacts, PathProbe};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{config::ServerConfig, state::AppState};

    /// Reports `/repos/dash` as a git root and nothing else as existing
    struct FixedProbe;

    #[async_trait]
    impl PathProbe for FixedProbe {
        async fn probe(&self, path: &Path) -> git_probe::Result<PathFacts> {
            let is_repo = path == Path::new("/repos/dash");
            Ok(PathFacts {
                exists: is_repo,
                is_git_root: is_repo,
            })
        }
    }

    async fn validate(body: Value) -> (StatusCode, Value) {
        let state = AppState::with_probe(&ServerConfig::default(), Arc::new(FixedProbe));
        let app = super::router().with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/settings/validate")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn valid_form_has_no_errors() {
        let (status, payload) = validate(json!({
            "name": "dash",
            "path": "/repos/dash",
            "maxConcurrentAgents": 4,
            "maxTurns": 200,
            "worktreeRoot": ".worktrees",
            "defaultBranch": "main",
            "temperature": 0.3
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["valid"], true);
        assert_eq!(payload["errors"], json!({}));
    }

    #[tokio::test]
    async fn reports_each_failing_field() {
        let (status, payload) = validate(json!({
            "name": "",
            "maxConcurrentAgents": 11
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["valid"], false);
        assert_eq!(
            payload["errors"],
            json!({
                "name": "Project name is required",
                "maxConcurrentAgents": "Max concurrent agents must be between 1 and 10"
            })
        );
    }

    #[tokio::test]
    async fn unknown_path_is_reported() {
        let (_, payload) = validate(json!({ "path": "/nowhere" })).await;
        assert_eq!(payload["errors"]["path"], "Path does not exist");
    }
}
