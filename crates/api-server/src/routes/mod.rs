//! Route handlers

pub mod display;
pub mod health;
pub mod queue;
pub mod retry;
pub mod settings;

use axum::{http::StatusCode, Json};
use dash_core::{Error, ServiceErrorKind, ValidationErrors};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

/// Map a core error onto a status and JSON body
pub fn core_error(err: Error) -> RouteError {
    match err {
        Error::InvalidInput(message) => {
            tracing::warn!("Rejected invalid input: {}", message);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: message,
                    code: None,
                    errors: None,
                }),
            )
        }
        Error::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Validation failed".to_string(),
                code: None,
                errors: Some(errors),
            }),
        ),
        Error::Service(service) => {
            let status = match service.kind() {
                ServiceErrorKind::NotFound => StatusCode::NOT_FOUND,
                ServiceErrorKind::Conflict => StatusCode::CONFLICT,
                ServiceErrorKind::Invalid => StatusCode::BAD_REQUEST,
            };
            (
                status,
                Json(ErrorResponse {
                    error: service.message,
                    code: Some(service.code.as_str().to_string()),
                    errors: None,
                }),
            )
        }
    }
}

/// Plain error with no code or field errors
pub fn plain_error(status: StatusCode, message: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: None,
            errors: None,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::{ServiceError, ServiceErrorCode};

    #[test]
    fn test_core_error_statuses() {
        let (status, _) = core_error(Error::invalid_input("bad"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut errors = ValidationErrors::new();
        errors.insert("feedback", "too long");
        let (status, Json(body)) = core_error(Error::Validation(errors));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.errors.unwrap().get("feedback"), Some("too long"));

        let (status, Json(body)) = core_error(
            ServiceError::new(ServiceErrorCode::ProjectHasRunningAgents, "busy").into(),
        );
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code.as_deref(), Some("PROJECT_HAS_RUNNING_AGENTS"));

        let (status, _) =
            core_error(ServiceError::new(ServiceErrorCode::ProjectNotFound, "gone").into());
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
