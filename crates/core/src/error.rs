//! Error types for the core library

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed arguments to a pure function. Never shown to end users.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// User-correctable field errors, shown inline next to each field
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Failure reported by an external collaborator
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Field name to error message, ordered by field name.
///
/// Each field carries at most one message: the first rule it violated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field` unless one is already present
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Error::Validation`
    pub fn into_result(self) -> crate::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Error codes reported by the project and agent services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceErrorCode {
    ProjectNotFound,
    ProjectConfigInvalid,
    ProjectHasRunningAgents,
}

/// Broad classification used to pick a transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    NotFound,
    Conflict,
    Invalid,
}

impl ServiceErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::ProjectConfigInvalid => "PROJECT_CONFIG_INVALID",
            Self::ProjectHasRunningAgents => "PROJECT_HAS_RUNNING_AGENTS",
        }
    }

    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::ProjectNotFound => ServiceErrorKind::NotFound,
            Self::ProjectConfigInvalid => ServiceErrorKind::Invalid,
            Self::ProjectHasRunningAgents => ServiceErrorKind::Conflict,
        }
    }
}

impl FromStr for ServiceErrorCode {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "PROJECT_NOT_FOUND" => Ok(Self::ProjectNotFound),
            "PROJECT_CONFIG_INVALID" => Ok(Self::ProjectConfigInvalid),
            "PROJECT_HAS_RUNNING_AGENTS" => Ok(Self::ProjectHasRunningAgents),
            _ => Err(Error::invalid_input(format!(
                "Unknown service error code '{}'",
                value
            ))),
        }
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure reported by an external service.
///
/// The in-progress form state is kept; callers surface this as a transient
/// notification.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: ServiceErrorCode,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ServiceErrorKind {
        self.code.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_keep_first_message() {
        let mut errors = ValidationErrors::new();
        errors.insert("name", "first");
        errors.insert("name", "second");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("first"));
    }

    #[test]
    fn test_validation_errors_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.insert("maxTurns", "bad");
        let err = errors.into_result().unwrap_err();
        assert!(matches!(err, Error::Validation(ref e) if e.get("maxTurns") == Some("bad")));
        assert_eq!(err.to_string(), "Validation failed: maxTurns: bad");
    }

    #[test]
    fn test_validation_errors_serialize_as_map() {
        let mut errors = ValidationErrors::new();
        errors.insert("path", "Path does not exist");
        errors.insert("name", "Project name is required");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Project name is required",
                "path": "Path does not exist"
            })
        );
    }

    #[test]
    fn test_service_error_codes() {
        let err = ServiceError::new(ServiceErrorCode::ProjectHasRunningAgents, "2 agents running");
        assert_eq!(err.kind(), ServiceErrorKind::Conflict);
        assert_eq!(err.to_string(), "PROJECT_HAS_RUNNING_AGENTS: 2 agents running");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "PROJECT_HAS_RUNNING_AGENTS");

        assert_eq!(
            "PROJECT_NOT_FOUND".parse::<ServiceErrorCode>().unwrap(),
            ServiceErrorCode::ProjectNotFound
        );
        for code in [
            ServiceErrorCode::ProjectConfigInvalid,
            ServiceErrorCode::ProjectHasRunningAgents,
        ] {
            assert_eq!(code.as_str().parse::<ServiceErrorCode>().unwrap(), code);
        }
        assert!(matches!(
            "nope".parse::<ServiceErrorCode>(),
            Err(Error::InvalidInput(_))
        ));
    }
}
