//! Agent model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::progress::Progress;
use crate::retry::RetryOptions;
use crate::Result;

/// Snapshot of an agent currently holding a slot.
///
/// Sourced from the real-time feed; one immutable value per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningAgentInfo {
    pub agent_id: Uuid,
    pub task_id: Uuid,
    pub task_title: String,
    pub current_turn: u32,
    pub max_turns: u32,
    pub started_at: DateTime<Utc>,
}

impl RunningAgentInfo {
    pub fn new(
        task_id: Uuid,
        task_title: impl Into<String>,
        max_turns: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            agent_id: Uuid::new_v4(),
            task_id,
            task_title: task_title.into(),
            current_turn: 0,
            max_turns,
            started_at,
        }
    }

    pub fn with_turn(mut self, turn: u32) -> Self {
        self.current_turn = turn;
        self
    }

    /// Current turn capped at the ceiling
    pub fn display_turn(&self) -> u32 {
        self.current_turn.min(self.max_turns)
    }

    pub fn progress(&self) -> Result<Progress> {
        Progress::compute(i64::from(self.display_turn()), i64::from(self.max_turns))
    }

    /// Milliseconds since the run started, never negative
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.started_at)
            .num_milliseconds()
            .max(0)
    }
}

/// Where in the agent's workspace an error was raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl SourceLocation {
    /// `file:line:col`, omitting parts that are absent
    pub fn label(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(column)) => format!("{}:{}:{}", self.file, line, column),
            (Some(line), None) => format!("{}:{}", self.file, line),
            _ => self.file.clone(),
        }
    }
}

/// Error payload of a failed agent run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentError {
    pub code: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AgentError {
    pub fn new(
        code: impl Into<String>,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            error_type: error_type.into(),
            message: message.into(),
            location: None,
            stack: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line: Some(line),
            column: Some(column),
        });
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn location_label(&self) -> Option<String> {
        self.location.as_ref().map(SourceLocation::label)
    }

    /// First `lines` non-empty lines of the stack
    pub fn stack_preview(&self, lines: usize) -> Vec<&str> {
        self.stack
            .as_deref()
            .map(|stack| {
                stack
                    .lines()
                    .map(str::trim_end)
                    .filter(|line| !line.trim().is_empty())
                    .take(lines)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn heading(&self) -> String {
        format!("{} ({})", self.error_type, self.code)
    }
}

/// Stack lines shown before the panel collapses the rest
pub const DEFAULT_STACK_PREVIEW_LINES: usize = 5;

/// Render model for the error-state panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPanel {
    pub heading: String,
    pub message: String,
    pub location: Option<String>,
    pub stack_preview: Vec<String>,
    pub stack_truncated: bool,
    pub occurred_at: String,
    pub retry_defaults: RetryOptions,
}

impl ErrorPanel {
    pub fn from_error(error: &AgentError, stack_lines: usize) -> Self {
        let preview: Vec<String> = error
            .stack_preview(stack_lines)
            .into_iter()
            .map(str::to_string)
            .collect();
        let total = error.stack_preview(usize::MAX).len();

        Self {
            heading: error.heading(),
            message: error.message.clone(),
            location: error.location_label(),
            stack_truncated: total > preview.len(),
            stack_preview: preview,
            occurred_at: error.timestamp.to_rfc3339(),
            retry_defaults: RetryOptions::default(),
        }
    }
}
