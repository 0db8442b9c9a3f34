//! Queue model definitions

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wait::{estimate_wait_ms, format_wait};
use crate::agent::{Progress, RunningAgentInfo};
use crate::{Error, Result};

/// A waiting task's place in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub task_id: Uuid,
    /// 1-indexed
    pub position: u32,
    pub queue_length: u32,
}

impl QueueEntry {
    pub fn new(task_id: Uuid, position: u32, queue_length: u32) -> Result<Self> {
        let entry = Self {
            task_id,
            position,
            queue_length,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<()> {
        if self.position == 0 {
            return Err(Error::invalid_input("queue position is 1-indexed, got 0"));
        }
        if self.position > self.queue_length {
            return Err(Error::invalid_input(format!(
                "queue position {} exceeds queue length {}",
                self.position, self.queue_length
            )));
        }
        Ok(())
    }

    pub fn position_label(&self) -> String {
        format!("Position {} of {}", self.position, self.queue_length)
    }

    /// Number of tasks that will be assigned before this one
    pub fn tasks_ahead(&self) -> u32 {
        self.position.saturating_sub(1)
    }
}

/// Immutable queue state pushed by the real-time feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    #[serde(flatten)]
    pub entry: QueueEntry,
    #[serde(default)]
    pub running_agents: Vec<RunningAgentInfo>,
    #[serde(default = "Utc::now")]
    pub taken_at: DateTime<Utc>,
}

impl QueueSnapshot {
    pub fn new(entry: QueueEntry, running_agents: Vec<RunningAgentInfo>) -> Self {
        Self {
            entry,
            running_agents,
            taken_at: Utc::now(),
        }
    }

    pub fn task_id(&self) -> Uuid {
        self.entry.task_id
    }

    pub fn validate(&self) -> Result<()> {
        self.entry.validate()?;
        if let Some(agent) = self.running_agents.iter().find(|a| a.max_turns == 0) {
            return Err(Error::invalid_input(format!(
                "running agent {} has a zero turn ceiling",
                agent.agent_id
            )));
        }
        Ok(())
    }
}

/// Why a task left the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// The user cancelled the queued task
    Cancelled,
    /// An agent slot was assigned to the task
    Assigned,
}

impl FromStr for RemovalReason {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "assigned" => Ok(Self::Assigned),
            _ => Err(Error::invalid_input(format!(
                "Invalid removal reason: {}",
                value
            ))),
        }
    }
}

impl RemovalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Assigned => "assigned",
        }
    }
}

/// Message carried by the queue feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueUpdate {
    Snapshot(QueueSnapshot),
    Removed {
        #[serde(rename = "taskId")]
        task_id: Uuid,
        reason: RemovalReason,
    },
}

impl QueueUpdate {
    pub fn task_id(&self) -> Uuid {
        match self {
            Self::Snapshot(snapshot) => snapshot.task_id(),
            Self::Removed { task_id, .. } => *task_id,
        }
    }
}

/// One row in the running-agents list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProgressRow {
    pub agent_id: Uuid,
    pub task_id: Uuid,
    pub task_title: String,
    pub progress: Progress,
    pub label: String,
    pub finishing_soon: bool,
}

impl AgentProgressRow {
    pub fn from_agent(agent: &RunningAgentInfo) -> Result<Self> {
        let progress = agent.progress()?;
        Ok(Self {
            agent_id: agent.agent_id,
            task_id: agent.task_id,
            task_title: agent.task_title.clone(),
            label: progress.label(),
            finishing_soon: progress.is_finishing_soon(),
            progress,
        })
    }
}

/// Render model for the queue-waiting indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDisplay {
    pub task_id: Uuid,
    pub position: u32,
    pub queue_length: u32,
    pub position_label: String,
    pub estimated_wait_ms: Option<i64>,
    pub wait_label: Option<String>,
    pub running_agents: Vec<AgentProgressRow>,
    pub rendered_at: DateTime<Utc>,
}

impl QueueDisplay {
    pub fn render(snapshot: &QueueSnapshot, now: DateTime<Utc>) -> Result<Self> {
        snapshot.validate()?;
        let entry = &snapshot.entry;

        let estimated_wait_ms = estimate_wait_ms(entry.position, &snapshot.running_agents, now);
        let wait_label = estimated_wait_ms.map(format_wait).transpose()?;
        let running_agents = snapshot
            .running_agents
            .iter()
            .map(AgentProgressRow::from_agent)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            task_id: entry.task_id,
            position: entry.position,
            queue_length: entry.queue_length,
            position_label: entry.position_label(),
            estimated_wait_ms,
            wait_label,
            running_agents,
            rendered_at: now,
        })
    }
}
