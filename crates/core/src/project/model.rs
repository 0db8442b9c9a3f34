//! Project model definitions

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Field names used as keys in validation error maps
pub mod fields {
    pub const NAME: &str = "name";
    pub const PATH: &str = "path";
    pub const MAX_CONCURRENT_AGENTS: &str = "maxConcurrentAgents";
    pub const MAX_TURNS: &str = "maxTurns";
    pub const WORKTREE_ROOT: &str = "worktreeRoot";
    pub const DEFAULT_BRANCH: &str = "defaultBranch";
    pub const TEMPERATURE: &str = "temperature";
}

/// Agent execution settings for a project.
///
/// Owned and persisted by the project service; edited through
/// [`SettingsForm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Directory for agent worktrees, relative to the project root
    pub worktree_root: String,

    /// Script run inside each new worktree before the agent starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_script: Option<String>,

    /// Env file copied into each worktree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,

    pub default_branch: String,

    /// 1-10
    pub max_concurrent_agents: u32,

    #[serde(default)]
    pub allowed_tools: BTreeSet<String>,

    /// 10-500
    pub max_turns: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// 0.0-1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            worktree_root: ".worktrees".to_string(),
            init_script: None,
            env_file: None,
            default_branch: "main".to_string(),
            max_concurrent_agents: 3,
            allowed_tools: BTreeSet::new(),
            max_turns: 100,
            model: None,
            system_prompt: None,
            temperature: None,
        }
    }
}

impl ProjectConfig {
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    pub fn with_worktree_root(mut self, root: impl Into<String>) -> Self {
        self.worktree_root = root.into();
        self
    }

    pub fn with_max_concurrent_agents(mut self, agents: u32) -> Self {
        self.max_concurrent_agents = agents;
        self
    }

    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    pub fn with_allowed_tool(mut self, tool: impl Into<String>) -> Self {
        self.allowed_tools.insert(tool.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn allows_tool(&self, tool: &str) -> bool {
        self.allowed_tools.contains(tool)
    }
}

/// A project as supplied by the project service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    /// Repository root on the host machine
    pub local_path: String,
    #[serde(default)]
    pub config: ProjectConfig,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            local_path: local_path.into(),
            config: ProjectConfig::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_config(mut self, config: ProjectConfig) -> Self {
        self.config = config;
        self
    }

    /// Full path to the worktrees directory
    pub fn worktrees_path(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.local_path).join(&self.config.worktree_root)
    }
}

/// Field values of the settings form.
///
/// Absent fields were not touched and are skipped by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_agents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worktree_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl SettingsForm {
    /// Pre-fill every field from a project
    pub fn from_project(project: &Project) -> Self {
        let config = &project.config;
        Self {
            name: Some(project.name.clone()),
            path: Some(project.local_path.clone()),
            max_concurrent_agents: Some(i64::from(config.max_concurrent_agents)),
            max_turns: Some(i64::from(config.max_turns)),
            worktree_root: Some(config.worktree_root.clone()),
            default_branch: Some(config.default_branch.clone()),
            temperature: config.temperature,
        }
    }

    /// Copy present fields onto `project`.
    ///
    /// Callers validate first; numeric values that do not fit are rejected
    /// as invalid input.
    pub fn apply_to(&self, project: &mut Project) -> Result<()> {
        let agents = self
            .max_concurrent_agents
            .map(|agents| {
                u32::try_from(agents).map_err(|_| {
                    Error::invalid_input(format!("maxConcurrentAgents out of range: {}", agents))
                })
            })
            .transpose()?;
        let turns = self
            .max_turns
            .map(|turns| {
                u32::try_from(turns)
                    .map_err(|_| Error::invalid_input(format!("maxTurns out of range: {}", turns)))
            })
            .transpose()?;

        if let Some(name) = &self.name {
            project.name = name.trim().to_string();
        }
        if let Some(path) = &self.path {
            project.local_path = path.clone();
        }
        if let Some(agents) = agents {
            project.config.max_concurrent_agents = agents;
        }
        if let Some(turns) = turns {
            project.config.max_turns = turns;
        }
        if let Some(root) = &self.worktree_root {
            project.config.worktree_root = root.clone();
        }
        if let Some(branch) = &self.default_branch {
            project.config.default_branch = branch.clone();
        }
        if self.temperature.is_some() {
            project.config.temperature = self.temperature;
        }
        project.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_config_defaults() {
        let config = ProjectConfig::default();
        assert_eq!(config.worktree_root, ".worktrees");
        assert_eq!(config.default_branch, "main");
        assert_eq!(config.max_concurrent_agents, 3);
        assert_eq!(config.max_turns, 100);
        assert!(config.allowed_tools.is_empty());
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_project_config_builders() {
        let config = ProjectConfig::default()
            .with_default_branch("develop")
            .with_worktree_root(".agents/worktrees")
            .with_max_concurrent_agents(5)
            .with_max_turns(250)
            .with_allowed_tool("bash")
            .with_allowed_tool("edit")
            .with_model("large")
            .with_temperature(0.2);

        assert_eq!(config.default_branch, "develop");
        assert_eq!(config.max_concurrent_agents, 5);
        assert!(config.allows_tool("bash"));
        assert!(!config.allows_tool("web"));
        assert_eq!(config.model.as_deref(), Some("large"));
    }

    #[test]
    fn test_worktrees_path() {
        let project = Project::new("my-project", "/path/to/project");
        let expected = std::path::PathBuf::from("/path/to/project/.worktrees");
        assert_eq!(project.worktrees_path(), expected);
    }

    #[test]
    fn test_form_from_project_round_trips_into_project() {
        let project = Project::new("dash", "/repos/dash")
            .with_config(ProjectConfig::default().with_max_turns(42));
        let form = SettingsForm::from_project(&project);

        assert_eq!(form.name.as_deref(), Some("dash"));
        assert_eq!(form.max_turns, Some(42));

        let mut copy = Project::new("other", "/elsewhere");
        form.apply_to(&mut copy).unwrap();
        assert_eq!(copy.name, "dash");
        assert_eq!(copy.local_path, "/repos/dash");
        assert_eq!(copy.config.max_turns, 42);
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut project = Project::new("dash", "/repos/dash");
        let form = SettingsForm {
            default_branch: Some("trunk".to_string()),
            ..Default::default()
        };
        form.apply_to(&mut project).unwrap();

        assert_eq!(project.name, "dash");
        assert_eq!(project.config.default_branch, "trunk");
        assert_eq!(project.config.max_turns, 100);
    }

    #[test]
    fn test_apply_rejects_negative_numbers() {
        let mut project = Project::new("dash", "/repos/dash");
        let form = SettingsForm {
            max_turns: Some(-1),
            ..Default::default()
        };
        assert!(matches!(form.apply_to(&mut project), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_failed_apply_leaves_project_untouched() {
        let mut project = Project::new("dash", "/repos/dash");
        let before = project.clone();
        let form = SettingsForm {
            name: Some("renamed".to_string()),
            path: Some("/repos/other".to_string()),
            default_branch: Some("trunk".to_string()),
            max_concurrent_agents: Some(i64::from(u32::MAX) + 1),
            ..Default::default()
        };

        assert!(matches!(form.apply_to(&mut project), Err(Error::InvalidInput(_))));
        assert_eq!(project, before);
    }

    #[test]
    fn test_form_deserializes_partial_json() {
        let form: SettingsForm =
            serde_json::from_value(serde_json::json!({ "name": "", "maxConcurrentAgents": 11 }))
                .unwrap();

        assert_eq!(form.name.as_deref(), Some(""));
        assert_eq!(form.max_concurrent_agents, Some(11));
        assert!(form.path.is_none());
        assert!(form.max_turns.is_none());
    }
}
