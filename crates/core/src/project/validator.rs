//! Settings form validation
//!
//! Every rule runs independently and all failures are collected, one message
//! per field. The filesystem and git checks are answered by a
//! [`PathValidator`]; nothing here touches the disk.

use std::path::Path;

use tracing::debug;

use super::model::{fields, SettingsForm};
use crate::error::ValidationErrors;

pub const NAME_MAX_LEN: usize = 100;
pub const MAX_CONCURRENT_AGENTS_RANGE: (i64, i64) = (1, 10);
pub const MAX_TURNS_RANGE: (i64, i64) = (10, 500);

/// Fixed error messages, one per rule
pub mod messages {
    pub const NAME_REQUIRED: &str = "Project name is required";
    pub const NAME_TOO_LONG: &str = "Project name must be 100 characters or fewer";
    pub const PATH_NOT_FOUND: &str = "Path does not exist";
    pub const PATH_NOT_GIT_ROOT: &str = "Path is not a git repository root";
    pub const MAX_CONCURRENT_AGENTS: &str = "Max concurrent agents must be between 1 and 10";
    pub const MAX_TURNS: &str = "Max turns must be between 10 and 500";
    pub const WORKTREE_ROOT: &str =
        "Worktree root must be a relative path without '..' or illegal characters";
    pub const DEFAULT_BRANCH: &str = "Invalid git branch name";
    pub const TEMPERATURE: &str = "Temperature must be between 0.0 and 1.0";
}

/// Answers filesystem and git questions about a candidate project path
pub trait PathValidator {
    /// The path exists and is a directory
    fn exists(&self, path: &Path) -> bool;

    /// The path is the top level of a git working tree
    fn is_git_repo(&self, path: &Path) -> bool;
}

impl<T: PathValidator + ?Sized> PathValidator for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_git_repo(&self, path: &Path) -> bool {
        (**self).is_git_repo(path)
    }
}

/// Validates [`SettingsForm`] values
pub struct SettingsFormValidator<P> {
    paths: P,
}

impl<P: PathValidator> SettingsFormValidator<P> {
    pub fn new(paths: P) -> Self {
        Self { paths }
    }

    /// Map of field name to the first rule that field violates.
    ///
    /// An empty map means the form is valid.
    pub fn validate(&self, form: &SettingsForm) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &form.name {
            if let Some(message) = validate_name(name) {
                errors.insert(fields::NAME, message);
            }
        }
        if let Some(path) = &form.path {
            if let Some(message) = self.validate_path(path) {
                errors.insert(fields::PATH, message);
            }
        }
        if let Some(agents) = form.max_concurrent_agents {
            if !in_range(agents, MAX_CONCURRENT_AGENTS_RANGE) {
                errors.insert(fields::MAX_CONCURRENT_AGENTS, messages::MAX_CONCURRENT_AGENTS);
            }
        }
        if let Some(turns) = form.max_turns {
            if !in_range(turns, MAX_TURNS_RANGE) {
                errors.insert(fields::MAX_TURNS, messages::MAX_TURNS);
            }
        }
        if let Some(root) = &form.worktree_root {
            if !is_valid_worktree_root(root) {
                errors.insert(fields::WORKTREE_ROOT, messages::WORKTREE_ROOT);
            }
        }
        if let Some(branch) = &form.default_branch {
            if !is_valid_branch_name(branch) {
                errors.insert(fields::DEFAULT_BRANCH, messages::DEFAULT_BRANCH);
            }
        }
        if let Some(temperature) = form.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                errors.insert(fields::TEMPERATURE, messages::TEMPERATURE);
            }
        }

        debug!(error_count = errors.len(), "Validated settings form");
        errors
    }

    fn validate_path(&self, path: &str) -> Option<&'static str> {
        let path = Path::new(path.trim());
        if path.as_os_str().is_empty() || !self.paths.exists(path) {
            return Some(messages::PATH_NOT_FOUND);
        }
        if !self.paths.is_git_repo(path) {
            return Some(messages::PATH_NOT_GIT_ROOT);
        }
        None
    }
}

fn in_range(value: i64, (min, max): (i64, i64)) -> bool {
    (min..=max).contains(&value)
}

fn validate_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        Some(messages::NAME_REQUIRED)
    } else if name.chars().count() > NAME_MAX_LEN {
        Some(messages::NAME_TOO_LONG)
    } else {
        None
    }
}

const ILLEGAL_PATH_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\\'];

/// Relative, slash-separated, no `.`/`..` components and no characters that
/// are illegal on common filesystems
pub fn is_valid_worktree_root(root: &str) -> bool {
    if root.is_empty() || root.starts_with('/') {
        return false;
    }
    if root
        .chars()
        .any(|c| c.is_control() || ILLEGAL_PATH_CHARS.contains(&c))
    {
        return false;
    }
    // A trailing slash is tolerated; empty inner components are not
    let root = root.strip_suffix('/').unwrap_or(root);
    root.split('/')
        .all(|component| !component.is_empty() && component != "." && component != "..")
}

const ILLEGAL_REF_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Branch name grammar enforced by `git check-ref-format --branch`
pub fn is_valid_branch_name(branch: &str) -> bool {
    if branch.is_empty() || branch == "HEAD" || branch.starts_with('-') {
        return false;
    }
    if branch.starts_with('/') || branch.ends_with('/') || branch.ends_with('.') {
        return false;
    }
    if branch.contains("..") || branch.contains("//") || branch.contains("@{") {
        return false;
    }
    if branch
        .chars()
        .any(|c| c.is_ascii_control() || ILLEGAL_REF_CHARS.contains(&c))
    {
        return false;
    }
    branch
        .split('/')
        .all(|component| !component.starts_with('.') && !component.ends_with(".lock"))
}
