//! Path probing

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dash_core::project::PathValidator;
use tracing::{debug, info};

use crate::commands::repo_toplevel;
use crate::error::Result;

/// Resolved facts about one path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathFacts {
    /// The path is an existing directory
    pub exists: bool,
    /// The path is the top level of a git working tree
    pub is_git_root: bool,
}

/// Source of [`PathFacts`]
#[async_trait]
pub trait PathProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<PathFacts>;

    /// Probe each path once and collect the answers
    async fn probe_all(&self, paths: &[PathBuf]) -> Result<ProbedPaths> {
        let mut probed = ProbedPaths::default();
        for path in paths {
            if probed.facts.contains_key(path) {
                continue;
            }
            let facts = self.probe(path).await?;
            probed.insert(path.clone(), facts);
        }
        Ok(probed)
    }
}

/// Probes the local filesystem and asks `git` about repository roots
#[derive(Debug, Clone, Copy, Default)]
pub struct GitProbe;

impl GitProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PathProbe for GitProbe {
    async fn probe(&self, path: &Path) -> Result<PathFacts> {
        let is_dir = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.is_dir(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if !is_dir {
            debug!("Probe: {:?} is not a directory", path);
            return Ok(PathFacts::default());
        }

        let is_git_root = match repo_toplevel(path).await? {
            Some(toplevel) => {
                // Compare canonical forms; git resolves symlinks in its answer
                let toplevel = tokio::fs::canonicalize(&toplevel).await?;
                let path = tokio::fs::canonicalize(path).await?;
                toplevel == path
            }
            None => false,
        };

        info!("Probed {:?}: exists, git root = {}", path, is_git_root);
        Ok(PathFacts {
            exists: true,
            is_git_root,
        })
    }
}

/// Facts gathered ahead of validation.
///
/// Paths that were never probed are reported as missing.
#[derive(Debug, Clone, Default)]
pub struct ProbedPaths {
    facts: HashMap<PathBuf, PathFacts>,
}

impl ProbedPaths {
    pub fn insert(&mut self, path: impl Into<PathBuf>, facts: PathFacts) {
        self.facts.insert(path.into(), facts);
    }

    pub fn get(&self, path: &Path) -> Option<PathFacts> {
        self.facts.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl PathValidator for ProbedPaths {
    fn exists(&self, path: &Path) -> bool {
        self.get(path).is_some_and(|facts| facts.exists)
    }

    fn is_git_repo(&self, path: &Path) -> bool {
        self.get(path).is_some_and(|facts| facts.is_git_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::git_command;
    use dash_core::project::{messages, SettingsForm, SettingsFormValidator};
    use tempfile::TempDir;

    async fn init_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let output = git_command(dir.path(), &["init"]).await.unwrap();
        assert!(output.success, "git init failed: {}", output.stderr);
        dir
    }

    #[tokio::test]
    async fn test_probe_git_root() {
        let dir = init_test_repo().await;
        let facts = GitProbe::new().probe(dir.path()).await.unwrap();
        assert_eq!(
            facts,
            PathFacts {
                exists: true,
                is_git_root: true
            }
        );
    }

    #[tokio::test]
    async fn test_probe_subdirectory_is_not_root() {
        let dir = init_test_repo().await;
        let nested = dir.path().join("src");
        tokio::fs::create_dir(&nested).await.unwrap();

        let facts = GitProbe::new().probe(&nested).await.unwrap();
        assert!(facts.exists);
        assert!(!facts.is_git_root);
    }

    #[tokio::test]
    async fn test_probe_plain_directory() {
        let dir = TempDir::new().unwrap();
        let facts = GitProbe::new().probe(dir.path()).await.unwrap();
        assert!(facts.exists);
        assert!(!facts.is_git_root);
    }

    #[tokio::test]
    async fn test_probe_missing_and_file_paths() {
        let dir = TempDir::new().unwrap();
        let probe = GitProbe::new();

        let missing = probe.probe(&dir.path().join("missing")).await.unwrap();
        assert_eq!(missing, PathFacts::default());

        let file = dir.path().join("file.txt");
        tokio::fs::write(&file, "x").await.unwrap();
        let facts = probe.probe(&file).await.unwrap();
        assert!(!facts.exists);
    }

    #[tokio::test]
    async fn test_unprobed_paths_are_missing() {
        let probed = ProbedPaths::default();
        assert!(!probed.exists(Path::new("/anywhere")));
        assert!(!probed.is_git_repo(Path::new("/anywhere")));
    }

    #[tokio::test]
    async fn test_probe_all_feeds_validator() {
        let repo = init_test_repo().await;
        let plain = TempDir::new().unwrap();
        let paths = vec![
            repo.path().to_path_buf(),
            plain.path().to_path_buf(),
            repo.path().to_path_buf(),
        ];

        let probed = GitProbe::new().probe_all(&paths).await.unwrap();
        assert_eq!(probed.len(), 2);

        let validator = SettingsFormValidator::new(&probed);
        let form = |path: &Path| SettingsForm {
            path: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };

        assert!(validator.validate(&form(repo.path())).is_empty());
        assert_eq!(
            validator.validate(&form(plain.path())).get("path"),
            Some(messages::PATH_NOT_GIT_ROOT)
        );
    }

    #[tokio::test]
    async fn test_branch_grammar_agrees_with_git() {
        let dir = TempDir::new().unwrap();
        for branch in [
            "main", "feature/x", "a..b", "-lead", "x.lock", ".dot", "sp ace", "HEAD", "@",
        ] {
            let output = git_command(dir.path(), &["check-ref-format", "--branch", branch])
                .await
                .unwrap();
            assert_eq!(
                dash_core::project::is_valid_branch_name(branch),
                output.success,
                "grammar disagrees with git for {branch:?}"
            );
        }
    }
}
