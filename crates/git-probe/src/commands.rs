//! Git command execution utilities

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::{ProbeError, Result};

/// Output from a git command
#[derive(Debug)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Execute a git command in the specified directory
pub async fn git_command(dir: &Path, args: &[&str]) -> Result<GitOutput> {
    debug!("Running git {:?} in {:?}", args, dir);

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ProbeError::git_failed_with_source("Failed to execute git command", e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    trace!("git stdout: {}", stdout);
    if !stderr.is_empty() {
        trace!("git stderr: {}", stderr);
    }

    Ok(GitOutput {
        stdout,
        stderr,
        success: output.status.success(),
    })
}

/// Top level of the working tree containing `dir`, or `None` outside one
pub async fn repo_toplevel(dir: &Path) -> Result<Option<PathBuf>> {
    let output = git_command(dir, &["rev-parse", "--show-toplevel"]).await?;
    if !output.success {
        debug!("{:?} is not inside a git working tree: {}", dir, output.stderr.trim());
        return Ok(None);
    }
    let toplevel = output.stdout.trim();
    if toplevel.is_empty() {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(toplevel)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Execute a git command and return error if it fails
    async fn git_command_checked(dir: &Path, args: &[&str]) -> Result<String> {
        let output = git_command(dir, args).await?;

        if !output.success {
            return Err(ProbeError::git_failed(format!(
                "git {} failed: {}",
                args.join(" "),
                output.stderr.trim()
            )));
        }

        Ok(output.stdout)
    }

    async fn init_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        git_command_checked(dir.path(), &["init"]).await.unwrap();
        dir
    }

    #[tokio::test]
    async fn test_repo_toplevel() {
        let dir = init_test_repo().await;
        let toplevel = repo_toplevel(dir.path()).await.unwrap().unwrap();
        assert_eq!(
            tokio::fs::canonicalize(toplevel).await.unwrap(),
            tokio::fs::canonicalize(dir.path()).await.unwrap()
        );

        let nested = dir.path().join("nested");
        tokio::fs::create_dir(&nested).await.unwrap();
        let toplevel = repo_toplevel(&nested).await.unwrap().unwrap();
        assert_eq!(
            tokio::fs::canonicalize(toplevel).await.unwrap(),
            tokio::fs::canonicalize(dir.path()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_repo_toplevel_outside_repo() {
        let non_git = TempDir::new().unwrap();
        assert!(repo_toplevel(non_git.path()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checked_command_reports_failure() {
        let non_git = TempDir::new().unwrap();
        let result = git_command_checked(non_git.path(), &["rev-parse", "HEAD"]).await;
        assert!(matches!(result, Err(ProbeError::GitCommandFailed { .. })));
    }
}
