//! Git working copy snapshots through the git command line.
//!
//! This module provides [`RepositorySnapshot`], which shells out to `git` for
//! everything it knows about a workspace: current branch, remotes, last
//! commit, working tree status, the branch list and checkout.
//!
//! # Key Features
//! - **Detection**: a workspace is a repository iff `<root>/.git` exists
//! - **Fan-out refresh**: the four snapshot queries run concurrently and each
//!   one degrades to its zero value on failure instead of failing the refresh
//! - **Wholesale replacement**: the stored [`RepositoryInfo`] is swapped as a
//!   whole; readers never see a half-updated snapshot

use crate::core::{
    error::{DenError, Result},
    git_status::WorkingTreeStatus,
    remote::{parse_remote_list, Remote},
    state::{Commit, RepositoryInfo},
};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tokio::process::Command;

pub struct RepositorySnapshot {
    root: PathBuf,
    current: RwLock<Option<RepositoryInfo>>,
}

impl RepositorySnapshot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_repository(&self) -> bool {
        self.root.join(".git").exists()
    }

    /// Last snapshot produced by [`refresh`](Self::refresh), if any.
    pub fn current(&self) -> Option<RepositoryInfo> {
        self.current.read().clone()
    }

    /// Execute a git command in the workspace root and return its stdout
    async fn run_git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(DenError::GitSpawn)?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(DenError::git_command(
                args.first().copied().unwrap_or("git"),
                error_msg.trim(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub async fn current_branch(&self) -> Result<String> {
        let branch = self.run_git(&["branch", "--show-current"]).await?;
        let branch = branch.trim();
        if !branch.is_empty() {
            return Ok(branch.to_string());
        }

        // Detached HEAD
        let head = self.run_git(&["rev-parse", "--short", "HEAD"]).await?;
        Ok(format!("detached at {}", head.trim()))
    }

    pub async fn remotes(&self) -> Result<Vec<Remote>> {
        let output = self.run_git(&["remote", "-v"]).await?;
        Ok(parse_remote_list(&output))
    }

    pub async fn last_commit(&self) -> Result<Option<Commit>> {
        let output = self
            .run_git(&["log", "-1", "--format=%H%x1f%h%x1f%an%x1f%aI%x1f%s"])
            .await?;
        Ok(Commit::from_log_line(&output))
    }

    pub async fn working_tree_status(&self) -> Result<WorkingTreeStatus> {
        let output = self
            .run_git(&["status", "--porcelain=v2", "--branch"])
            .await?;
        Ok(WorkingTreeStatus::from_porcelain_v2(&output))
    }

    /// Build a fresh snapshot and store it.
    ///
    /// Returns `None` when the workspace is not a repository. A failing query
    /// leaves its field at the zero value and is logged.
    pub async fn refresh(&self) -> Option<RepositoryInfo> {
        if !self.is_repository() {
            log::debug!("{} is not a git repository", self.root.display());
            *self.current.write() = None;
            return None;
        }

        let (branch, remotes, last_commit, status) = tokio::join!(
            self.current_branch(),
            self.remotes(),
            self.last_commit(),
            self.working_tree_status(),
        );

        let info = RepositoryInfo {
            root: self.root.clone(),
            branch: branch.unwrap_or_else(|e| {
                log::warn!("Could not read current branch: {e}");
                String::new()
            }),
            remotes: remotes.unwrap_or_else(|e| {
                log::warn!("Could not list remotes: {e}");
                Vec::new()
            }),
            // An empty repository has no commits; git log fails there
            last_commit: last_commit.unwrap_or_else(|e| {
                log::debug!("Could not read last commit: {e}");
                None
            }),
            status: status.unwrap_or_else(|e| {
                log::warn!("Could not read working tree status: {e}");
                WorkingTreeStatus::default()
            }),
            is_repository: true,
        };

        *self.current.write() = Some(info.clone());
        Some(info)
    }

    /// Check out `branch`. On success the snapshot is refreshed; on failure
    /// the previous snapshot is kept. Names git would read as an option are
    /// refused.
    pub async fn switch_branch(&self, branch: &str) -> bool {
        if !self.is_repository() {
            return false;
        }
        if branch.is_empty() || branch.starts_with('-') {
            log::warn!("Refusing to switch to invalid branch name '{branch}'");
            return false;
        }
        match self.run_git(&["checkout", branch]).await {
            Ok(_) => {
                log::info!("Switched to branch '{branch}'");
                self.refresh().await;
                true
            }
            Err(e) => {
                log::warn!("Failed to switch to branch '{branch}': {e}");
                false
            }
        }
    }

    /// Local then remote-tracking branch names, without symbolic `*/HEAD`
    /// entries or duplicates.
    pub async fn branch_list(&self) -> Vec<String> {
        if !self.is_repository() {
            return Vec::new();
        }

        let local = self.run_git(&["branch", "--format=%(refname)"]).await;
        let remote = self.run_git(&["branch", "-r", "--format=%(refname)"]).await;

        let mut branches: Vec<String> = Vec::new();
        for output in [local, remote] {
            let output = match output {
                Ok(output) => output,
                Err(e) => {
                    log::warn!("Could not list branches: {e}");
                    continue;
                }
            };
            for name in output.lines().filter_map(short_branch_name) {
                if !branches.iter().any(|b| b == name) {
                    branches.push(name.to_string());
                }
            }
        }
        branches
    }
}

/// `refs/heads/x` -> `x`, `refs/remotes/origin/x` -> `origin/x`. Symbolic
/// `origin/HEAD` refs and detached-HEAD placeholders yield `None`.
fn short_branch_name(refname: &str) -> Option<&str> {
    let refname = refname.trim();
    let name = refname
        .strip_prefix("refs/heads/")
        .or_else(|| refname.strip_prefix("refs/remotes/"))?;
    if name.is_empty() || name == "HEAD" || name.ends_with("/HEAD") {
        return None;
    }
    Some(name)
}
