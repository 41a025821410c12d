//! Git repository management and setup utilities
//!
//! Provides functions for creating test workspaces and repositories in
//! various states. Everything goes through the git CLI, like den itself.

#![allow(dead_code)]

use anyhow::{ensure, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace. The TempDir must be kept alive for the duration
/// of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings file location beside the workspace, so tests never touch
    /// the user's real settings and the working tree stays clean.
    pub fn settings_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.json")
    }
}

/// Runs git in `repo_path` and fails on a non-zero exit
pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    ensure!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A plain directory, not a repository
pub fn setup_workspace() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("workspace");
    fs::create_dir(&path)?;
    Ok(TestRepo { temp_dir, path })
}

/// Sets up a fresh git repository on `main` with prompts disabled
pub fn setup_test_repo() -> Result<TestRepo> {
    let repo = setup_workspace()?;
    git(&repo.path, &["init", "-b", "main"])?;
    git(&repo.path, &["config", "user.name", "Test User"])?;
    git(&repo.path, &["config", "user.email", "test@example.com"])?;
    git(&repo.path, &["config", "commit.gpgsign", "false"])?;
    Ok(repo)
}

/// Sets up a git repository with an initial commit containing "initial.txt"
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git_add(&repo.path, "initial.txt")?;
    git_commit(&repo.path, "Initial commit")?;
    Ok(repo)
}

pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    fs::write(repo_path.join(filename), content)?;
    Ok(())
}

pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", filename])?;
    Ok(())
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-m", message])?;
    Ok(())
}

pub fn git_branch(repo_path: &Path, name: &str) -> Result<()> {
    git(repo_path, &["branch", name])?;
    Ok(())
}

pub fn add_remote(repo_path: &Path, name: &str, url: &str) -> Result<()> {
    git(repo_path, &["remote", "add", name, url])?;
    Ok(())
}

pub fn current_branch(repo_path: &Path) -> Result<String> {
    Ok(git(repo_path, &["branch", "--show-current"])?.trim().to_string())
}
