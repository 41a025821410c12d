//! Config files, settings and host API payloads used across tests

#![allow(dead_code)]

use super::repository::*;
use anyhow::Result;
use den::core::settings::{HostSettings, Settings};
use serde_json::{json, Value};
use std::path::Path;

pub const COMPLETE_CONFIG: &str = "\
name: Widgets
version: 2.1.0
environment: staging
tools:
  - git
  - node
settings:
  shell: zsh
";

/// Scenario: workspace whose den.yml only names the environment
pub fn workspace_with_minimal_config() -> Result<TestRepo> {
    let repo = setup_workspace()?;
    create_file(&repo.path, "den.yml", "name: Foo\n")?;
    Ok(repo)
}

/// Scenario: repository with a GitHub remote and a develop branch
pub fn github_repo() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;
    git_branch(&repo.path, "develop")?;
    add_remote(&repo.path, "origin", "git@github.com:acme/widgets.git")?;
    Ok(repo)
}

/// Settings pointing every host at `base_url` and monitoring `branches`
pub fn settings_for_mock(base_url: &str, branches: &[&str]) -> Settings {
    let mut settings = Settings::default();
    settings.hosts = HostSettings {
        github: base_url.to_string(),
        gitlab: base_url.to_string(),
        bitbucket: base_url.to_string(),
    };
    settings.git.monitored_branches = branches.iter().map(|b| b.to_string()).collect();
    settings
}

pub fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    settings.save_to(path)?;
    Ok(())
}

pub fn github_pull(number: u64, base: &str) -> Value {
    json!({
        "number": number,
        "title": format!("Add feature {number}"),
        "html_url": format!("https://github.com/acme/widgets/pull/{number}"),
        "base": { "ref": base },
        "head": { "ref": format!("feature-{number}") },
        "user": { "login": "octocat" },
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-02T10:00:00Z",
        "draft": false
    })
}

pub fn gitlab_merge_request(iid: u64, target: &str) -> Value {
    json!({
        "iid": iid,
        "title": format!("Merge feature {iid}"),
        "web_url": format!("https://gitlab.com/group/tools/-/merge_requests/{iid}"),
        "target_branch": target,
        "source_branch": format!("feature-{iid}"),
        "author": { "username": "tanuki" },
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-02T10:00:00Z",
        "draft": false
    })
}
