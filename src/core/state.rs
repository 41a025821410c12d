//! Snapshot records shared between the git layer, the host client and the
//! pull request watcher.
//!
//! # Public API
//! - [`Commit`]: the most recent commit on the current branch
//! - [`RepositoryInfo`]: one complete working copy snapshot
//! - [`PullRequestRecord`]: one open pull/merge request, normalized across hosts
//!
//! Every record here is replaced wholesale on refresh; nothing patches fields
//! of an existing snapshot.

use crate::core::git_status::WorkingTreeStatus;
use crate::core::remote::{HostType, Remote};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub message: String,
}

impl Commit {
    /// Parse the `%H%x1f%h%x1f%an%x1f%aI%x1f%s` log format.
    pub fn from_log_line(line: &str) -> Option<Self> {
        let mut fields = line.trim_end_matches(['\n', '\r']).split('\u{1f}');
        let hash = fields.next()?.to_string();
        if hash.is_empty() {
            return None;
        }
        let short_hash = fields.next()?.to_string();
        let author = fields.next()?.to_string();
        let date = fields
            .next()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok());
        let message = fields.next().unwrap_or("").to_string();
        Some(Self {
            hash,
            short_hash,
            author,
            date,
            message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub root: PathBuf,
    pub branch: String,
    pub remotes: Vec<Remote>,
    pub last_commit: Option<Commit>,
    pub status: WorkingTreeStatus,
    pub is_repository: bool,
}

impl RepositoryInfo {
    /// Neutral snapshot for a workspace that is not a repository.
    pub fn not_a_repository(root: PathBuf) -> Self {
        Self {
            root,
            branch: String::new(),
            remotes: Vec::new(),
            last_commit: None,
            status: WorkingTreeStatus::default(),
            is_repository: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub host: HostType,
    pub id: u64,
    pub title: String,
    pub url: String,
    pub target_branch: String,
    pub source_branch: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub draft: bool,
    pub repository: String,
}

impl PullRequestRecord {
    /// Identity across polls: the same id on the same host.
    pub fn key(&self) -> (HostType, u64) {
        (self.host, self.id)
    }

    /// Host-native reference: `#12` on GitHub/Bitbucket, `!12` on GitLab.
    pub fn reference(&self) -> String {
        match self.host {
            HostType::GitLab => format!("!{}", self.id),
            _ => format!("#{}", self.id),
        }
    }
}
