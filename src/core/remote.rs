//! Git remote classification.
//!
//! A [`Remote`] is derived purely from `git remote -v` output: the URL is
//! matched against the HTTPS and SSH shapes of the three supported hosts and
//! split into owner and repository. Anything else is [`HostType::Other`] and
//! never reaches the host APIs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostType {
    GitHub,
    GitLab,
    Bitbucket,
    Other,
}

impl HostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostType::GitHub => "github",
            HostType::GitLab => "gitlab",
            HostType::Bitbucket => "bitbucket",
            HostType::Other => "other",
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostType::GitHub => "GitHub",
            HostType::GitLab => "GitLab",
            HostType::Bitbucket => "Bitbucket",
            HostType::Other => "Other",
        };
        f.write_str(name)
    }
}

// Each pattern accepts `https://host/owner/repo(.git)`, `git@host:owner/repo(.git)`
// and `ssh://git@host/owner/repo(.git)`. GitLab owners may be nested groups.
static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://(?:[^@/]+@)?|ssh://git@|git@)github\.com[:/]([^/]+)/([^/]+?)(?:\.git)?/?$")
        .expect("valid github pattern")
});
static GITLAB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://(?:[^@/]+@)?|ssh://git@|git@)gitlab\.com[:/](.+)/([^/]+?)(?:\.git)?/?$")
        .expect("valid gitlab pattern")
});
static BITBUCKET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://(?:[^@/]+@)?|ssh://git@|git@)bitbucket\.org[:/]([^/]+)/([^/]+?)(?:\.git)?/?$")
        .expect("valid bitbucket pattern")
});

/// One named git remote with its host descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub host_type: HostType,
    pub owner: Option<String>,
    pub repo: Option<String>,
}

/// The (platform, owner, repository) triple a host API call needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostDescriptor {
    pub host_type: HostType,
    pub owner: String,
    pub repo: String,
}

impl HostDescriptor {
    /// `owner/repo` label used on pull request records.
    pub fn label(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Remote {
    pub fn parse(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        let url = url.into();
        let trimmed = url.trim();

        let patterns: [(HostType, &Regex); 3] = [
            (HostType::GitHub, &GITHUB_URL),
            (HostType::GitLab, &GITLAB_URL),
            (HostType::Bitbucket, &BITBUCKET_URL),
        ];

        for (host_type, pattern) in patterns {
            if let Some(caps) = pattern.captures(trimmed) {
                let owner = caps[1].to_string();
                let repo = caps[2].to_string();
                return Self {
                    name,
                    url,
                    host_type,
                    owner: Some(owner),
                    repo: Some(repo),
                };
            }
        }

        Self {
            name,
            url,
            host_type: HostType::Other,
            owner: None,
            repo: None,
        }
    }

    /// Host descriptor for API queries; `None` for unrecognized hosts or
    /// remotes without a resolved owner and repository.
    pub fn descriptor(&self) -> Option<HostDescriptor> {
        if self.host_type == HostType::Other {
            return None;
        }
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Some(HostDescriptor {
                    host_type: self.host_type,
                    owner: owner.clone(),
                    repo: repo.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Parse `git remote -v` output into one [`Remote`] per name, keeping the
/// fetch URL and the order git reports them in.
pub fn parse_remote_list(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();

    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        if parts.next() == Some("(push)") {
            continue;
        }
        if remotes.iter().any(|r| r.name == name) {
            continue;
        }
        remotes.push(Remote::parse(name, url));
    }

    remotes
}
