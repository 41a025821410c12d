//! Read-only pull/merge request queries against GitHub, GitLab and Bitbucket.
//!
//! One GET per remote, first page only, most recently updated first. Each
//! host has its own wire structs and a mapping into [`PullRequestRecord`];
//! results are then filtered to the branch allow-list. Failures never leave
//! this module: [`HostClient::open_requests`] logs and returns an empty list.

use crate::core::error::{DenError, Result};
use crate::core::remote::{HostDescriptor, HostType, Remote};
use crate::core::settings::HostSettings;
use crate::core::state::PullRequestRecord;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Fixed client identifier sent with every request.
pub const USER_AGENT: &str = concat!("den/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct HostClient {
    http: reqwest::Client,
    endpoints: HostSettings,
}

impl HostClient {
    pub fn new(endpoints: HostSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DenError::http(HostType::Other, e))?;
        Ok(Self { http, endpoints })
    }

    /// Open requests for one remote whose target branch is in `branches`.
    ///
    /// Unrecognized hosts and remotes without owner/repository are skipped
    /// without a network call.
    pub async fn open_requests(&self, remote: &Remote, branches: &[String]) -> Vec<PullRequestRecord> {
        let Some(descriptor) = remote.descriptor() else {
            log::debug!("Skipping remote '{}' ({})", remote.name, remote.url);
            return Vec::new();
        };

        match self.fetch(&descriptor).await {
            Ok(records) => filter_by_target(records, branches),
            Err(e) => {
                log::warn!(
                    "Could not fetch pull requests for {} ({}): {e}",
                    descriptor.label(),
                    remote.name
                );
                Vec::new()
            }
        }
    }

    pub async fn fetch(&self, descriptor: &HostDescriptor) -> Result<Vec<PullRequestRecord>> {
        match descriptor.host_type {
            HostType::GitHub => self.fetch_github(descriptor).await,
            HostType::GitLab => self.fetch_gitlab(descriptor).await,
            HostType::Bitbucket => self.fetch_bitbucket(descriptor).await,
            HostType::Other => Ok(Vec::new()),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        host: HostType,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        log::debug!("GET {url}");
        let mut request = self.http.get(url).query(query);
        if host == HostType::GitHub {
            request = request.header("Accept", "application/vnd.github+json");
        }

        let response = request.send().await.map_err(|e| DenError::http(host, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DenError::http_status(host, status.as_u16()));
        }
        response.json().await.map_err(|e| DenError::http(host, e))
    }

    async fn fetch_github(&self, descriptor: &HostDescriptor) -> Result<Vec<PullRequestRecord>> {
        let url = format!(
            "{}/repos/{}/{}/pulls",
            self.endpoints.github.trim_end_matches('/'),
            descriptor.owner,
            descriptor.repo
        );
        let pulls: Vec<GitHubPull> = self
            .get_json(
                HostType::GitHub,
                &url,
                &[
                    ("state", "open"),
                    ("sort", "updated"),
                    ("direction", "desc"),
                    ("per_page", "100"),
                ],
            )
            .await?;
        let label = descriptor.label();
        Ok(pulls.into_iter().map(|p| p.into_record(&label)).collect())
    }

    async fn fetch_gitlab(&self, descriptor: &HostDescriptor) -> Result<Vec<PullRequestRecord>> {
        let project: String =
            url::form_urlencoded::byte_serialize(descriptor.label().as_bytes()).collect();
        let url = format!(
            "{}/projects/{}/merge_requests",
            self.endpoints.gitlab.trim_end_matches('/'),
            project
        );
        let requests: Vec<GitLabMergeRequest> = self
            .get_json(
                HostType::GitLab,
                &url,
                &[
                    ("state", "opened"),
                    ("order_by", "updated_at"),
                    ("sort", "desc"),
                    ("per_page", "100"),
                ],
            )
            .await?;
        let label = descriptor.label();
        Ok(requests.into_iter().map(|r| r.into_record(&label)).collect())
    }

    async fn fetch_bitbucket(&self, descriptor: &HostDescriptor) -> Result<Vec<PullRequestRecord>> {
        let url = format!(
            "{}/repositories/{}/{}/pullrequests",
            self.endpoints.bitbucket.trim_end_matches('/'),
            descriptor.owner,
            descriptor.repo
        );
        // Bitbucket caps pagelen at 50
        let page: BitbucketPage = self
            .get_json(
                HostType::Bitbucket,
                &url,
                &[("state", "OPEN"), ("sort", "-updated_on"), ("pagelen", "50")],
            )
            .await?;
        let label = descriptor.label();
        Ok(page
            .values
            .into_iter()
            .map(|p| p.into_record(&label))
            .collect())
    }
}

/// Keep only requests targeting an allow-listed branch.
pub fn filter_by_target(records: Vec<PullRequestRecord>, branches: &[String]) -> Vec<PullRequestRecord> {
    records
        .into_iter()
        .filter(|r| branches.iter().any(|b| *b == r.target_branch))
        .collect()
}

#[derive(Debug, Deserialize)]
struct GitHubPull {
    number: u64,
    title: String,
    html_url: String,
    base: GitHubRef,
    head: GitHubRef,
    user: Option<GitHubUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

impl GitHubPull {
    fn into_record(self, repository: &str) -> PullRequestRecord {
        PullRequestRecord {
            host: HostType::GitHub,
            id: self.number,
            title: self.title,
            url: self.html_url,
            target_branch: self.base.name,
            source_branch: self.head.name,
            author: self.user.map(|u| u.login).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            draft: self.draft,
            repository: repository.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabMergeRequest {
    iid: u64,
    title: String,
    web_url: String,
    target_branch: String,
    source_branch: String,
    author: Option<GitLabUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    work_in_progress: bool,
}

#[derive(Debug, Deserialize)]
struct GitLabUser {
    username: String,
}

impl GitLabMergeRequest {
    fn into_record(self, repository: &str) -> PullRequestRecord {
        PullRequestRecord {
            host: HostType::GitLab,
            id: self.iid,
            title: self.title,
            url: self.web_url,
            target_branch: self.target_branch,
            source_branch: self.source_branch,
            author: self.author.map(|a| a.username).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            draft: self.draft || self.work_in_progress,
            repository: repository.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BitbucketPage {
    #[serde(default)]
    values: Vec<BitbucketPull>,
}

#[derive(Debug, Deserialize)]
struct BitbucketPull {
    id: u64,
    title: String,
    links: BitbucketLinks,
    source: BitbucketEndpoint,
    destination: BitbucketEndpoint,
    author: Option<BitbucketUser>,
    created_on: DateTime<Utc>,
    updated_on: DateTime<Utc>,
    #[serde(default)]
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct BitbucketLinks {
    html: BitbucketHref,
}

#[derive(Debug, Deserialize)]
struct BitbucketHref {
    href: String,
}

#[derive(Debug, Deserialize)]
struct BitbucketEndpoint {
    branch: BitbucketBranch,
}

#[derive(Debug, Deserialize)]
struct BitbucketBranch {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BitbucketUser {
    display_name: String,
}

impl BitbucketPull {
    fn into_record(self, repository: &str) -> PullRequestRecord {
        PullRequestRecord {
            host: HostType::Bitbucket,
            id: self.id,
            title: self.title,
            url: self.links.html.href,
            target_branch: self.destination.branch.name,
            source_branch: self.source.branch.name,
            author: self.author.map(|a| a.display_name).unwrap_or_default(),
            created_at: self.created_on,
            updated_at: self.updated_on,
            draft: self.draft,
            repository: repository.to_string(),
        }
    }
}
