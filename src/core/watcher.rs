//! Pull request polling, diffing and notification.
//!
//! [`RequestWatcher`] owns a repeating timer. Each tick refreshes the
//! repository snapshot, asks the [`HostClient`] for open requests on every
//! recognized remote (concurrently), diffs the results against the previous
//! list per remote name and raises one [`Notification`] for everything new.
//!
//! # State machine
//! idle -> `start_monitoring` -> polling -> `stop_monitoring` / `dispose` -> idle.
//! A disabled configuration keeps the watcher idle.
//!
//! # New-item rule
//! An item is new iff its id is missing from the previous list for the same
//! remote name. The first observation of a remote only seeds history, so
//! turning the watcher on never produces a burst of notifications. Only ids
//! count: a retitled request is not announced again.

use crate::core::git::RepositorySnapshot;
use crate::core::host::HostClient;
use crate::core::settings::GitSettings;
use crate::core::state::PullRequestRecord;
use futures_util::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, PartialEq)]
pub struct WatcherConfig {
    pub enabled: bool,
    pub branches: Vec<String>,
    pub interval: Duration,
    pub notifications: bool,
    pub include_drafts: bool,
}

impl WatcherConfig {
    pub fn from_settings(git: &GitSettings) -> Self {
        Self {
            enabled: git.enabled,
            branches: git.monitored_branches.clone(),
            interval: git.polling_interval(),
            notifications: git.notifications,
            include_drafts: git.include_drafts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAction {
    /// Open the request in a browser.
    Open(String),
    /// Show a selectable list of all new requests.
    ViewAll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Single(PullRequestRecord),
    Summary(Vec<PullRequestRecord>),
}

impl Notification {
    /// `None` for an empty batch, a single-item notification for one new
    /// request, a count summary otherwise.
    pub fn from_items(mut items: Vec<PullRequestRecord>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop().map(Notification::Single),
            _ => Some(Notification::Summary(items)),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::Single(pr) => format!(
                "New pull request in {}: {} {}",
                pr.repository,
                pr.reference(),
                pr.title
            ),
            Notification::Summary(items) => format!("{} new pull requests", items.len()),
        }
    }

    pub fn action(&self) -> NotificationAction {
        match self {
            Notification::Single(pr) => NotificationAction::Open(pr.url.clone()),
            Notification::Summary(_) => NotificationAction::ViewAll,
        }
    }

    pub fn items(&self) -> &[PullRequestRecord] {
        match self {
            Notification::Single(pr) => std::slice::from_ref(pr),
            Notification::Summary(items) => items,
        }
    }
}

/// Receiver of watcher notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl Notifier for UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            log::debug!("Notification dropped: receiver closed");
        }
    }
}

/// Items of `current` whose id is missing from `previous`. A missing or
/// empty previous list counts as a first observation and yields nothing.
pub fn new_items(
    previous: Option<&[PullRequestRecord]>,
    current: &[PullRequestRecord],
) -> Vec<PullRequestRecord> {
    let previous = match previous {
        Some(previous) if !previous.is_empty() => previous,
        _ => return Vec::new(),
    };
    current
        .iter()
        .filter(|item| !previous.iter().any(|seen| seen.key() == item.key()))
        .cloned()
        .collect()
}

/// Last-seen request list per remote name.
#[derive(Debug, Default)]
pub struct WatcherState {
    history: HashMap<String, Vec<PullRequestRecord>>,
}

impl WatcherState {
    /// Diff `current` against the stored list for `remote`, then replace it.
    pub fn record(&mut self, remote: &str, current: Vec<PullRequestRecord>) -> Vec<PullRequestRecord> {
        let fresh = new_items(self.history.get(remote).map(Vec::as_slice), &current);
        self.history.insert(remote.to_string(), current);
        fresh
    }

    pub fn history(&self, remote: &str) -> Option<&[PullRequestRecord]> {
        self.history.get(remote).map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

struct Shared {
    repo: Arc<RepositorySnapshot>,
    client: HostClient,
    config: RwLock<WatcherConfig>,
    state: Mutex<WatcherState>,
    notifier: Arc<dyn Notifier>,
}

impl Shared {
    /// Steps 1-2 of a tick: snapshot, then one query per recognized remote.
    /// `None` when there is no repository or it has no remotes.
    async fn fetch_current(&self) -> Option<Vec<(String, Vec<PullRequestRecord>)>> {
        let info = self.repo.refresh().await?;
        if info.remotes.is_empty() {
            return None;
        }

        let config = self.config.read().clone();
        let queries = info
            .remotes
            .iter()
            .filter(|remote| remote.descriptor().is_some())
            .map(|remote| {
                let branches = &config.branches;
                async move {
                    let records = self.client.open_requests(remote, branches).await;
                    (remote.name.clone(), records)
                }
            });

        let mut results = join_all(queries).await;
        if !config.include_drafts {
            for (_, records) in &mut results {
                records.retain(|r| !r.draft);
            }
        }
        Some(results)
    }

    async fn tick(&self) -> Vec<PullRequestRecord> {
        let Some(results) = self.fetch_current().await else {
            log::debug!("Skipping pull request poll: no repository or remotes");
            return Vec::new();
        };

        let fresh: Vec<PullRequestRecord> = {
            let mut state = self.state.lock();
            results
                .into_iter()
                .flat_map(|(remote, current)| state.record(&remote, current))
                .collect()
        };

        if !fresh.is_empty() {
            log::info!("Found {} new pull request(s)", fresh.len());
            if self.config.read().notifications {
                if let Some(notification) = Notification::from_items(fresh.clone()) {
                    self.notifier.notify(notification);
                }
            }
        }
        fresh
    }
}

pub struct RequestWatcher {
    shared: Arc<Shared>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl RequestWatcher {
    pub fn new(
        repo: Arc<RepositorySnapshot>,
        client: HostClient,
        config: WatcherConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                repo,
                client,
                config: RwLock::new(config),
                state: Mutex::new(WatcherState::default()),
                notifier,
            }),
            timer: Mutex::new(None),
        }
    }

    pub fn config(&self) -> WatcherConfig {
        self.shared.config.read().clone()
    }

    pub fn is_monitoring(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start (or restart) the polling timer. The first tick runs immediately
    /// and seeds history. Must be called within a tokio runtime.
    pub fn start_monitoring(&self) {
        self.stop_monitoring();

        let config = self.config();
        if !config.enabled {
            log::debug!("Pull request monitoring disabled");
            return;
        }

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                shared.tick().await;
            }
        });

        log::info!(
            "Monitoring pull requests every {}s for branches: {}",
            config.interval.as_secs(),
            config.branches.join(", ")
        );
        *self.timer.lock() = Some(handle);
    }

    /// Cancel the timer. Safe to call when already stopped.
    pub fn stop_monitoring(&self) {
        if let Some(handle) = self.timer.lock().take() {
            handle.abort();
            log::debug!("Pull request monitoring stopped");
        }
    }

    /// Swap configuration without touching the timer.
    pub fn set_config(&self, config: WatcherConfig) {
        *self.shared.config.write() = config;
    }

    /// Swap configuration and restart or stop the timer accordingly. History
    /// is kept so already-seen requests are not announced again.
    pub fn update_config(&self, config: WatcherConfig) {
        let enabled = config.enabled;
        self.set_config(config);
        if enabled {
            self.start_monitoring();
        } else {
            self.stop_monitoring();
        }
    }

    /// Run one poll/diff/notify tick now and return the new items.
    pub async fn poll(&self) -> Vec<PullRequestRecord> {
        self.shared.tick().await
    }

    /// Current open requests across remotes, without touching history.
    pub async fn current_pull_requests(&self) -> Vec<PullRequestRecord> {
        self.shared
            .fetch_current()
            .await
            .map(|results| results.into_iter().flat_map(|(_, records)| records).collect())
            .unwrap_or_default()
    }

    pub fn history(&self, remote: &str) -> Option<Vec<PullRequestRecord>> {
        self.shared.state.lock().history(remote).map(<[_]>::to_vec)
    }

    /// Stop the timer and forget all history.
    pub fn dispose(&self) {
        self.stop_monitoring();
        self.shared.state.lock().clear();
    }
}

impl Drop for RequestWatcher {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}
