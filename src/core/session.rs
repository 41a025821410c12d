//! One workspace session: the explicitly owned config store, repository
//! snapshot, host client and pull request watcher that every command runs
//! against.
//!
//! One-shot CLI invocations open a session, run a single command and drop
//! it. `den watch` keeps the same session alive so the config cache and the
//! watcher history persist between commands; [`Session::dispose`] tears it
//! down exactly once.

use crate::core::{
    config_store::{ConfigStore, LoadedConfig},
    dirs::get_settings_file,
    error::{DenError, Result},
    file_watch::{ConfigEventKind, ConfigFileWatcher},
    git::RepositorySnapshot,
    host::HostClient,
    presenter::{StatusPresenter, StatusState, TerminalStatusLine},
    settings::Settings,
    state::RepositoryInfo,
    watcher::{Notification, RequestWatcher, WatcherConfig},
};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct Session {
    settings_path: Option<PathBuf>,
    settings: RwLock<Settings>,
    config: Arc<Mutex<ConfigStore>>,
    repo: Arc<RepositorySnapshot>,
    watcher: RequestWatcher,
    notifications: Mutex<Option<UnboundedReceiver<Notification>>>,
    presenter: Mutex<StatusPresenter<TerminalStatusLine>>,
    file_watcher: Mutex<Option<ConfigFileWatcher>>,
    settings_watcher: Mutex<Option<ConfigFileWatcher>>,
    disposed: AtomicBool,
}

impl Session {
    /// Open a session over `roots` (the current directory when empty).
    /// `settings_path` overrides the default settings file location.
    pub fn open(roots: Vec<PathBuf>, settings_path: Option<PathBuf>) -> Result<Self> {
        let roots = if roots.is_empty() {
            vec![std::env::current_dir()?]
        } else {
            roots
        };
        let settings = Settings::load(settings_path.as_deref());
        log::debug!(
            "Opening session for {}",
            roots
                .iter()
                .map(|r| r.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let repo = Arc::new(RepositorySnapshot::new(roots[0].clone()));
        let hosts = HostClient::new(settings.hosts.clone())?;
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = RequestWatcher::new(
            Arc::clone(&repo),
            hosts,
            WatcherConfig::from_settings(&settings.git),
            Arc::new(tx),
        );
        let config = Arc::new(Mutex::new(ConfigStore::new(roots, &settings)));

        Ok(Self {
            settings_path,
            settings: RwLock::new(settings),
            config,
            repo,
            watcher,
            notifications: Mutex::new(Some(rx)),
            presenter: Mutex::new(StatusPresenter::new(TerminalStatusLine)),
            file_watcher: Mutex::new(None),
            settings_watcher: Mutex::new(None),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Location of the settings file this session reads.
    pub fn settings_path(&self) -> Result<PathBuf> {
        match &self.settings_path {
            Some(path) => Ok(path.clone()),
            None => get_settings_file(),
        }
    }

    pub fn config(&self) -> &Arc<Mutex<ConfigStore>> {
        &self.config
    }

    pub fn repo(&self) -> &RepositorySnapshot {
        &self.repo
    }

    pub fn watcher(&self) -> &RequestWatcher {
        &self.watcher
    }

    pub fn load_config(&self) -> Option<LoadedConfig> {
        self.config.lock().load()
    }

    /// Receiver of watcher notifications. Only the first caller gets it.
    pub fn take_notifications(&self) -> Option<UnboundedReceiver<Notification>> {
        self.notifications.lock().take()
    }

    /// Snapshot the repository if there is one.
    pub async fn repository_info(&self) -> Option<RepositoryInfo> {
        if !self.repo.is_repository() {
            return None;
        }
        self.repo.refresh().await
    }

    /// Recompute the status line and print it when it changed.
    pub async fn render_status(&self) -> bool {
        let loaded = self.load_config();
        let info = self.repository_info().await;

        let mut presenter = self.presenter.lock();
        if loaded.is_none() && self.has_unreadable_config() {
            return presenter.update(StatusState::Error, "Den: configuration unreadable");
        }
        presenter.render(loaded.as_ref(), info.as_ref())
    }

    pub fn show_loading(&self) {
        self.presenter.lock().update(StatusState::Loading, "Den: loading…");
    }

    /// A candidate file exists, yet nothing loaded.
    fn has_unreadable_config(&self) -> bool {
        !self.config.lock().existing_candidates().is_empty()
    }

    /// Start the pull request timer when enabled and inside a repository.
    pub fn start_monitoring(&self) -> bool {
        if !self.settings.read().git.enabled {
            log::debug!("Git integration disabled");
            return false;
        }
        if !self.repo.is_repository() {
            log::debug!("Not monitoring pull requests: no repository");
            return false;
        }
        self.watcher.start_monitoring();
        self.watcher.is_monitoring()
    }

    /// Watch configuration files when `watchFiles` is on. Events arrive on
    /// `events`, already debounced.
    pub fn start_file_watcher(&self, events: UnboundedSender<ConfigEventKind>) -> Result<bool> {
        if !self.settings.read().watch_files {
            log::debug!("Config file watching disabled");
            return Ok(false);
        }
        let directories = self.config.lock().watch_directories();
        let store = Arc::clone(&self.config);
        let watcher = ConfigFileWatcher::start(
            &directories,
            move |path| store.lock().is_config_file(path),
            events,
        )?;
        *self.file_watcher.lock() = Some(watcher);
        Ok(true)
    }

    /// Re-read the settings file and push it into the config store and the
    /// pull request watcher. The watcher timer is only touched once
    /// monitoring is possible, i.e. inside a repository.
    pub fn reload_settings(&self) -> Result<Settings> {
        let path = self.settings_path()?;
        let settings = Settings::load(Some(&path));

        let previous = std::mem::replace(&mut *self.settings.write(), settings.clone());
        if previous.hosts != settings.hosts {
            log::warn!("Host API URL changes take effect in the next session");
        }

        self.config.lock().apply_settings(&settings);
        let watcher_config = WatcherConfig::from_settings(&settings.git);
        if self.repo.is_repository() {
            self.watcher.update_config(watcher_config);
        } else {
            self.watcher.set_config(watcher_config);
        }
        log::info!("Settings reloaded from {}", path.display());
        Ok(settings)
    }

    /// Watch the settings file itself. Events arrive on `events`, debounced.
    pub fn start_settings_watcher(&self, events: UnboundedSender<ConfigEventKind>) -> Result<bool> {
        let path = self.settings_path()?;
        let Some(directory) = path.parent().map(Path::to_path_buf) else {
            return Ok(false);
        };
        if !directory.is_dir() {
            log::debug!("Not watching settings: {} does not exist", directory.display());
            return Ok(false);
        }
        let name = path.file_name().map(|n| n.to_os_string());
        let watcher = ConfigFileWatcher::start(
            &[directory],
            move |changed| changed.file_name().map(|n| n.to_os_string()) == name,
            events,
        )?;
        *self.settings_watcher.lock() = Some(watcher);
        Ok(true)
    }

    /// A debounced config file event: drop the cache, reload, re-render.
    pub async fn on_config_file_event(&self, kind: ConfigEventKind) -> bool {
        log::info!("Configuration file {}", kind.as_str());
        self.config.lock().clear_cache();
        self.render_status().await
    }

    /// Stop the timer, forget history, drop watchers. Later calls are no-ops.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.watcher.dispose();
        self.file_watcher.lock().take();
        self.settings_watcher.lock().take();
        self.config.lock().clear_cache();
        log::debug!("Session disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Lookup used by commands that require a repository.
pub fn require_repository(session: &Session) -> Result<()> {
    if session.repo().is_repository() {
        Ok(())
    } else {
        Err(DenError::NotInGitRepo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> Session {
        Session::open(
            vec![dir.path().to_path_buf()],
            Some(dir.path().join("settings.json")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_open_uses_defaults_without_settings_file() {
        let dir = TempDir::new().unwrap();
        let session = open_in(&dir);
        assert_eq!(session.settings(), Settings::default());
        assert_eq!(session.settings_path().unwrap(), dir.path().join("settings.json"));
        assert!(session.load_config().is_none());
    }

    #[tokio::test]
    async fn test_notifications_taken_once() {
        let dir = TempDir::new().unwrap();
        let session = open_in(&dir);
        assert!(session.take_notifications().is_some());
        assert!(session.take_notifications().is_none());
    }

    #[tokio::test]
    async fn test_monitoring_requires_repository() {
        let dir = TempDir::new().unwrap();
        let session = open_in(&dir);
        assert!(!session.start_monitoring());
        assert!(require_repository(&session).is_err());
    }

    #[tokio::test]
    async fn test_file_event_reloads_configuration() {
        let dir = TempDir::new().unwrap();
        let session = open_in(&dir);
        std::fs::write(dir.path().join("den.yml"), "name: Foo\n").unwrap();
        assert_eq!(session.load_config().unwrap().record.name, "Foo");

        std::fs::write(dir.path().join("den.yml"), "name: Bar\n").unwrap();
        // Still cached
        assert_eq!(session.load_config().unwrap().record.name, "Foo");

        session.on_config_file_event(ConfigEventKind::Changed).await;
        assert_eq!(session.load_config().unwrap().record.name, "Bar");
    }

    #[tokio::test]
    async fn test_unparseable_config_renders_error_state() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("den.yml"), "- just\n- a list\n").unwrap();
        let session = open_in(&dir);
        assert!(session.render_status().await);
        let presenter = session.presenter.lock();
        assert_eq!(presenter.displayed().map(|(s, _)| s), Some(StatusState::Error));
    }

    #[tokio::test]
    async fn test_reload_settings_reaches_store_and_watcher() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("den.yml"), "name: Discovered\n")?;
        std::fs::write(dir.path().join("team.yml"), "name: Team\n")?;
        let session = open_in(&dir);
        assert_eq!(session.load_config().unwrap().record.name, "Discovered");

        let mut settings = Settings::default();
        settings.config_path = Some(PathBuf::from("team.yml"));
        settings.git.enabled = false;
        settings.git.monitored_branches = vec!["trunk".to_string()];
        settings.save_to(&dir.path().join("settings.json"))?;

        let reloaded = session.reload_settings()?;
        assert_eq!(reloaded, settings);
        assert_eq!(session.settings(), settings);
        assert_eq!(session.load_config().unwrap().record.name, "Team");

        let config = session.watcher().config();
        assert!(!config.enabled);
        assert_eq!(config.branches, vec!["trunk".to_string()]);
        assert!(!session.start_monitoring());
        Ok(())
    }

    #[tokio::test]
    async fn test_settings_watcher_needs_existing_directory() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let session = Session::open(
            vec![dir.path().to_path_buf()],
            Some(dir.path().join("missing").join("settings.json")),
        )?;
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(!session.start_settings_watcher(tx)?);

        let session = open_in(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(session.start_settings_watcher(tx)?);
        session.dispose();
        assert!(session.settings_watcher.lock().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let session = open_in(&dir);
        session.dispose();
        session.dispose();
        assert!(session.is_disposed());
        assert!(!session.watcher().is_monitoring());
    }
}
