//! Status line and action menu.
//!
//! [`StatusPresenter`] turns config and repository state into a
//! `(state, label)` pair and forwards it to a [`StatusSink`] only when the
//! pair differs from what is already displayed. The action menu lists the
//! git entries only when a repository was detected.

use crate::core::config_store::LoadedConfig;
use crate::core::state::RepositoryInfo;
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusState {
    Loading,
    Loaded,
    NotFound,
    Error,
}

pub trait StatusSink {
    fn write(&mut self, state: StatusState, label: &str);
}

/// Prints the status line to stdout.
#[derive(Debug, Default)]
pub struct TerminalStatusLine;

impl StatusSink for TerminalStatusLine {
    fn write(&mut self, state: StatusState, label: &str) {
        let marker = match state {
            StatusState::Loading => "…".bright_black(),
            StatusState::Loaded => "●".green(),
            StatusState::NotFound => "○".yellow(),
            StatusState::Error => "✕".red(),
        };
        println!("{} {}", marker, label.white());
    }
}

pub struct StatusPresenter<S: StatusSink> {
    sink: S,
    displayed: Option<(StatusState, String)>,
}

impl<S: StatusSink> StatusPresenter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            displayed: None,
        }
    }

    pub fn displayed(&self) -> Option<(StatusState, &str)> {
        self.displayed
            .as_ref()
            .map(|(state, label)| (*state, label.as_str()))
    }

    /// Write `(state, label)` unless exactly that pair is already shown.
    /// Returns whether the sink was written.
    pub fn update(&mut self, state: StatusState, label: &str) -> bool {
        if let Some((shown_state, shown_label)) = &self.displayed {
            if *shown_state == state && shown_label == label {
                return false;
            }
        }
        self.sink.write(state, label);
        self.displayed = Some((state, label.to_string()));
        true
    }

    /// Render config and repository state.
    pub fn render(&mut self, config: Option<&LoadedConfig>, repo: Option<&RepositoryInfo>) -> bool {
        let (state, label) = status_for(config, repo);
        self.update(state, &label)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

pub fn status_for(config: Option<&LoadedConfig>, repo: Option<&RepositoryInfo>) -> (StatusState, String) {
    let (state, mut label) = match config {
        Some(loaded) => (StatusState::Loaded, format!("Den: {}", loaded.record.name)),
        None => (StatusState::NotFound, "Den: no config found".to_string()),
    };

    if let Some(info) = repo.filter(|info| info.is_repository && !info.branch.is_empty()) {
        label.push_str(&format!(" | {}", info.branch));
        let ahead_behind = info.status.ahead_behind_label();
        if !ahead_behind.is_empty() {
            label.push_str(&format!(" {ahead_behind}"));
        }
        if !info.status.is_clean {
            label.push('*');
        }
    }

    (state, label)
}

/// Entries of the action menu, each naming the CLI subcommand it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuEntry {
    ShowConfigInfo,
    ValidateConfig,
    ReloadConfig,
    ClearCache,
    CreateDefaultConfig,
    OpenSettings,
    ShowPullRequests,
    SwitchBranch,
    ShowRepositoryInfo,
    RefreshGitStatus,
}

impl MenuEntry {
    pub fn label(&self) -> &'static str {
        match self {
            MenuEntry::ShowConfigInfo => "Show Configuration Info",
            MenuEntry::ValidateConfig => "Validate Configuration",
            MenuEntry::ReloadConfig => "Reload Configuration",
            MenuEntry::ClearCache => "Clear Cache",
            MenuEntry::CreateDefaultConfig => "Create Default Configuration",
            MenuEntry::OpenSettings => "Open Settings",
            MenuEntry::ShowPullRequests => "Show Pull Requests",
            MenuEntry::SwitchBranch => "Switch Branch",
            MenuEntry::ShowRepositoryInfo => "Show Repository Info",
            MenuEntry::RefreshGitStatus => "Refresh Git Status",
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            MenuEntry::ShowConfigInfo => "info",
            MenuEntry::ValidateConfig => "validate",
            MenuEntry::ReloadConfig => "reload",
            MenuEntry::ClearCache => "clear-cache",
            MenuEntry::CreateDefaultConfig => "init",
            MenuEntry::OpenSettings => "settings",
            MenuEntry::ShowPullRequests => "prs",
            MenuEntry::SwitchBranch => "switch",
            MenuEntry::ShowRepositoryInfo => "repo",
            MenuEntry::RefreshGitStatus => "refresh",
        }
    }

    pub fn is_git(&self) -> bool {
        matches!(
            self,
            MenuEntry::ShowPullRequests
                | MenuEntry::SwitchBranch
                | MenuEntry::ShowRepositoryInfo
                | MenuEntry::RefreshGitStatus
        )
    }
}

const ALL_ENTRIES: [MenuEntry; 10] = [
    MenuEntry::ShowConfigInfo,
    MenuEntry::ValidateConfig,
    MenuEntry::ReloadConfig,
    MenuEntry::ClearCache,
    MenuEntry::CreateDefaultConfig,
    MenuEntry::OpenSettings,
    MenuEntry::ShowPullRequests,
    MenuEntry::SwitchBranch,
    MenuEntry::ShowRepositoryInfo,
    MenuEntry::RefreshGitStatus,
];

pub fn menu(repository_detected: bool) -> Vec<MenuEntry> {
    ALL_ENTRIES
        .into_iter()
        .filter(|entry| repository_detected || !entry.is_git())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_store::ConfigRecord;
    use crate::core::git_status::WorkingTreeStatus;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<(StatusState, String)>,
    }

    impl StatusSink for RecordingSink {
        fn write(&mut self, state: StatusState, label: &str) {
            self.writes.push((state, label.to_string()));
        }
    }

    fn loaded(name: &str) -> LoadedConfig {
        let mut record = ConfigRecord::default_template();
        record.name = name.to_string();
        LoadedConfig {
            record,
            source: PathBuf::from("/work/den.yml"),
        }
    }

    fn repo(branch: &str, status: WorkingTreeStatus) -> RepositoryInfo {
        let mut info = RepositoryInfo::not_a_repository(PathBuf::from("/work"));
        info.is_repository = true;
        info.branch = branch.to_string();
        info.status = status;
        info
    }

    #[test]
    fn test_identical_update_writes_once() {
        let mut presenter = StatusPresenter::new(RecordingSink::default());
        assert!(presenter.update(StatusState::Loaded, "Den: Foo"));
        assert!(!presenter.update(StatusState::Loaded, "Den: Foo"));
        assert_eq!(presenter.sink().writes.len(), 1);
    }

    #[test]
    fn test_change_in_either_field_writes() {
        let mut presenter = StatusPresenter::new(RecordingSink::default());
        presenter.update(StatusState::Loaded, "Den: Foo");
        assert!(presenter.update(StatusState::Error, "Den: Foo"));
        assert!(presenter.update(StatusState::Error, "Den: Bar"));
        assert_eq!(presenter.sink().writes.len(), 3);
        assert_eq!(presenter.displayed(), Some((StatusState::Error, "Den: Bar")));
    }

    #[test]
    fn test_status_without_config() {
        let (state, label) = status_for(None, None);
        assert_eq!(state, StatusState::NotFound);
        assert_eq!(label, "Den: no config found");
    }

    #[test]
    fn test_status_includes_branch_and_divergence() {
        let status = WorkingTreeStatus {
            ahead: 2,
            ..WorkingTreeStatus::default()
        };
        let (state, label) = status_for(Some(&loaded("Foo")), Some(&repo("develop", status)));
        assert_eq!(state, StatusState::Loaded);
        assert_eq!(label, "Den: Foo | develop +2");

        let dirty = WorkingTreeStatus {
            is_clean: false,
            modified: 1,
            ..WorkingTreeStatus::default()
        };
        let (_, label) = status_for(Some(&loaded("Foo")), Some(&repo("main", dirty)));
        assert_eq!(label, "Den: Foo | main*");
    }

    #[test]
    fn test_render_dedups_same_state() {
        let mut presenter = StatusPresenter::new(RecordingSink::default());
        let config = loaded("Foo");
        assert!(presenter.render(Some(&config), None));
        assert!(!presenter.render(Some(&config), None));
        assert!(presenter.render(None, None));
    }

    #[test]
    fn test_menu_hides_git_entries_without_repository() {
        let entries = menu(false);
        assert!(entries.iter().all(|e| !e.is_git()));
        assert!(entries.contains(&MenuEntry::ValidateConfig));

        let entries = menu(true);
        assert_eq!(entries.len(), 10);
        assert!(entries.contains(&MenuEntry::SwitchBranch));
    }
}
