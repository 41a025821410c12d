//! Core functionality for den.
//!
//! This module provides the long-lived components of a workspace session:
//! configuration discovery and caching, git snapshots, host API access, the
//! pull request watcher, the status presenter and the config file watcher.

pub mod config_store;
pub mod dirs;
pub mod error;
pub mod file_watch;
pub mod git;
pub mod git_status;
pub mod host;
pub mod output;
pub mod presenter;
pub mod remote;
pub mod session;
pub mod settings;
pub mod state;
pub mod watcher;

// === Error handling ===
pub use error::{DenError, Result};

// === Configuration ===
// Discovery, coercion, validation and caching of the environment config
pub use config_store::{
    validate, validate_document, ConfigRecord, ConfigStore, CreateOutcome, LoadedConfig,
    ValidationReport,
};
pub use settings::{GitSettings, HostSettings, Settings};

// === Git and hosts ===
pub use git::RepositorySnapshot;
pub use git_status::WorkingTreeStatus;
pub use host::HostClient;
pub use remote::{HostDescriptor, HostType, Remote};
pub use state::{Commit, PullRequestRecord, RepositoryInfo};

// === Watching ===
pub use file_watch::{ConfigEventKind, ConfigFileWatcher};
pub use watcher::{Notification, NotificationAction, Notifier, RequestWatcher, WatcherConfig};

// === Presentation ===
pub use presenter::{menu, MenuEntry, StatusPresenter, StatusSink, StatusState};
pub use session::Session;

// === Output formatting ===
pub use output::{
    format_numbered, print_error, print_field, print_info, print_section_header, print_success,
    print_warning,
};
