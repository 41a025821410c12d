//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`DenError`], the single error enum used across den.
//! Most component code never lets these escape: configuration discovery, git
//! queries and host API calls degrade to neutral values and log the error
//! instead. Command handlers are the only place an error reaches the user.
//!
//! # Public API
//! - [`DenError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, DenError>`

use crate::core::remote::HostType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DenError {
    // Workspace and repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("No workspace folder available")]
    NoWorkspace,

    #[error("No configuration file found")]
    ConfigNotFound,

    // Configuration file errors
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in '{path}': {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON in '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Configuration in '{path}' is not an object")]
    NotAnObject { path: PathBuf },

    #[error("Configuration has {count} error(s)")]
    ValidationFailed { count: usize },

    // Settings errors
    #[error("Could not find settings directory")]
    SettingsDirectoryNotFound,

    // Git errors
    #[error("Failed to spawn git: {0}")]
    GitSpawn(std::io::Error),

    #[error("git {command} failed: {message}")]
    GitCommand { command: String, message: String },

    #[error("Failed to switch to branch '{branch}'")]
    SwitchFailed { branch: String },

    // Host API errors
    #[error("{host} request failed: {source}")]
    Http {
        host: HostType,
        source: reqwest::Error,
    },

    #[error("{host} API returned HTTP {status}")]
    HttpStatus { host: HostType, status: u16 },

    // Watcher errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience type alias for Results using DenError
pub type Result<T> = std::result::Result<T, DenError>;

impl DenError {
    /// Create a read failed error
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a write failed error
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn yaml_parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::YamlParse {
            path: path.into(),
            source,
        }
    }

    pub fn json_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            path: path.into(),
            source,
        }
    }

    /// Create a git command error from the subcommand and its stderr
    pub fn git_command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GitCommand {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn http(host: HostType, source: reqwest::Error) -> Self {
        Self::Http { host, source }
    }

    pub fn http_status(host: HostType, status: u16) -> Self {
        Self::HttpStatus { host, status }
    }
}
