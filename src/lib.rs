//! den - developer environment config discovery with a branch and
//! pull request status companion.
//!
//! This library provides the building blocks of the `den` binary: locating,
//! caching and validating a per-workspace environment file, snapshotting the
//! git repository, polling GitHub, GitLab and Bitbucket for open pull
//! requests and announcing new ones.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - [`ConfigStore`]: config discovery, coercion, validation and caching
//! - [`RepositorySnapshot`]: git queries through the git command line
//! - [`HostClient`]: read-only host API access
//! - [`RequestWatcher`]: poll, diff and notify loop
//! - [`Session`]: explicitly owned per-workspace singletons

pub mod commands;
pub mod core;

pub use core::{
    ConfigRecord, ConfigStore, DenError, HostClient, LoadedConfig, Notification,
    PullRequestRecord, RepositoryInfo, RepositorySnapshot, RequestWatcher, Result, Session,
    Settings, StatusPresenter, StatusState,
};
