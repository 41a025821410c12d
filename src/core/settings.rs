//! Host-application settings: where to look for the environment config, how
//! long to cache it, and how the pull request watcher behaves.
//!
//! Settings live in a camelCase JSON file (see [`crate::core::dirs`]). Every
//! key is optional; missing keys take their defaults and out-of-range
//! durations are clamped when read, never rejected.

use crate::core::dirs::get_settings_file;
use crate::core::error::{DenError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CACHE_TIMEOUT_MS: u64 = 30_000;
pub const MIN_CACHE_TIMEOUT_MS: u64 = 5_000;
pub const MAX_CACHE_TIMEOUT_MS: u64 = 300_000;

pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 300_000;
pub const MIN_POLLING_INTERVAL_MS: u64 = 60_000;
pub const MAX_POLLING_INTERVAL_MS: u64 = 1_800_000;

pub const DEFAULT_MONITORED_BRANCHES: [&str; 4] = ["develop", "test", "master", "main"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    pub auto_search: bool,
    pub cache_timeout: u64,
    pub watch_files: bool,
    pub git: GitSettings,
    pub hosts: HostSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GitSettings {
    pub enabled: bool,
    pub monitored_branches: Vec<String>,
    pub polling_interval: u64,
    pub notifications: bool,
    pub include_drafts: bool,
}

/// API roots per host; overridable for self-hosted instances.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HostSettings {
    pub github: String,
    pub gitlab: String,
    pub bitbucket: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: None,
            auto_search: true,
            cache_timeout: DEFAULT_CACHE_TIMEOUT_MS,
            watch_files: true,
            git: GitSettings::default(),
            hosts: HostSettings::default(),
        }
    }
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            monitored_branches: DEFAULT_MONITORED_BRANCHES
                .iter()
                .map(|b| b.to_string())
                .collect(),
            polling_interval: DEFAULT_POLLING_INTERVAL_MS,
            notifications: true,
            include_drafts: true,
        }
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            github: "https://api.github.com".to_string(),
            gitlab: "https://gitlab.com/api/v4".to_string(),
            bitbucket: "https://api.bitbucket.org/2.0".to_string(),
        }
    }
}

impl Settings {
    /// Load from the explicit path, or the default settings file.
    ///
    /// A missing file yields defaults. A malformed one is logged and also
    /// yields defaults; settings problems never stop the tool.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match get_settings_file() {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("Settings location unavailable, using defaults: {e}");
                    return Self::default();
                }
            },
        };

        match Self::load_from(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                log::debug!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| DenError::read_failed(path, e))?;
        let settings = serde_json::from_str(&content).map_err(|e| DenError::json_parse(path, e))?;
        Ok(Some(settings))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DenError::write_failed(parent, e))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| DenError::write_failed(path, e))?;
        Ok(())
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(
            self.cache_timeout
                .clamp(MIN_CACHE_TIMEOUT_MS, MAX_CACHE_TIMEOUT_MS),
        )
    }

    /// Override path resolved against the first workspace root when relative.
    pub fn resolved_config_path(&self, roots: &[PathBuf]) -> Option<PathBuf> {
        let path = self.config_path.as_ref()?;
        if path.as_os_str().is_empty() {
            return None;
        }
        if path.is_absolute() {
            return Some(path.clone());
        }
        match roots.first() {
            Some(root) => Some(root.join(path)),
            None => Some(path.clone()),
        }
    }
}

impl GitSettings {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(
            self.polling_interval
                .clamp(MIN_POLLING_INTERVAL_MS, MAX_POLLING_INTERVAL_MS),
        )
    }
}
