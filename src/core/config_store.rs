//! Environment configuration discovery, coercion, validation and caching.
//!
//! # Public API
//! - [`ConfigRecord`]: a fully populated environment configuration
//! - [`ConfigStore`]: per-workspace loader with a time-bounded cache
//! - [`validate`] / [`validate_document`]: user-facing structural checks
//!
//! # Resolution order
//! 1. The override path from settings, read directly.
//! 2. With auto-search enabled, each workspace root is searched for
//!    [`CONFIG_FILE_NAMES`] in order; the first readable, decodable object wins.
//!
//! Every failure along the way (missing file, bad YAML, a top-level array) is
//! logged and the next candidate is tried. [`ConfigStore::load`] only returns
//! `None` when nothing anywhere produced a record.

use crate::core::error::{DenError, Result};
use crate::core::settings::Settings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Discovery candidates, highest priority first.
pub const CONFIG_FILE_NAMES: [&str; 6] = [
    "den.yml",
    "den.yaml",
    "den.json",
    ".den.yml",
    ".den.yaml",
    ".den.json",
];

/// File written by [`ConfigStore::create_default`].
pub const DEFAULT_CONFIG_FILE: &str = "den.yml";

pub const DEFAULT_NAME: &str = "Default Environment";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_ENVIRONMENT: &str = "development";

const KNOWN_FIELDS: [&str; 5] = ["name", "version", "environment", "tools", "settings"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub tools: Vec<String>,
    pub settings: Map<String, Value>,
}

impl ConfigRecord {
    /// Coerce a decoded document into a complete record.
    ///
    /// Returns `None` only when the document is not an object. Missing or
    /// unusable fields are replaced by their defaults; scalar numbers and
    /// booleans are accepted as text (`version: 1.2` decodes as a float).
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };

        let name = take_text(&mut map, "name").unwrap_or_else(|| DEFAULT_NAME.to_string());
        let version =
            take_text(&mut map, "version").unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let environment = take_text(&mut map, "environment")
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let tools = match map.remove("tools") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(tool) => Some(tool),
                    other => {
                        log::warn!("Ignoring non-string tool entry: {other}");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        let settings = match map.remove("settings") {
            Some(Value::Object(settings)) => settings,
            _ => Map::new(),
        };

        Some(Self {
            name,
            version,
            environment,
            tools,
            settings,
        })
    }

    /// The record `den init` writes.
    pub fn default_template() -> Self {
        let mut settings = Map::new();
        settings.insert("shell".to_string(), Value::from("bash"));
        settings.insert("autoInstall".to_string(), Value::from(false));
        settings.insert("logLevel".to_string(), Value::from("info"));

        Self {
            name: "My Development Environment".to_string(),
            version: DEFAULT_VERSION.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            tools: ["git", "node", "docker"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            settings,
        }
    }
}

fn take_text(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A record together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub record: ConfigRecord,
    pub source: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// `.json` decodes as JSON; everything else as YAML, which also accepts JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Read and decode a config file without coercion.
pub fn decode_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| DenError::read_failed(path, e))?;
    match ConfigFormat::from_path(path) {
        ConfigFormat::Json => {
            serde_json::from_str(&content).map_err(|e| DenError::json_parse(path, e))
        }
        ConfigFormat::Yaml => {
            // An empty YAML document decodes to null, which is "not an object" below
            serde_yaml::from_str(&content).map_err(|e| DenError::yaml_parse(path, e))
        }
    }
}

/// Read, decode and coerce one config file.
pub fn read_config_file(path: &Path) -> Result<ConfigRecord> {
    let document = decode_document(path)?;
    ConfigRecord::from_value(document).ok_or_else(|| DenError::NotAnObject {
        path: path.to_path_buf(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn finish(mut self) -> Self {
        self.is_valid = self.errors.is_empty();
        self
    }
}

/// Check an already coerced record. Never mutates it.
pub fn validate(record: &ConfigRecord) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (field, value) in [
        ("name", &record.name),
        ("version", &record.version),
        ("environment", &record.environment),
    ] {
        if value.trim().is_empty() {
            report.errors.push(format!("Missing required field: {field}"));
        }
    }

    if record.tools.is_empty() {
        report.warnings.push("No tools specified".to_string());
    }

    let mut seen = std::collections::HashSet::new();
    for tool in &record.tools {
        if !seen.insert(tool.as_str()) {
            report.warnings.push(format!("Duplicate tool: {tool}"));
        }
    }

    if !record.version.trim().is_empty() && semver::Version::parse(&record.version).is_err() {
        report.warnings.push(format!(
            "Version '{}' is not a semantic version (expected MAJOR.MINOR.PATCH)",
            record.version
        ));
    }

    report.finish()
}

/// Stricter check of a raw decoded document: every field is required and
/// must have the right type. Record-level warnings are appended when the
/// document is an object.
pub fn validate_document(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Value::Object(map) = document else {
        report
            .errors
            .push("Configuration must be an object".to_string());
        return report.finish();
    };

    for field in ["name", "version", "environment"] {
        match map.get(field) {
            None | Some(Value::Null) => report.errors.push(format!("Missing required field: {field}")),
            Some(Value::String(_)) => {}
            Some(_) => report.errors.push(format!("Field '{field}' must be a string")),
        }
    }

    match map.get("tools") {
        None | Some(Value::Null) => report
            .errors
            .push("Missing required field: tools".to_string()),
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                if !item.is_string() {
                    report
                        .errors
                        .push(format!("Field 'tools[{index}]' must be a string"));
                }
            }
        }
        Some(_) => report
            .errors
            .push("Field 'tools' must be an array".to_string()),
    }

    match map.get("settings") {
        None | Some(Value::Null) => report
            .errors
            .push("Missing required field: settings".to_string()),
        Some(Value::Object(_)) => {}
        Some(_) => report
            .errors
            .push("Field 'settings' must be an object".to_string()),
    }

    for key in map.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            report.warnings.push(format!("Unknown field: {key}"));
        }
    }

    if let Some(record) = ConfigRecord::from_value(document.clone()) {
        let record_report = validate(&record);
        for error in record_report.errors {
            if !report.errors.contains(&error) {
                report.errors.push(error);
            }
        }
        report.warnings.extend(record_report.warnings);
    }

    report.finish()
}

/// One memoized discovery result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub loaded: LoadedConfig,
    pub captured_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) < timeout
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(PathBuf),
    Declined(PathBuf),
}

pub struct ConfigStore {
    roots: Vec<PathBuf>,
    override_path: Option<PathBuf>,
    auto_search: bool,
    cache_timeout: Duration,
    cache: HashMap<PathBuf, CacheEntry>,
}

impl ConfigStore {
    pub fn new(roots: Vec<PathBuf>, settings: &Settings) -> Self {
        Self {
            override_path: settings.resolved_config_path(&roots),
            auto_search: settings.auto_search,
            cache_timeout: settings.cache_timeout(),
            roots,
            cache: HashMap::new(),
        }
    }

    /// Swap in new settings. The cache is dropped since the override path
    /// or search behaviour may have changed.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.override_path = settings.resolved_config_path(&self.roots);
        self.auto_search = settings.auto_search;
        self.cache_timeout = settings.cache_timeout();
        self.clear_cache();
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn cache_timeout(&self) -> Duration {
        self.cache_timeout
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Resolve the active configuration. Only successful discoveries are
    /// cached, so roots without a config file are probed again on every load
    /// before a cached later root is served. A file created there shows up
    /// at once.
    pub fn load(&mut self) -> Option<LoadedConfig> {
        self.load_at(Instant::now())
    }

    pub(crate) fn load_at(&mut self, now: Instant) -> Option<LoadedConfig> {
        if let Some(path) = &self.override_path {
            match read_config_file(path) {
                Ok(record) => {
                    log::debug!("Loaded configuration from override {}", path.display());
                    return Some(LoadedConfig {
                        record,
                        source: path.clone(),
                    });
                }
                Err(e) => log::warn!("Configured config path unusable: {e}"),
            }
        }

        if !self.auto_search {
            return None;
        }

        for root in &self.roots {
            if let Some(entry) = self.cache.get(root) {
                if entry.is_fresh(now, self.cache_timeout) {
                    log::debug!("Using cached configuration for {}", root.display());
                    return Some(entry.loaded.clone());
                }
            }

            match discover_in(root) {
                Some(loaded) => {
                    self.cache.insert(
                        root.clone(),
                        CacheEntry {
                            loaded: loaded.clone(),
                            captured_at: now,
                        },
                    );
                    return Some(loaded);
                }
                None => {
                    self.cache.remove(root);
                }
            }
        }

        None
    }

    /// Drop every cache entry, unconditionally.
    pub fn clear_cache(&mut self) {
        if !self.cache.is_empty() {
            log::debug!("Clearing {} cached configuration(s)", self.cache.len());
        }
        self.cache.clear();
    }

    /// Write [`ConfigRecord::default_template`] as YAML to the first workspace
    /// root. An existing file is only replaced when `confirm_overwrite` agrees.
    pub fn create_default(
        &mut self,
        confirm_overwrite: impl FnOnce(&Path) -> bool,
    ) -> Result<CreateOutcome> {
        let root = self.roots.first().ok_or(DenError::NoWorkspace)?;
        let path = root.join(DEFAULT_CONFIG_FILE);

        if path.exists() && !confirm_overwrite(&path) {
            log::debug!("Overwrite of {} declined", path.display());
            return Ok(CreateOutcome::Declined(path));
        }

        let content = serde_yaml::to_string(&ConfigRecord::default_template())?;
        std::fs::write(&path, content).map_err(|e| DenError::write_failed(&path, e))?;
        self.clear_cache();
        log::info!("Created default configuration at {}", path.display());
        Ok(CreateOutcome::Created(path))
    }

    /// Whether a filesystem event on `path` concerns the configuration.
    pub fn is_config_file(&self, path: &Path) -> bool {
        if self.override_path.as_deref() == Some(path) {
            return true;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        CONFIG_FILE_NAMES.contains(&name)
            && path
                .parent()
                .is_some_and(|parent| self.roots.iter().any(|root| root == parent))
    }

    /// Existing files `load` would consider, in resolution order, whether or
    /// not they decode.
    pub fn existing_candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self
            .override_path
            .iter()
            .filter(|path| path.is_file())
            .cloned()
            .collect();
        if self.auto_search {
            for root in &self.roots {
                candidates.extend(
                    CONFIG_FILE_NAMES
                        .iter()
                        .map(|name| root.join(name))
                        .filter(|path| path.is_file()),
                );
            }
        }
        candidates
    }

    /// Directories a file watcher needs to observe.
    pub fn watch_directories(&self) -> Vec<PathBuf> {
        let mut dirs = self.roots.clone();
        if let Some(parent) = self.override_path.as_deref().and_then(Path::parent) {
            if !dirs.iter().any(|d| d == parent) {
                dirs.push(parent.to_path_buf());
            }
        }
        dirs
    }
}

fn discover_in(root: &Path) -> Option<LoadedConfig> {
    for name in CONFIG_FILE_NAMES {
        let candidate = root.join(name);
        if !candidate.is_file() {
            continue;
        }
        match read_config_file(&candidate) {
            Ok(record) => {
                log::debug!("Discovered configuration at {}", candidate.display());
                return Some(LoadedConfig {
                    record,
                    source: candidate,
                });
            }
            Err(e) => log::warn!("Skipping config candidate: {e}"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_for(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(vec![dir.path().to_path_buf()], &Settings::default())
    }

    #[test]
    fn test_missing_tools_and_settings_default_to_empty() {
        let record = ConfigRecord::from_value(json!({ "name": "Foo" })).unwrap();
        assert_eq!(record.name, "Foo");
        assert_eq!(record.version, DEFAULT_VERSION);
        assert_eq!(record.environment, DEFAULT_ENVIRONMENT);
        assert!(record.tools.is_empty());
        assert!(record.settings.is_empty());
    }

    #[test]
    fn test_wrong_typed_fields_are_coerced() {
        let record = ConfigRecord::from_value(json!({
            "name": ["not", "a", "string"],
            "version": 2.5,
            "tools": "git",
            "settings": [1, 2],
        }))
        .unwrap();
        assert_eq!(record.name, DEFAULT_NAME);
        assert_eq!(record.version, "2.5");
        assert!(record.tools.is_empty());
        assert!(record.settings.is_empty());
    }

    #[test]
    fn test_non_object_document_yields_none() {
        assert!(ConfigRecord::from_value(json!(["a", "b"])).is_none());
        assert!(ConfigRecord::from_value(json!("text")).is_none());
        assert!(ConfigRecord::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_non_string_tools_are_dropped() {
        let record = ConfigRecord::from_value(json!({ "tools": ["git", 3, "node"] })).unwrap();
        assert_eq!(record.tools, vec!["git", "node"]);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("den.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new(".den.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("den.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("den.conf")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_yaml_takes_priority_over_json() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("den.yml"), "name: From YAML\n")?;
        std::fs::write(dir.path().join("den.json"), r#"{"name": "From JSON"}"#)?;

        let loaded = store_for(&dir).load().unwrap();
        assert_eq!(loaded.record.name, "From YAML");
        assert_eq!(loaded.source, dir.path().join("den.yml"));
        Ok(())
    }

    #[test]
    fn test_broken_candidate_falls_through_to_next() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("den.yml"), "name: [unclosed\n")?;
        std::fs::write(dir.path().join("den.yaml"), "- just\n- a list\n")?;
        std::fs::write(dir.path().join(".den.json"), r#"{"name": "Hidden"}"#)?;

        let loaded = store_for(&dir).load().unwrap();
        assert_eq!(loaded.record.name, "Hidden");
        Ok(())
    }

    #[test]
    fn test_no_config_anywhere_is_none() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut store = store_for(&dir);
        assert!(store.load().is_none());
        assert_eq!(store.cached_entries(), 0);
        Ok(())
    }

    #[test]
    fn test_second_root_is_searched() -> anyhow::Result<()> {
        let first = TempDir::new()?;
        let second = TempDir::new()?;
        std::fs::write(second.path().join("den.json"), r#"{"name": "Second"}"#)?;

        let mut store = ConfigStore::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            &Settings::default(),
        );
        assert_eq!(store.load().unwrap().record.name, "Second");
        Ok(())
    }

    #[test]
    fn test_empty_root_is_probed_again_before_cached_root() -> anyhow::Result<()> {
        let first = TempDir::new()?;
        let second = TempDir::new()?;
        std::fs::write(second.path().join("den.yml"), "name: Second\n")?;

        let mut store = ConfigStore::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            &Settings::default(),
        );
        let start = Instant::now();
        assert_eq!(store.load_at(start).unwrap().record.name, "Second");
        assert_eq!(store.cached_entries(), 1);

        std::fs::write(first.path().join("den.yml"), "name: First\n")?;
        let loaded = store.load_at(start + Duration::from_secs(1)).unwrap();
        assert_eq!(loaded.record.name, "First");
        assert_eq!(store.cached_entries(), 2);
        Ok(())
    }

    #[test]
    fn test_cached_record_is_served_within_timeout() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("den.yml");
        std::fs::write(&path, "name: First\n")?;

        let mut store = store_for(&dir);
        let start = Instant::now();
        let first = store.load_at(start).unwrap();

        // A change on disk is invisible until the entry expires
        std::fs::write(&path, "name: Second\n")?;
        let cached = store.load_at(start + Duration::from_secs(29)).unwrap();
        assert_eq!(cached, first);

        let reread = store.load_at(start + Duration::from_secs(31)).unwrap();
        assert_eq!(reread.record.name, "Second");
        Ok(())
    }

    #[test]
    fn test_clear_cache_forces_reread() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("den.yml");
        std::fs::write(&path, "name: First\n")?;

        let mut store = store_for(&dir);
        let start = Instant::now();
        store.load_at(start).unwrap();
        assert_eq!(store.cached_entries(), 1);

        std::fs::write(&path, "name: Second\n")?;
        store.clear_cache();
        assert_eq!(store.cached_entries(), 0);
        let loaded = store.load_at(start + Duration::from_secs(1)).unwrap();
        assert_eq!(loaded.record.name, "Second");
        Ok(())
    }

    #[test]
    fn test_expired_entry_is_dropped_when_file_disappears() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("den.yml");
        std::fs::write(&path, "name: Gone soon\n")?;

        let mut store = store_for(&dir);
        let start = Instant::now();
        store.load_at(start).unwrap();
        std::fs::remove_file(&path)?;

        assert!(store.load_at(start + Duration::from_secs(60)).is_none());
        assert_eq!(store.cached_entries(), 0);
        Ok(())
    }

    #[test]
    fn test_override_path_wins_over_discovery() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("den.yml"), "name: Discovered\n")?;
        std::fs::create_dir(dir.path().join("envs"))?;
        std::fs::write(dir.path().join("envs/ci.json"), r#"{"name": "Override"}"#)?;

        let mut settings = Settings::default();
        settings.config_path = Some(PathBuf::from("envs/ci.json"));
        let mut store = ConfigStore::new(vec![dir.path().to_path_buf()], &settings);
        assert_eq!(store.load().unwrap().record.name, "Override");
        Ok(())
    }

    #[test]
    fn test_unreadable_override_falls_back_to_discovery() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("den.yml"), "name: Discovered\n")?;

        let mut settings = Settings::default();
        settings.config_path = Some(dir.path().join("missing.yml"));
        let mut store = ConfigStore::new(vec![dir.path().to_path_buf()], &settings);
        assert_eq!(store.load().unwrap().record.name, "Discovered");
        Ok(())
    }

    #[test]
    fn test_auto_search_disabled_skips_discovery() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("den.yml"), "name: Discovered\n")?;

        let mut settings = Settings::default();
        settings.auto_search = false;
        let mut store = ConfigStore::new(vec![dir.path().to_path_buf()], &settings);
        assert!(store.load().is_none());
        Ok(())
    }

    #[test]
    fn test_create_default_writes_yaml_and_clears_cache() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut store = store_for(&dir);

        let outcome = store.create_default(|_| unreachable!("no existing file"))?;
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        assert_eq!(outcome, CreateOutcome::Created(path.clone()));

        let loaded = store.load().unwrap();
        assert_eq!(loaded.record, ConfigRecord::default_template());
        assert_eq!(store.cached_entries(), 1);

        let outcome = store.create_default(|_| true)?;
        assert_eq!(outcome, CreateOutcome::Created(path));
        assert_eq!(store.cached_entries(), 0);
        Ok(())
    }

    #[test]
    fn test_create_default_declined_keeps_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "name: Mine\n")?;

        let mut store = store_for(&dir);
        let outcome = store.create_default(|_| false)?;
        assert_eq!(outcome, CreateOutcome::Declined(path.clone()));
        assert_eq!(std::fs::read_to_string(&path)?, "name: Mine\n");
        Ok(())
    }

    #[test]
    fn test_create_default_without_workspace() {
        let mut store = ConfigStore::new(Vec::new(), &Settings::default());
        assert!(matches!(
            store.create_default(|_| true),
            Err(DenError::NoWorkspace)
        ));
    }

    #[test]
    fn test_is_config_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = store_for(&dir);
        assert!(store.is_config_file(&dir.path().join("den.yml")));
        assert!(store.is_config_file(&dir.path().join(".den.json")));
        assert!(!store.is_config_file(&dir.path().join("Cargo.toml")));
        assert!(!store.is_config_file(&dir.path().join("nested").join("den.yml")));
        Ok(())
    }

    #[test]
    fn test_existing_candidates_include_broken_files() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("den.yml"), ": : :")?;
        std::fs::write(dir.path().join(".den.json"), "{}")?;
        let store = store_for(&dir);
        assert_eq!(
            store.existing_candidates(),
            vec![dir.path().join("den.yml"), dir.path().join(".den.json")]
        );
        Ok(())
    }

    #[test]
    fn test_validate_default_template_is_clean() {
        let report = validate(&ConfigRecord::default_template());
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_validate_warns_on_empty_tools_and_loose_version() {
        let record = ConfigRecord::from_value(json!({ "version": "1.0" })).unwrap();
        let report = validate(&record);
        assert!(report.is_valid);
        assert!(report.warnings.contains(&"No tools specified".to_string()));
        assert!(report.warnings.iter().any(|w| w.contains("not a semantic version")));
    }

    #[test]
    fn test_validate_flags_blank_fields() {
        let mut record = ConfigRecord::default_template();
        record.name = "  ".to_string();
        let report = validate(&record);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Missing required field: name"]);
    }

    #[test]
    fn test_validate_document_requires_every_field() {
        let report = validate_document(&json!({ "name": "Foo" }));
        assert!(!report.is_valid);
        assert!(report.errors.contains(&"Missing required field: version".to_string()));
        assert!(report.errors.contains(&"Missing required field: environment".to_string()));
        assert!(report.errors.contains(&"Missing required field: tools".to_string()));
        assert!(report.errors.contains(&"Missing required field: settings".to_string()));
        assert!(report.warnings.contains(&"No tools specified".to_string()));
    }

    #[test]
    fn test_validate_document_flags_wrong_types() {
        let report = validate_document(&json!({
            "name": "Foo",
            "version": 1,
            "environment": "dev",
            "tools": ["git", 7],
            "settings": "none",
            "extra": true,
        }));
        assert!(!report.is_valid);
        assert!(report.errors.contains(&"Field 'version' must be a string".to_string()));
        assert!(report.errors.contains(&"Field 'tools[1]' must be a string".to_string()));
        assert!(report.errors.contains(&"Field 'settings' must be an object".to_string()));
        assert!(report.warnings.contains(&"Unknown field: extra".to_string()));
    }

    #[test]
    fn test_validate_document_rejects_non_object() {
        let report = validate_document(&json!([1, 2, 3]));
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Configuration must be an object"]);
    }
}
