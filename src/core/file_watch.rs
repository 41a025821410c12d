//! Config file change detection with per-class debouncing.
//!
//! Editors tend to write a file several times in quick succession (truncate,
//! write, rename into place). [`Debouncer`] collapses a burst of events of
//! one class into a single downstream event: every new event replaces the
//! class's pending timer, and only a timer that survives [`DEBOUNCE`] fires.

use crate::core::error::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

pub const DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigEventKind {
    Created,
    Changed,
    Deleted,
}

impl ConfigEventKind {
    pub fn from_event(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ConfigEventKind::Created),
            EventKind::Modify(_) => Some(ConfigEventKind::Changed),
            EventKind::Remove(_) => Some(ConfigEventKind::Deleted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigEventKind::Created => "created",
            ConfigEventKind::Changed => "changed",
            ConfigEventKind::Deleted => "deleted",
        }
    }
}

/// One pending timer per key; must be used within a tokio runtime.
pub struct Debouncer<K> {
    delay: Duration,
    pending: HashMap<K, JoinHandle<()>>,
    out: UnboundedSender<K>,
}

impl<K> Debouncer<K>
where
    K: Copy + Eq + Hash + Send + 'static,
{
    pub fn new(delay: Duration, out: UnboundedSender<K>) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
            out,
        }
    }

    pub fn trigger(&mut self, key: K) {
        if let Some(previous) = self.pending.remove(&key) {
            previous.abort();
        }

        let out = self.out.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = out.send(key);
        });
        self.pending.insert(key, handle);
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

/// Watches directories for changes to configuration files and emits one
/// debounced [`ConfigEventKind`] per burst.
pub struct ConfigFileWatcher {
    _watcher: RecommendedWatcher,
    forward: JoinHandle<()>,
}

impl ConfigFileWatcher {
    pub fn start<F>(
        directories: &[PathBuf],
        is_relevant: F,
        out: UnboundedSender<ConfigEventKind>,
    ) -> Result<Self>
    where
        F: Fn(&Path) -> bool + Send + 'static,
    {
        let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<Event>();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = raw_tx.send(event);
            }
            Err(e) => log::warn!("Config file watcher error: {e}"),
        })?;

        for dir in directories {
            if !dir.is_dir() {
                log::debug!("Not watching missing directory {}", dir.display());
                continue;
            }
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            log::debug!("Watching {} for config changes", dir.display());
        }

        let forward = tokio::spawn(async move {
            let mut debouncer = Debouncer::new(DEBOUNCE, out);
            while let Some(event) = raw_rx.recv().await {
                let Some(kind) = ConfigEventKind::from_event(&event.kind) else {
                    continue;
                };
                if event.paths.iter().any(|p| is_relevant(p.as_path())) {
                    debouncer.trigger(kind);
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            forward,
        })
    }
}

impl Drop for ConfigFileWatcher {
    fn drop(&mut self) {
        self.forward.abort();
    }
}
