//! Storage root for navtrack files.
//!
//! Everything lives under `~/.navtrack/` by default:
//! - `monitoring.json`: persisted [`MonitoringConfig`](crate::MonitoringConfig)
//! - `outbox.jsonl`: captured events appended by [`OutboxSink`](crate::OutboxSink)
//! - `logs/`: rolling log files written by the CLI host

use std::path::{Path, PathBuf};

const ROOT_DIR: &str = ".navtrack";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    root: PathBuf,
}

impl StorageConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("monitoring.json")
    }

    pub fn outbox_file(&self) -> PathBuf {
        self.root.join("outbox.jsonl")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

impl Default for StorageConfig {
    /// `~/.navtrack`, or `./.navtrack` when no home directory is available.
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|h| h.join(ROOT_DIR))
            .unwrap_or_else(|| PathBuf::from(ROOT_DIR));
        Self { root }
    }
}
