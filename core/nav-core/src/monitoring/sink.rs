//! Delivery targets for captured events.
//!
//! The delivery worker owns exactly one sink and calls it serially, so
//! implementations need `Send` but not `Sync`.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use fs_err::{self as fs, OpenOptions};

use super::types::{CapturedEvent, MonitoringError};

pub trait EventSink: Send {
    fn deliver(&mut self, event: &CapturedEvent) -> Result<(), MonitoringError>;

    /// Called after a flush request has drained the queue.
    fn flush(&mut self) -> Result<(), MonitoringError> {
        Ok(())
    }
}

/// Appends events as JSON lines to a local file.
pub struct OutboxSink {
    path: PathBuf,
}

impl OutboxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSink for OutboxSink {
    fn deliver(&mut self, event: &CapturedEvent) -> Result<(), MonitoringError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let line = serde_json::to_string(event)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// Reads every event from an outbox file. Malformed lines are skipped.
pub fn read_outbox(path: &Path) -> Result<Vec<CapturedEvent>, MonitoringError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(fs::File::open(path)?);
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CapturedEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(line = index + 1, error = %e, "Skipping malformed outbox line"),
        }
    }
    Ok(events)
}
