//! Monitoring config, captured events and errors.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

pub const DEFAULT_API_HOST: &str = "https://app.posthog.com";

/// Event name used for page views.
pub const PAGEVIEW_EVENT: &str = "$pageview";
pub const IDENTIFY_EVENT: &str = "$identify";
pub const EXCEPTION_EVENT: &str = "$exception";
pub const PERFORMANCE_EVENT: &str = "performance_metric";

/// Free-form event properties.
pub type Properties = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Settings for [`MonitoringClient`](super::MonitoringClient).
///
/// Analytics is enabled only when `api_key` is set. Error capture additionally
/// needs `error_dsn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub api_key: Option<String>,
    pub api_host: String,
    pub error_dsn: Option<String>,
    pub environment: Environment,
    /// Overrides the outbox location (defaults to `~/.navtrack/outbox.jsonl`).
    pub outbox_path: Option<PathBuf>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_host: DEFAULT_API_HOST.to_string(),
            error_dsn: None,
            environment: Environment::default(),
            outbox_path: None,
        }
    }
}

impl MonitoringConfig {
    pub fn analytics_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn error_capture_enabled(&self) -> bool {
        self.error_dsn.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}

/// One event as handed to an [`EventSink`](super::EventSink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedEvent {
    pub id: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_id: Option<String>,
    #[serde(default)]
    pub properties: Properties,
    pub timestamp: DateTime<Utc>,
    pub api_host: String,
}

impl CapturedEvent {
    pub fn new(
        event: impl Into<String>,
        distinct_id: Option<String>,
        properties: Properties,
        api_host: impl Into<String>,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            event: event.into(),
            distinct_id,
            properties,
            timestamp: Utc::now(),
            api_host: api_host.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Monitoring not initialized")]
    NotInitialized,

    #[error("Delivery worker is not running")]
    WorkerClosed,

    #[error("Failed to start delivery worker: {0}")]
    Spawn(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collaborator failure: {0}")]
    Collaborator(String),
}
