use nav_core::config::ConfigError;
use nav_core::MonitoringError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Invalid JSON for {arg}: {source}")]
    InvalidJson {
        arg: &'static str,
        source: serde_json::Error,
    },

    #[error("{arg} must be a JSON object")]
    NotAnObject { arg: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Monitoring error: {0}")]
    Monitoring(#[from] MonitoringError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
