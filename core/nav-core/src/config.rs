//! Configuration loading and saving for the monitoring client.
//!
//! The effective config is the persisted file (`~/.navtrack/monitoring.json`)
//! with environment variables layered on top:
//!
//! | Variable                  | Field          |
//! |---------------------------|----------------|
//! | `NAVTRACK_ANALYTICS_KEY`  | `api_key`      |
//! | `NAVTRACK_ANALYTICS_HOST` | `api_host`     |
//! | `NAVTRACK_ERROR_DSN`      | `error_dsn`    |
//! | `NAVTRACK_ENV`            | `environment`  |
//!
//! Reads are best-effort; a missing or malformed file yields defaults so that a
//! broken config never takes navigation down with it.

use std::io::Write;
use std::path::PathBuf;

use fs_err as fs;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::monitoring::{Environment, MonitoringConfig};
use crate::storage::StorageConfig;

pub const ENV_ANALYTICS_KEY: &str = "NAVTRACK_ANALYTICS_KEY";
pub const ENV_ANALYTICS_HOST: &str = "NAVTRACK_ANALYTICS_HOST";
pub const ENV_ERROR_DSN: &str = "NAVTRACK_ERROR_DSN";
pub const ENV_ENVIRONMENT: &str = "NAVTRACK_ENV";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file has no parent directory: {0}")]
    NoParentDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist temp file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Loads the effective monitoring config from the default storage root.
pub fn load_monitoring_config() -> MonitoringConfig {
    load_monitoring_config_with_storage(&StorageConfig::default())
}

/// Loads the persisted config for `storage` and applies environment overrides.
pub fn load_monitoring_config_with_storage(storage: &StorageConfig) -> MonitoringConfig {
    let file_config = load_persisted_config(storage);
    apply_overrides(file_config, |name| std::env::var(name).ok())
}

/// Reads only the persisted file, without environment overrides.
pub fn load_persisted_config(storage: &StorageConfig) -> MonitoringConfig {
    let path = storage.config_file();
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return MonitoringConfig::default(),
    };

    if content.trim().is_empty() {
        return MonitoringConfig::default();
    }

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to parse monitoring config, using defaults"
            );
            MonitoringConfig::default()
        }
    }
}

/// Layers variables from `lookup` over `config`. Blank values are ignored.
///
/// `lookup` is usually `std::env::var`; tests pass a map instead.
pub fn apply_overrides<F>(mut config: MonitoringConfig, lookup: F) -> MonitoringConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(ENV_ANALYTICS_KEY) {
        config.api_key = Some(key);
    }
    if let Some(host) = get(ENV_ANALYTICS_HOST) {
        config.api_host = host;
    }
    if let Some(dsn) = get(ENV_ERROR_DSN) {
        config.error_dsn = Some(dsn);
    }
    if let Some(env) = get(ENV_ENVIRONMENT) {
        match env.parse::<Environment>() {
            Ok(environment) => config.environment = environment,
            Err(_) => tracing::warn!(
                value = %env,
                "Unknown {}, keeping {:?}",
                ENV_ENVIRONMENT,
                config.environment
            ),
        }
    }

    config
}

/// Saves the config atomically (temp file + rename).
pub fn save_monitoring_config_with_storage(
    storage: &StorageConfig,
    config: &MonitoringConfig,
) -> Result<(), ConfigError> {
    let path = storage.config_file();
    let parent = path
        .parent()
        .ok_or_else(|| ConfigError::NoParentDir(path.clone()))?;
    fs::create_dir_all(parent)?;

    let content = serde_json::to_string_pretty(config)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(&path)?;

    Ok(())
}
