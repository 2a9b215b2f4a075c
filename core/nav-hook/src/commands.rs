//! One-shot capture commands and config management.

use std::io::Write;

use nav_core::config::save_monitoring_config_with_storage;
use nav_core::{Monitoring, MonitoringClient, MonitoringConfig, Properties, StorageConfig};

use crate::error::HookError;

/// Parses an optional JSON object argument.
pub fn parse_properties(
    arg: &'static str,
    raw: Option<&str>,
) -> Result<Option<Properties>, HookError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(HookError::NotAnObject { arg }),
        Err(source) => Err(HookError::InvalidJson { arg, source }),
    }
}

pub fn event(
    client: &MonitoringClient,
    name: &str,
    props: Option<&str>,
    user: Option<&str>,
) -> Result<(), HookError> {
    let properties = parse_properties("--props", props)?;
    client.init_monitoring()?;
    if let Some(user) = user {
        client.identify_user(user, None)?;
    }
    client.track_event(name, properties)?;
    tracing::debug!(event = %name, user = ?user, "Event queued");
    Ok(())
}

pub fn identify(
    client: &MonitoringClient,
    user_id: &str,
    traits: Option<&str>,
) -> Result<(), HookError> {
    let traits = parse_properties("--traits", traits)?;
    client.init_monitoring()?;
    client.identify_user(user_id, traits)?;
    Ok(())
}

pub fn perf(
    client: &MonitoringClient,
    metric: &str,
    value: f64,
    unit: Option<&str>,
) -> Result<(), HookError> {
    client.init_monitoring()?;
    client.track_performance(metric, value, unit)?;
    Ok(())
}

pub fn config_show(config: &MonitoringConfig, mut output: impl Write) -> Result<(), HookError> {
    serde_json::to_writer_pretty(&mut output, config)?;
    writeln!(output)?;
    Ok(())
}

/// Writes a default config file unless one already exists. Returns whether a
/// file was written.
pub fn config_init(storage: &StorageConfig, mut output: impl Write) -> Result<bool, HookError> {
    let path = storage.config_file();
    if path.exists() {
        writeln!(output, "Config already exists at {}", path.display())?;
        return Ok(false);
    }

    save_monitoring_config_with_storage(storage, &MonitoringConfig::default())?;
    tracing::info!(path = %path.display(), "Wrote default monitoring config");
    writeln!(output, "Wrote {}", path.display())?;
    Ok(true)
}
