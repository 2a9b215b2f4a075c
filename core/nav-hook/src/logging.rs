//! Structured logging for nav-hook using tracing.
//!
//! Logs to `~/.navtrack/logs/nav-hook.{date}.log` with daily rotation, keeping
//! 7 files. `RUST_LOG` overrides the default filter.
//!
//! Falls back to stderr logging if the file appender cannot be created.

use fs_err as fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "nav_hook=debug,nav_core=info";

/// Installs the global subscriber. Hold the returned guard until exit: dropping
/// it flushes buffered lines to the log file.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match file_writer(logs_dir) {
        Some((non_blocking, guard)) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_ansi(true),
                )
                .init();
            None
        }
    }
}

fn file_writer(logs_dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    let _ = fs::create_dir_all(logs_dir);
    let appender = create_file_appender(logs_dir).ok()?;
    Some(tracing_appender::non_blocking(appender))
}

fn create_file_appender(
    logs_dir: &Path,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("nav-hook")
        .filename_suffix("log")
        .max_log_files(7)
        .build(logs_dir)
}
