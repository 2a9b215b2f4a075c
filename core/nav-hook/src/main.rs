//! nav-hook: feeds navigation notifications and analytics events into navtrack.
//!
//! ```bash
//! printf '/\n/bills\n/bills\n' | nav-hook replay
//! nav-hook event bill_paid --props '{"amount": 1200}' --user u-42
//! nav-hook identify u-42 --traits '{"plan": "pro"}'
//! nav-hook perf lcp 2100
//! nav-hook config show
//! ```
//!
//! Every command flushes the delivery worker before exiting.

mod commands;
mod error;
mod logging;
mod replay;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nav_core::config::load_monitoring_config_with_storage;
use nav_core::{MonitoringClient, StorageConfig};

use crate::error::HookError;

#[derive(Parser)]
#[command(name = "nav-hook")]
#[command(about = "Deduplicated page-view tracking for navigation streams")]
struct Cli {
    /// Storage root (defaults to ~/.navtrack)
    #[arg(long, global = true)]
    root: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read locations from stdin, one per line, and track page views
    Replay,
    /// Capture a custom event
    Event {
        name: String,
        /// Event properties as a JSON object
        #[arg(long)]
        props: Option<String>,
        /// Identify this user before capturing
        #[arg(long)]
        user: Option<String>,
    },
    /// Attach a user id and traits to the analytics session
    Identify {
        user_id: String,
        /// User traits as a JSON object
        #[arg(long)]
        traits: Option<String>,
    },
    /// Record a performance metric
    Perf {
        metric: String,
        value: f64,
        #[arg(long)]
        unit: Option<String>,
    },
    /// Inspect or create the monitoring config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config (file + environment)
    Show,
    /// Write a default config file if none exists
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let storage = cli
        .root
        .clone()
        .map(StorageConfig::with_root)
        .unwrap_or_default();

    let _guard = logging::init(&storage.logs_dir());

    match run(cli.command, &storage) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "nav-hook failed");
            eprintln!("nav-hook: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, storage: &StorageConfig) -> Result<(), HookError> {
    let mut config = load_monitoring_config_with_storage(storage);
    if config.outbox_path.is_none() {
        config.outbox_path = Some(storage.outbox_file());
    }

    if let Commands::Config { action } = &command {
        return match action {
            ConfigAction::Show => commands::config_show(&config, io::stdout().lock()),
            ConfigAction::Init => commands::config_init(storage, io::stdout().lock()).map(|_| ()),
        };
    }

    let client = MonitoringClient::new(config);
    let result = match command {
        Commands::Replay => {
            replay::run(&client, io::stdin().lock(), io::stdout().lock()).map(|_| ())
        }
        Commands::Event { name, props, user } => {
            commands::event(&client, &name, props.as_deref(), user.as_deref())
        }
        Commands::Identify { user_id, traits } => {
            commands::identify(&client, &user_id, traits.as_deref())
        }
        Commands::Perf {
            metric,
            value,
            unit,
        } => commands::perf(&client, &metric, value, unit.as_deref()),
        Commands::Config { .. } => Ok(()),
    };

    // Deliver whatever was queued even if the command itself failed.
    if let Err(e) = client.flush() {
        tracing::warn!(error = %e, "Failed to flush monitoring client");
    }
    client.shutdown();

    result
}
