//! Core library for navtrack.
//!
//! Two halves:
//! - [`tracker`]: the navigation gate. Initializes monitoring once and emits one
//!   page view per distinct navigation.
//! - [`monitoring`]: the analytics client the gate talks to, plus the rest of the
//!   event surface (custom events, identify/reset, performance, errors).
//!
//! Hosts own a [`TrackerState`] and lend it to a [`NavigationTracker`]:
//!
//! ```no_run
//! use nav_core::{MonitoringClient, NavigationObserver, NavigationTracker, TrackerState};
//! use nav_core::config::load_monitoring_config;
//!
//! let client = MonitoringClient::new(load_monitoring_config());
//! let mut state = TrackerState::new();
//! let mut tracker = NavigationTracker::new(&mut state, &client);
//!
//! tracker.on_mount();
//! tracker.on_location_change(Some("/dashboard"));
//! ```

pub mod config;
pub mod monitoring;
pub mod storage;
pub mod tracker;

pub use monitoring::{
    actions, CapturedEvent, Environment, EventSink, Monitoring, MonitoringClient,
    MonitoringConfig, MonitoringError, OutboxSink, Properties,
};
pub use storage::StorageConfig;
pub use tracker::{LocationOutcome, NavigationObserver, NavigationTracker, TrackerState};
