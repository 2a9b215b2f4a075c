//! The navigation gate.
//!
//! ## Rules
//!
//! ```text
//! on_mount                    → init_monitoring   (first call only)
//! on_location_change(None|"") → nothing
//! on_location_change(last)    → nothing            (duplicate notification)
//! on_location_change(other)   → track_page_view, last = other
//! ```
//!
//! Collaborator errors are logged and dropped. The state still advances: the
//! gate deduplicates attempts, it does not confirm delivery.

use super::state::TrackerState;
use crate::monitoring::Monitoring;

/// What `on_location_change` decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOutcome {
    /// A page view was handed to the collaborator (whether or not it succeeded).
    Emitted,
    /// Same location as the last emission.
    Duplicate,
    /// Nothing to track.
    Empty,
}

/// Host-facing lifecycle. UI adapters call these from their mount and
/// route-change hooks.
pub trait NavigationObserver {
    fn on_mount(&mut self);

    fn on_location_change(&mut self, current: Option<&str>) -> LocationOutcome;
}

pub struct NavigationTracker<'s, M: Monitoring> {
    state: &'s mut TrackerState,
    monitoring: M,
}

impl<'s, M: Monitoring> NavigationTracker<'s, M> {
    pub fn new(state: &'s mut TrackerState, monitoring: M) -> Self {
        Self { state, monitoring }
    }

    pub fn state(&self) -> &TrackerState {
        &*self.state
    }
}

impl<M: Monitoring> NavigationObserver for NavigationTracker<'_, M> {
    fn on_mount(&mut self) {
        if self.state.is_initialized() {
            tracing::trace!("Monitoring already initialized, skipping");
            return;
        }

        if let Err(e) = self.monitoring.init_monitoring() {
            tracing::warn!(error = %e, "Monitoring initialization failed");
        }
        self.state.mark_initialized();
    }

    fn on_location_change(&mut self, current: Option<&str>) -> LocationOutcome {
        let location = match current {
            Some(l) if !l.is_empty() => l,
            _ => return LocationOutcome::Empty,
        };

        if self.state.is_duplicate(location) {
            tracing::trace!(location = %location, "Duplicate navigation, skipping");
            return LocationOutcome::Duplicate;
        }

        if let Err(e) = self.monitoring.track_page_view(location) {
            tracing::warn!(error = %e, location = %location, "Failed to track page view");
        }
        self.state.record_location(location);

        tracing::debug!(location = %location, "Page view emitted");
        LocationOutcome::Emitted
    }
}
