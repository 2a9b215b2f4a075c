//! Monitoring collaborator: the [`Monitoring`] trait the tracker calls, and the
//! [`MonitoringClient`] that implements it.

pub mod actions;
mod client;
mod sink;
mod types;

use std::sync::Arc;

pub use client::MonitoringClient;
pub use sink::{read_outbox, EventSink, OutboxSink};
pub use types::{
    CapturedEvent, Environment, MonitoringConfig, MonitoringError, Properties, DEFAULT_API_HOST,
    EXCEPTION_EVENT, IDENTIFY_EVENT, PAGEVIEW_EVENT, PERFORMANCE_EVENT,
};

/// Capabilities a monitoring backend offers to the navigation tracker.
///
/// Implementations must not block: the tracker calls these on the navigation
/// path. Delivery guarantees are the implementation's business.
pub trait Monitoring {
    /// One-time setup. The tracker calls this at most once per state lifetime.
    fn init_monitoring(&self) -> Result<(), MonitoringError>;

    /// Records one page view for `location`.
    fn track_page_view(&self, location: &str) -> Result<(), MonitoringError>;

    /// Records a named event.
    fn track_event(
        &self,
        name: &str,
        properties: Option<Properties>,
    ) -> Result<(), MonitoringError>;
}

impl<M: Monitoring + ?Sized> Monitoring for &M {
    fn init_monitoring(&self) -> Result<(), MonitoringError> {
        (**self).init_monitoring()
    }

    fn track_page_view(&self, location: &str) -> Result<(), MonitoringError> {
        (**self).track_page_view(location)
    }

    fn track_event(
        &self,
        name: &str,
        properties: Option<Properties>,
    ) -> Result<(), MonitoringError> {
        (**self).track_event(name, properties)
    }
}

impl<M: Monitoring + ?Sized> Monitoring for Arc<M> {
    fn init_monitoring(&self) -> Result<(), MonitoringError> {
        (**self).init_monitoring()
    }

    fn track_page_view(&self, location: &str) -> Result<(), MonitoringError> {
        (**self).track_page_view(location)
    }

    fn track_event(
        &self,
        name: &str,
        properties: Option<Properties>,
    ) -> Result<(), MonitoringError> {
        (**self).track_event(name, properties)
    }
}
