//! Analytics client with a background delivery worker.
//!
//! Every capture call only builds a [`CapturedEvent`] and pushes it onto a
//! channel; a dedicated thread hands events to the [`EventSink`]. Callers on the
//! navigation path therefore never wait on the sink.
//!
//! ## Degradation
//!
//! - No analytics key and no error DSN: the client is disabled. `init_monitoring`
//!   succeeds without starting anything and every capture is accepted and dropped.
//! - Configured but not yet initialized: captures fail with
//!   [`MonitoringError::NotInitialized`].
//! - After [`MonitoringClient::shutdown`]: captures fail with
//!   [`MonitoringError::WorkerClosed`] and the client cannot be restarted.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use serde_json::Value;

use super::sink::{EventSink, OutboxSink};
use super::types::{
    CapturedEvent, MonitoringConfig, MonitoringError, Properties, EXCEPTION_EVENT,
    IDENTIFY_EVENT, PAGEVIEW_EVENT, PERFORMANCE_EVENT,
};
use super::Monitoring;
use crate::storage::StorageConfig;

const WORKER_THREAD_NAME: &str = "navtrack-delivery";
const DEFAULT_PERFORMANCE_UNIT: &str = "ms";

enum Command {
    Capture(CapturedEvent),
    Flush(Sender<()>),
}

struct Worker {
    sender: Sender<Command>,
    handle: JoinHandle<()>,
}

pub struct MonitoringClient {
    config: MonitoringConfig,
    /// Handed to the worker on first init; `None` afterwards.
    pending_sink: Mutex<Option<Box<dyn EventSink>>>,
    worker: Mutex<Option<Worker>>,
    distinct_id: Mutex<Option<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MonitoringClient {
    /// Creates a client that writes to the configured outbox file.
    pub fn new(config: MonitoringConfig) -> Self {
        let outbox = config
            .outbox_path
            .clone()
            .unwrap_or_else(|| StorageConfig::default().outbox_file());
        Self::with_sink(config, OutboxSink::new(outbox))
    }

    pub fn with_sink(config: MonitoringConfig, sink: impl EventSink + 'static) -> Self {
        Self {
            config,
            pending_sink: Mutex::new(Some(Box::new(sink))),
            worker: Mutex::new(None),
            distinct_id: Mutex::new(None),
        }
    }

    fn delivery_enabled(&self) -> bool {
        self.config.analytics_enabled() || self.config.error_capture_enabled()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.worker).is_some()
    }

    pub fn distinct_id(&self) -> Option<String> {
        lock(&self.distinct_id).clone()
    }

    /// Captures a custom analytics event.
    pub fn track_event(
        &self,
        name: &str,
        properties: Option<Properties>,
    ) -> Result<(), MonitoringError> {
        if self.config.environment.is_development() {
            tracing::info!(event = %name, properties = ?properties, "Event tracked");
        }
        if !self.config.analytics_enabled() {
            return Ok(());
        }
        self.enqueue(name, properties.unwrap_or_default())
    }

    /// Attaches `user_id` to every later event and records the traits.
    pub fn identify_user(
        &self,
        user_id: &str,
        traits: Option<Properties>,
    ) -> Result<(), MonitoringError> {
        if !self.config.analytics_enabled() {
            return Ok(());
        }
        if !self.is_running() {
            return Err(MonitoringError::NotInitialized);
        }
        *lock(&self.distinct_id) = Some(user_id.to_string());
        self.enqueue(IDENTIFY_EVENT, traits.unwrap_or_default())
    }

    /// Forgets the identified user, e.g. on logout.
    pub fn reset_user(&self) {
        if lock(&self.distinct_id).take().is_some() {
            tracing::debug!("Analytics user reset");
        }
    }

    /// Records a timing or size metric. `unit` defaults to `ms`.
    pub fn track_performance(
        &self,
        metric: &str,
        value: f64,
        unit: Option<&str>,
    ) -> Result<(), MonitoringError> {
        if !self.config.analytics_enabled() {
            return Ok(());
        }
        let mut properties = Properties::new();
        properties.insert("metric".to_string(), Value::from(metric));
        properties.insert("value".to_string(), Value::from(value));
        properties.insert(
            "unit".to_string(),
            Value::from(unit.unwrap_or(DEFAULT_PERFORMANCE_UNIT)),
        );
        self.enqueue(PERFORMANCE_EVENT, properties)
    }

    /// Logs `error` and, when error capture is configured, forwards it as an
    /// `$exception` event.
    pub fn capture_error(
        &self,
        error: &dyn std::error::Error,
        context: Option<Properties>,
    ) -> Result<(), MonitoringError> {
        tracing::error!(error = %error, context = ?context, "Error captured");

        if !self.config.error_capture_enabled() {
            return Ok(());
        }
        let mut properties = Properties::new();
        properties.insert("message".to_string(), Value::from(error.to_string()));
        properties.insert(
            "context".to_string(),
            Value::Object(context.unwrap_or_default()),
        );
        self.enqueue(EXCEPTION_EVENT, properties)
    }

    /// Blocks until every event queued so far has been handed to the sink.
    pub fn flush(&self) -> Result<(), MonitoringError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        {
            let worker = lock(&self.worker);
            let Some(worker) = worker.as_ref() else {
                return Ok(());
            };
            worker
                .sender
                .send(Command::Flush(ack_tx))
                .map_err(|_| MonitoringError::WorkerClosed)?;
        }
        ack_rx.recv().map_err(|_| MonitoringError::WorkerClosed)
    }

    /// Drains the queue and stops the worker. Later captures fail.
    pub fn shutdown(&self) {
        let worker = lock(&self.worker).take();
        if let Some(Worker { sender, handle }) = worker {
            drop(sender);
            if handle.join().is_err() {
                tracing::warn!("Delivery worker panicked");
            }
        }
    }

    fn enqueue(&self, name: &str, properties: Properties) -> Result<(), MonitoringError> {
        let worker = lock(&self.worker);
        let worker = worker.as_ref().ok_or_else(|| {
            if lock(&self.pending_sink).is_some() {
                MonitoringError::NotInitialized
            } else {
                MonitoringError::WorkerClosed
            }
        })?;

        let event = CapturedEvent::new(
            name,
            self.distinct_id(),
            properties,
            self.config.api_host.clone(),
        );
        worker
            .sender
            .send(Command::Capture(event))
            .map_err(|_| MonitoringError::WorkerClosed)
    }
}

impl Monitoring for MonitoringClient {
    fn init_monitoring(&self) -> Result<(), MonitoringError> {
        if !self.delivery_enabled() {
            tracing::debug!("No analytics key or error DSN configured, monitoring disabled");
            return Ok(());
        }

        let mut worker = lock(&self.worker);
        if worker.is_some() {
            return Ok(());
        }

        let sink = lock(&self.pending_sink)
            .take()
            .ok_or(MonitoringError::WorkerClosed)?;
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(receiver, sink))
            .map_err(MonitoringError::Spawn)?;

        *worker = Some(Worker { sender, handle });

        tracing::info!(
            api_host = %self.config.api_host,
            environment = %self.config.environment,
            analytics = self.config.analytics_enabled(),
            error_capture = self.config.error_capture_enabled(),
            "Monitoring initialized"
        );
        Ok(())
    }

    fn track_page_view(&self, location: &str) -> Result<(), MonitoringError> {
        if !self.config.analytics_enabled() {
            return Ok(());
        }
        let mut properties = Properties::new();
        properties.insert("path".to_string(), Value::from(location));
        self.enqueue(PAGEVIEW_EVENT, properties)
    }

    fn track_event(
        &self,
        name: &str,
        properties: Option<Properties>,
    ) -> Result<(), MonitoringError> {
        MonitoringClient::track_event(self, name, properties)
    }
}

impl Drop for MonitoringClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(receiver: Receiver<Command>, mut sink: Box<dyn EventSink>) {
    for command in receiver {
        match command {
            Command::Capture(event) => {
                if let Err(e) = sink.deliver(&event) {
                    tracing::warn!(
                        error = %e,
                        event = %event.event,
                        id = %event.id,
                        "Failed to deliver event"
                    );
                }
            }
            Command::Flush(ack) => {
                if let Err(e) = sink.flush() {
                    tracing::warn!(error = %e, "Failed to flush sink");
                }
                let _ = ack.send(());
            }
        }
    }

    if let Err(e) = sink.flush() {
        tracing::warn!(error = %e, "Failed to flush sink on shutdown");
    }
    tracing::debug!("Delivery worker stopped");
}
