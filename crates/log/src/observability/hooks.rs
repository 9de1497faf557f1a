//! A process-wide registry of observability hooks, so callers can bridge
//! logging events into metrics or alerting without this crate depending on
//! either.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// A loggable lifecycle event, emitted by [`super::events::OperationTracker`]
/// and friends.
pub trait ObservabilityEvent: Send + Sync {
    /// Event name, used as the span/log target.
    fn name(&self) -> &str;

    /// Structured event payload, if any.
    fn data(&self) -> Option<Value> {
        None
    }
}

/// Receives every event emitted via [`emit_event`].
pub trait ObservabilityHook: Send + Sync {
    /// Called for each emitted event.
    fn on_event(&self, event: &dyn ObservabilityEvent);
}

static HOOKS: RwLock<Vec<Arc<dyn ObservabilityHook>>> = RwLock::new(Vec::new());

/// Registers a hook to receive every future [`emit_event`] call.
pub fn register_hook(hook: Arc<dyn ObservabilityHook>) {
    HOOKS.write().push(hook);
}

/// Drops every registered hook. Mainly useful to reset state between tests
/// or at the end of a short-lived process.
pub fn shutdown_hooks() {
    HOOKS.write().clear();
}

/// Emits `event` to every registered hook, and records it as a `tracing`
/// event at debug level.
pub fn emit_event(event: &dyn ObservabilityEvent) {
    tracing::debug!(target: "nebula_log::observability", event = event.name(), data = ?event.data());

    for hook in HOOKS.read().iter() {
        hook.on_event(event);
    }
}

/// Forwards every emitted event into a `tracing` event at a fixed level.
pub struct LoggingHook {
    level: tracing::Level,
}

impl LoggingHook {
    /// Creates a hook that logs every event at `level`.
    #[must_use]
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl ObservabilityHook for LoggingHook {
    fn on_event(&self, event: &dyn ObservabilityEvent) {
        let data = event.data();
        match self.level {
            tracing::Level::ERROR => tracing::error!(event = event.name(), ?data),
            tracing::Level::WARN => tracing::warn!(event = event.name(), ?data),
            tracing::Level::INFO => tracing::info!(event = event.name(), ?data),
            tracing::Level::DEBUG => tracing::debug!(event = event.name(), ?data),
            tracing::Level::TRACE => tracing::trace!(event = event.name(), ?data),
        }
    }
}
