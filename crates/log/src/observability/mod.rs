//! Context propagation and lifecycle-event reporting across execution and
//! node boundaries.

pub mod context;
pub mod events;
pub mod hooks;
pub mod resources;
pub mod span;

pub use context::{ExecutionContext, NodeContext};
pub use events::{OperationCompleted, OperationFailed, OperationStarted, OperationTracker};
pub use hooks::{emit_event, register_hook, shutdown_hooks, LoggingHook, ObservabilityEvent, ObservabilityHook};
pub use resources::{LogLevel, LoggerResource, NotificationPrefs, NotificationSeverity};
pub use span::get_current_logger_resource;
