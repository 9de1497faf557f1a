use thiserror::Error;

use nebula_ports::security::SecurityViolation;
use nebula_template::TemplateError;

/// Errors raised while resolving or executing a block handler.
#[derive(Debug, Error)]
pub enum BlockError {
    /// The registry has no handler for this kind (case-insensitive).
    #[error("unknown block kind: {0}")]
    UnknownBlockKind(String),

    /// A `{{ }}` expression in the node's config failed to resolve.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The handler's HTTP request failed after exhausting its retry budget.
    #[error("http request failed: {0}")]
    Http(String),

    /// A per-node or per-RPC deadline fired before the handler finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The handler's config failed shape validation.
    #[error("invalid block config: {0}")]
    Validation(String),

    /// The custom-block sandbox rejected or failed the run.
    #[error("sandbox error: {0}")]
    Sandbox(String),

    /// The security validator rejected an AI-agent invocation before any
    /// model call was made. Fatal: aborts the enclosing execution.
    #[error("security violation: {0:?}")]
    SecurityViolation(Vec<SecurityViolation>),

    /// A persistence or other port call failed.
    #[error("port error: {0}")]
    Port(#[from] nebula_ports::error::PortsError),
}

impl BlockError {
    /// Whether retrying the same invocation might succeed.
    ///
    /// Mirrors the `transient` classification carried by `HandlerError` in
    /// the execution engine's shared error type.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BlockError::Http(_) | BlockError::DeadlineExceeded | BlockError::Sandbox(_)
        )
    }
}
