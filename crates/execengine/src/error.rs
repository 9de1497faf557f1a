//! The converging error type for the execution engine.
//!
//! Every crate the engine talks to defines its own `thiserror` enum
//! ([`nebula_blocks::BlockError`], [`nebula_execution::ExecutionError`],
//! [`nebula_ports::error::PortsError`], [`nebula_workflow::WorkflowGraphError`]).
//! [`WorkerError`] is where those converge, carrying a `transient`
//! classification forward so the retry and circuit-breaker logic can be
//! written against one type.

use thiserror::Error;

use nebula_execution::ExecutionError;
use nebula_ports::error::PortsError;
use nebula_workflow::WorkflowGraphError;

/// Errors raised while the engine drives a single execution.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Another worker already holds the execution's lock.
    #[error("execution already locked by another worker")]
    AlreadyLocked,

    /// The circuit for this workflow or for the worker itself is open.
    #[error("circuit open, retry after {retry_after_secs}s")]
    CircuitOpen {
        /// Seconds until the breaker's `next_attempt_at`.
        retry_after_secs: i64,
    },

    /// A block handler failed.
    #[error("block error: {0}")]
    Block(#[from] nebula_blocks::BlockError),

    /// The execution's own state machine rejected a transition, or its plan
    /// could not be built.
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// The workflow's dependency graph is invalid.
    #[error("graph error: {0}")]
    Graph(#[from] WorkflowGraphError),

    /// A persistence port call failed.
    #[error("port error: {0}")]
    Port(#[from] PortsError),

    /// A node ran past its deadline.
    #[error("node {0} deadline exceeded")]
    NodeDeadlineExceeded(nebula_core::NodeId),

    /// Cancellation was requested and has been honoured.
    #[error("execution cancelled")]
    Cancelled,

    /// The final settlement write lost its compare-and-swap race against a
    /// write this worker didn't make, after it had already won the lock.
    #[error("lost execution lock for {0} before settlement could be written")]
    LockLost(nebula_core::ExecutionId),
}

impl WorkerError {
    /// Whether retrying the same operation might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            // Http already ran its own bounded retry loop inside the handler;
            // retrying it again here would re-run that loop on top of itself.
            WorkerError::Block(nebula_blocks::BlockError::Http(_)) => false,
            WorkerError::Block(err) => err.is_transient(),
            WorkerError::Port(err) => err.is_retryable(),
            WorkerError::NodeDeadlineExceeded(_) => true,
            WorkerError::AlreadyLocked
            | WorkerError::CircuitOpen { .. }
            | WorkerError::Execution(_)
            | WorkerError::Graph(_)
            | WorkerError::Cancelled
            | WorkerError::LockLost(_) => false,
        }
    }
}
