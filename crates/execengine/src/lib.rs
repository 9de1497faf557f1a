#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Execution engine: the queue-consuming worker loop that drives a single
//! workflow execution from dequeue through DAG traversal to settlement.
//!
//! Builds on the block-handler registry, the execution state machine, and
//! the persistence ports to implement lock acquisition, circuit-breaker
//! guarding, fan-out-capped concurrent node dispatch, and per-node retry.

pub mod breaker;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod lock;
pub mod node;
pub mod retry;

pub use config::EngineConfig;
pub use engine::ExecutionEngine;
pub use error::WorkerError;
pub use events::{ExecutionEvent, ExecutionEvents};
pub use retry::NodeRetryPolicy;
