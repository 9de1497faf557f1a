//! Workflow definitions and their dependency graph.
//!
//! A [`WorkflowDefinition`] is the user-authored DAG of blocks: nodes, the
//! connections between them, and the workflow-scoped variables and settings
//! available to every node. [`DependencyGraph`] turns that definition into a
//! validated graph the execution engine can schedule against.

mod definition;
mod error;
mod graph;
mod state;

pub use definition::{Connection, NodeDefinition, WorkflowConfig, WorkflowDefinition};
pub use error::WorkflowGraphError;
pub use graph::DependencyGraph;
pub use state::NodeState;
