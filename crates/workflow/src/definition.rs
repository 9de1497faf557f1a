use std::collections::HashMap;

use chrono::{DateTime, Utc};
use nebula_core::{ActionId, NodeId, Version, WorkflowId};
use serde::{Deserialize, Serialize};

/// 2D canvas position of a node, carried for the visual editor and otherwise
/// ignored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

/// A single vertex in a workflow's DAG.
///
/// `action_id` is the block kind already resolved against the handler
/// registry at load time — the wire document carries a `kind` string tag,
/// but by the time a workflow reaches the engine it has been bound to a
/// concrete, strongly-typed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: NodeId,
    pub name: String,
    pub action_id: ActionId,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<NodePosition>,
}

impl NodeDefinition {
    /// Builds a node with empty config and no canvas position.
    pub fn new(id: NodeId, name: impl Into<String>, action_id: ActionId) -> Self {
        Self {
            id,
            name: name.into(),
            action_id,
            config: serde_json::Value::Null,
            position: None,
        }
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(NodePosition { x, y });
        self
    }
}

/// A directed edge from one node's output to another node's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
}

impl Connection {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

/// Workflow-wide execution settings; applies to every node unless a node
/// overrides it locally in its own config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Node deadline when the node's own config doesn't set one.
    pub default_node_timeout_secs: u64,
    /// Maximum number of nodes the engine may run concurrently within one
    /// execution (the fan-out cap).
    pub max_concurrency: usize,
    /// Default retry attempts for a failed node before it's marked failed.
    pub max_retries: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_node_timeout_secs: 30,
            max_concurrency: 8,
            max_retries: 3,
        }
    }
}

/// A user-authored workflow: the DAG of blocks plus workflow-scoped settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: WorkflowId,
    pub name: String,
    pub description: Option<String>,
    pub version: Version,
    pub nodes: Vec<NodeDefinition>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub variables: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub config: WorkflowConfig,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    /// Looks up a node definition by id.
    pub fn node(&self, id: NodeId) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
