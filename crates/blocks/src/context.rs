use std::collections::HashMap;

use nebula_core::id::{ExecutionId, NodeId, UserId, WorkflowId};
use nebula_template::{render_value, TemplateContext};

use crate::error::BlockError;

/// Everything a handler needs besides the node's own config.
///
/// Constructed by the execution engine (C8) for each node invocation.
/// Handlers are pure functions of `(node.config, ctx.inputs,
/// ctx.previous_outputs)` apart from their declared side effects.
#[derive(Debug, Clone)]
pub struct BlockContext {
    pub node_id: NodeId,
    pub execution_id: ExecutionId,
    pub workflow_id: WorkflowId,
    pub user_id: UserId,
    /// Inputs merged into the node's own config before templating.
    pub inputs: serde_json::Value,
    /// Outputs of already-completed predecessor nodes, keyed by node id.
    pub previous_outputs: HashMap<NodeId, serde_json::Value>,
    /// Execution-scoped metadata addressable via `{{ctx.<path>}}`.
    pub workflow_data: serde_json::Value,
}

impl BlockContext {
    pub fn new(
        node_id: NodeId,
        execution_id: ExecutionId,
        workflow_id: WorkflowId,
        user_id: UserId,
    ) -> Self {
        Self {
            node_id,
            execution_id,
            workflow_id,
            user_id,
            inputs: serde_json::Value::Object(serde_json::Map::new()),
            previous_outputs: HashMap::new(),
            workflow_data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_inputs(mut self, inputs: serde_json::Value) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_previous_outputs(
        mut self,
        outputs: HashMap<NodeId, serde_json::Value>,
    ) -> Self {
        self.previous_outputs = outputs;
        self
    }

    pub fn with_workflow_data(mut self, data: serde_json::Value) -> Self {
        self.workflow_data = data;
        self
    }

    /// `previousOutputs ∪ executionMeta`, addressed via `{{ctx.<path>}}`.
    fn secondary_context(&self) -> serde_json::Value {
        let mut merged = serde_json::Map::new();
        let mut outputs = serde_json::Map::new();
        for (node_id, output) in &self.previous_outputs {
            outputs.insert(node_id.to_string(), output.clone());
        }
        merged.insert("previousOutputs".into(), serde_json::Value::Object(outputs));
        merged.insert("executionId".into(), serde_json::Value::String(self.execution_id.to_string()));
        merged.insert("workflowId".into(), serde_json::Value::String(self.workflow_id.to_string()));
        merged.insert("nodeId".into(), serde_json::Value::String(self.node_id.to_string()));
        if let serde_json::Value::Object(meta) = &self.workflow_data {
            for (k, v) in meta {
                merged.insert(k.clone(), v.clone());
            }
        }
        serde_json::Value::Object(merged)
    }

    /// `templateApply(node.config ∪ ctx.inputs, previousOutputs ∪ executionMeta)`.
    pub fn effective_inputs(
        &self,
        config: &serde_json::Value,
    ) -> Result<serde_json::Value, BlockError> {
        let merged_json = merge(config, &self.inputs);
        let ctx_value = self.secondary_context();
        let tctx = TemplateContext::new(&merged_json, &ctx_value);
        Ok(render_value(&merged_json, &tctx)?)
    }
}

fn merge(base: &serde_json::Value, overlay: &serde_json::Value) -> serde_json::Value {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (k, v) in overlay_map {
                merged.insert(k.clone(), v.clone());
            }
            serde_json::Value::Object(merged)
        }
        _ => base.clone(),
    }
}
