use async_trait::async_trait;
use nebula_workflow::NodeDefinition;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Returns the effective inputs untouched.
///
/// The webhook trigger itself is fired by the surrounding transport before
/// the execution engine ever schedules this node; by the time this handler
/// runs, the received payload is already part of `ctx.inputs`.
pub struct WebhookHandler;

#[async_trait]
impl BlockHandler for WebhookHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        ctx.effective_inputs(&node.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::id::{ActionId, ExecutionId, NodeId, UserId, WorkflowId};
    use serde_json::json;

    #[tokio::test]
    async fn passes_received_payload_through() {
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4());
        let ctx = BlockContext::new(NodeId::v4(), ExecutionId::v4(), WorkflowId::v4(), UserId::v4())
            .with_inputs(json!({"event": "push"}));
        let out = WebhookHandler.execute(&node, &ctx).await.unwrap();
        assert_eq!(out, json!({"event": "push"}));
    }
}
