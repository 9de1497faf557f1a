use async_trait::async_trait;
use nebula_workflow::NodeDefinition;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Returns its effective config untouched; actual scheduling happens
/// outside this worker (an external cron/queue trigger).
pub struct ScheduleHandler;

#[async_trait]
impl BlockHandler for ScheduleHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        ctx.effective_inputs(&node.config)
    }
}
