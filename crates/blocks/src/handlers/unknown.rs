use async_trait::async_trait;
use nebula_workflow::NodeDefinition;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Fallback handler for any kind the registry doesn't recognize.
pub struct UnknownHandler;

#[async_trait]
impl BlockHandler for UnknownHandler {
    async fn execute(
        &self,
        _node: &NodeDefinition,
        _ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        Err(BlockError::UnknownBlockKind("UNKNOWN".to_string()))
    }
}
