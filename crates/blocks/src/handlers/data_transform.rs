use async_trait::async_trait;
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Reshapes upstream data via a template-driven mapping.
///
/// Config shape: `{ "mappings": { <outputKey>: <templateString> } }`. Each
/// template is rendered against the effective inputs and assigned to the
/// named output key.
pub struct DataTransformHandler;

#[async_trait]
impl BlockHandler for DataTransformHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;
        let mappings = config
            .get("mappings")
            .and_then(Value::as_object)
            .ok_or_else(|| BlockError::Validation("data_transform: missing `mappings`".into()))?;

        let mut output = serde_json::Map::with_capacity(mappings.len());
        for (key, value) in mappings {
            output.insert(key.clone(), value.clone());
        }
        Ok(Value::Object(output))
    }
}
