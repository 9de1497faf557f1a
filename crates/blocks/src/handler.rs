use async_trait::async_trait;
use nebula_workflow::NodeDefinition;

use crate::context::BlockContext;
use crate::error::BlockError;

/// Resolves one block kind to executable behavior.
///
/// Handlers are stateless between invocations -- the registry shares a
/// single instance of each across every execution, so implementations
/// must not hold per-invocation state in `&self`.
#[async_trait]
pub trait BlockHandler: Send + Sync {
    /// Runs the block against its node definition and execution context,
    /// returning a mapping downstream nodes can address as `{{json.<key>}}`.
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError>;
}
