//! Step 4 of the execution algorithm: run a single ready node to
//! completion, applying its deadline and retry policy.

use std::time::Duration;

use nebula_action::NodeOutputData;
use nebula_blocks::{BlockContext, BlockRegistry};
use nebula_execution::{IdempotencyKey, NodeAttempt};
use nebula_workflow::NodeDefinition;

use crate::error::WorkerError;
use crate::retry::NodeRetryPolicy;

/// The kind a node resolves to in the handler registry.
///
/// Nodes carry an `action_id` bound at load time, but the registry still
/// keys handlers by the block kind string the wire document used; a node's
/// config retains that string under `kind` for the engine to read back.
/// Nodes without one (a document built directly with an `action_id`, as in
/// tests) fall back to the id's own string form, which resolves to the
/// unknown-kind handler unless a caller registered a handler under that id.
fn block_kind(node: &NodeDefinition) -> String {
    node.config
        .get("kind")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| node.action_id.to_string())
}

/// Runs `node` once against its handler, bounded by `deadline`.
async fn run_once(
    registry: &BlockRegistry,
    node: &NodeDefinition,
    ctx: &BlockContext,
    deadline: Duration,
) -> Result<serde_json::Value, WorkerError> {
    let handler = registry.resolve(&block_kind(node));
    match tokio::time::timeout(deadline, handler.execute(node, ctx)).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err)) => Err(WorkerError::from(err)),
        Err(_) => Err(WorkerError::NodeDeadlineExceeded(ctx.node_id)),
    }
}

/// Runs `node` to completion, retrying transient failures up to
/// `policy.max_attempts` times with exponential back-off.
///
/// Returns every attempt made (for the node's journal/state) alongside the
/// final outcome.
pub async fn run_with_retry(
    registry: &BlockRegistry,
    node: &NodeDefinition,
    ctx: &BlockContext,
    deadline: Duration,
    policy: &NodeRetryPolicy,
) -> (Vec<NodeAttempt>, Result<serde_json::Value, WorkerError>) {
    let mut attempts = Vec::new();
    let mut last_err = None;

    for attempt_number in 0..policy.max_attempts {
        let key = IdempotencyKey::generate(ctx.execution_id, ctx.node_id, attempt_number);
        let mut record = NodeAttempt::new(attempt_number, key);

        match run_once(registry, node, ctx, deadline).await {
            Ok(output) => {
                let bytes = serde_json::to_vec(&output).map(|v| v.len() as u64).unwrap_or(0);
                record.complete_success(NodeOutputData::Inline(output.clone()), bytes);
                attempts.push(record);
                return (attempts, Ok(output));
            }
            Err(err) => {
                record.complete_failure(err.to_string());
                attempts.push(record);

                let retryable = err.is_transient();
                let is_last = attempt_number + 1 == policy.max_attempts;
                last_err = Some(err);

                if !retryable || is_last {
                    break;
                }
                tokio::time::sleep(policy.delay_for(attempt_number)).await;
            }
        }
    }

    (attempts, Err(last_err.expect("at least one attempt runs")))
}
