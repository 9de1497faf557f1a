//! State machine transition validation for execution and node states.

use nebula_workflow::NodeState;

use crate::error::ExecutionError;
use crate::status::ExecutionStatus;

/// Returns `true` if the execution-level transition from `from` to `to` is valid.
#[must_use]
pub fn can_transition_execution(from: ExecutionStatus, to: ExecutionStatus) -> bool {
    matches!(
        (from, to),
        (ExecutionStatus::Created, ExecutionStatus::Running)
            | (ExecutionStatus::Running, ExecutionStatus::Paused)
            | (ExecutionStatus::Running, ExecutionStatus::Cancelling)
            | (ExecutionStatus::Running, ExecutionStatus::Completed)
            | (ExecutionStatus::Running, ExecutionStatus::Failed)
            | (ExecutionStatus::Running, ExecutionStatus::TimedOut)
            | (ExecutionStatus::Paused, ExecutionStatus::Running)
            | (ExecutionStatus::Paused, ExecutionStatus::Cancelling)
            | (ExecutionStatus::Cancelling, ExecutionStatus::Cancelled)
            | (ExecutionStatus::Cancelling, ExecutionStatus::Failed)
    )
}

/// Validate an execution-level transition, returning an error if invalid.
pub fn validate_execution_transition(
    from: ExecutionStatus,
    to: ExecutionStatus,
) -> Result<(), ExecutionError> {
    if can_transition_execution(from, to) {
        Ok(())
    } else {
        Err(ExecutionError::invalid_execution_transition(from, to))
    }
}

/// Returns `true` if the node-level transition from `from` to `to` is valid.
#[must_use]
pub fn can_transition_node(from: NodeState, to: NodeState) -> bool {
    matches!(
        (from, to),
        (NodeState::Pending, NodeState::Ready)
            | (NodeState::Pending, NodeState::Skipped)
            | (NodeState::Pending, NodeState::Cancelled)
            | (NodeState::Ready, NodeState::Running)
            | (NodeState::Ready, NodeState::Skipped)
            | (NodeState::Ready, NodeState::Cancelled)
            | (NodeState::Running, NodeState::Completed)
            | (NodeState::Running, NodeState::Failed)
            | (NodeState::Running, NodeState::Cancelled)
            | (NodeState::Failed, NodeState::Retrying)
            | (NodeState::Failed, NodeState::Cancelled)
            | (NodeState::Retrying, NodeState::Running)
            | (NodeState::Retrying, NodeState::Failed)
            | (NodeState::Retrying, NodeState::Cancelled)
    )
}

/// Validate a node-level transition, returning an error if invalid.
pub fn validate_node_transition(from: NodeState, to: NodeState) -> Result<(), ExecutionError> {
    if can_transition_node(from, to) {
        Ok(())
    } else {
        Err(ExecutionError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
