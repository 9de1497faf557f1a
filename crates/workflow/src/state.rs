use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a single node within an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Waiting on upstream dependencies.
    Pending,
    /// Dependencies satisfied; eligible to run.
    Ready,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Failed but scheduled for another attempt.
    Retrying,
    /// Will not run because the execution was cancelled.
    Cancelled,
    /// Will not run because an upstream branch made it unreachable.
    Skipped,
}

impl NodeState {
    /// Whether this state is terminal — no further transition is possible.
    ///
    /// `Failed` is excluded: it may still transition to `Retrying`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NodeState::Completed | NodeState::Cancelled | NodeState::Skipped
        )
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeState::Pending => "pending",
            NodeState::Ready => "ready",
            NodeState::Running => "running",
            NodeState::Completed => "completed",
            NodeState::Failed => "failed",
            NodeState::Retrying => "retrying",
            NodeState::Cancelled => "cancelled",
            NodeState::Skipped => "skipped",
        };
        f.write_str(s)
    }
}
