//! Execution-scoped event fan-out (C9), built on the generic [`EventBus`].
//!
//! Rooms are keyed by `execution_id`. Delivery is best-effort: a lagging
//! subscriber silently skips ahead rather than blocking the publisher, since
//! missing events can always be reconstructed by replaying the journal.

use nebula_core::{ExecutionId, NodeId};
use nebula_eventbus::{BackpressurePolicy, EventBus, Subscription};
use nebula_workflow::NodeState;

/// One fan-out event kind for an execution in progress.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    ExecutionStarted {
        execution_id: ExecutionId,
    },
    NodeExecutionUpdate {
        execution_id: ExecutionId,
        node_id: NodeId,
        state: NodeState,
    },
    ExecutionCompleted {
        execution_id: ExecutionId,
    },
    ExecutionFailed {
        execution_id: ExecutionId,
        error: String,
    },
    ExecutionCancelled {
        execution_id: ExecutionId,
    },
    ExecutionLog {
        execution_id: ExecutionId,
        node_id: Option<NodeId>,
        message: String,
    },
    ExecutionMetrics {
        execution_id: ExecutionId,
        completed_nodes: usize,
        total_nodes: usize,
    },
    EdgeFlow {
        execution_id: ExecutionId,
        source: NodeId,
        target: NodeId,
    },
}

impl ExecutionEvent {
    /// The execution every variant carries, used as the bus room key.
    #[must_use]
    pub fn execution_id(&self) -> ExecutionId {
        match self {
            Self::ExecutionStarted { execution_id }
            | Self::NodeExecutionUpdate { execution_id, .. }
            | Self::ExecutionCompleted { execution_id }
            | Self::ExecutionFailed { execution_id, .. }
            | Self::ExecutionCancelled { execution_id }
            | Self::ExecutionLog { execution_id, .. }
            | Self::ExecutionMetrics { execution_id, .. }
            | Self::EdgeFlow { execution_id, .. } => *execution_id,
        }
    }
}

/// Thin wrapper around [`EventBus<ExecutionEvent>`] that derives the room
/// key from the event itself, so callers never juggle a room string.
pub struct ExecutionEvents {
    bus: EventBus<ExecutionEvent>,
}

impl ExecutionEvents {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bus: EventBus::new().with_policy(BackpressurePolicy::DropOldest),
        }
    }

    /// Subscribes to every event for one execution.
    #[must_use]
    pub fn subscribe(&self, execution_id: ExecutionId) -> Subscription<ExecutionEvent> {
        self.bus.subscribe(&execution_id.to_string())
    }

    /// Publishes an event to its execution's room.
    pub fn publish(&self, event: ExecutionEvent) {
        let room = event.execution_id().to_string();
        self.bus.publish(&room, event);
    }

    /// Closes an execution's room once it has reached a terminal state.
    pub fn close(&self, execution_id: ExecutionId) {
        self.bus.close(&execution_id.to_string());
    }
}

impl Default for ExecutionEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_eventbus::RecvOutcome;

    #[tokio::test]
    async fn subscriber_receives_events_for_its_execution() {
        let events = ExecutionEvents::new();
        let execution_id = ExecutionId::v4();
        let mut sub = events.subscribe(execution_id);

        events.publish(ExecutionEvent::ExecutionStarted { execution_id });

        match sub.recv().await {
            RecvOutcome::Event(ExecutionEvent::ExecutionStarted { execution_id: got }) => {
                assert_eq!(got, execution_id);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn events_for_other_executions_are_not_observed() {
        let events = ExecutionEvents::new();
        let mine = ExecutionId::v4();
        let other = ExecutionId::v4();
        let mut sub = events.subscribe(mine);

        events.publish(ExecutionEvent::ExecutionStarted { execution_id: other });

        let delivered =
            tokio::time::timeout(std::time::Duration::from_millis(20), sub.recv()).await;
        assert!(delivered.is_err());
    }

    #[test]
    fn execution_id_accessor_covers_every_variant() {
        let execution_id = ExecutionId::v4();
        let node_id = NodeId::v4();
        let events = vec![
            ExecutionEvent::ExecutionStarted { execution_id },
            ExecutionEvent::NodeExecutionUpdate {
                execution_id,
                node_id,
                state: NodeState::Running,
            },
            ExecutionEvent::ExecutionCompleted { execution_id },
            ExecutionEvent::ExecutionFailed {
                execution_id,
                error: "boom".into(),
            },
            ExecutionEvent::ExecutionCancelled { execution_id },
            ExecutionEvent::ExecutionLog {
                execution_id,
                node_id: Some(node_id),
                message: "hi".into(),
            },
            ExecutionEvent::ExecutionMetrics {
                execution_id,
                completed_nodes: 1,
                total_nodes: 2,
            },
            ExecutionEvent::EdgeFlow {
                execution_id,
                source: node_id,
                target: node_id,
            },
        ];
        for event in events {
            assert_eq!(event.execution_id(), execution_id);
        }
    }
}
