use nebula_core::NodeId;
use thiserror::Error;

/// Errors raised while building or analyzing a workflow's dependency graph.
#[derive(Debug, Error)]
pub enum WorkflowGraphError {
    /// A connection references a node id that isn't declared in the workflow.
    #[error("connection references unknown node: {0}")]
    DanglingConnection(NodeId),

    /// The graph contains a cycle, so no valid topological order exists.
    #[error("workflow graph contains a cycle")]
    CycleDetected,

    /// Two nodes in the same workflow share an id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_connection_display() {
        let id = NodeId::v4();
        let err = WorkflowGraphError::DanglingConnection(id);
        assert!(err.to_string().contains("unknown node"));
    }

    #[test]
    fn cycle_detected_display() {
        assert_eq!(
            WorkflowGraphError::CycleDetected.to_string(),
            "workflow graph contains a cycle"
        );
    }
}
