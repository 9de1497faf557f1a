use std::collections::{HashMap, HashSet};

use nebula_core::NodeId;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::definition::WorkflowDefinition;
use crate::error::WorkflowGraphError;

/// The dependency graph derived from a [`WorkflowDefinition`]'s nodes and
/// connections, used to compute a parallel execution schedule.
pub struct DependencyGraph {
    graph: DiGraphMap<NodeId, ()>,
}

impl DependencyGraph {
    /// Builds a graph from a workflow definition, rejecting duplicate node
    /// ids and connections that reference undeclared nodes.
    pub fn from_definition(workflow: &WorkflowDefinition) -> Result<Self, WorkflowGraphError> {
        let mut graph = DiGraphMap::new();
        let mut seen = HashSet::with_capacity(workflow.nodes.len());

        for node in &workflow.nodes {
            if !seen.insert(node.id) {
                return Err(WorkflowGraphError::DuplicateNode(node.id));
            }
            graph.add_node(node.id);
        }

        for connection in &workflow.connections {
            if !seen.contains(&connection.source) {
                return Err(WorkflowGraphError::DanglingConnection(connection.source));
            }
            if !seen.contains(&connection.target) {
                return Err(WorkflowGraphError::DanglingConnection(connection.target));
            }
            graph.add_edge(connection.source, connection.target, ());
        }

        Ok(Self { graph })
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Nodes with no predecessors, in a stable (sorted) order.
    pub fn entry_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|&n| self.graph.neighbors_directed(n, Direction::Incoming).next().is_none())
            .collect();
        nodes.sort();
        nodes
    }

    /// Nodes with no successors, in a stable (sorted) order.
    pub fn exit_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|&n| self.graph.neighbors_directed(n, Direction::Outgoing).next().is_none())
            .collect();
        nodes.sort();
        nodes
    }

    /// Groups nodes into levels via Kahn's algorithm: level 0 holds every
    /// entry node, level N holds nodes whose dependencies all finished by
    /// level N-1. Nodes within each level can run in parallel. Returns
    /// [`WorkflowGraphError::CycleDetected`] if the graph isn't a DAG.
    pub fn compute_levels(&self) -> Result<Vec<Vec<NodeId>>, WorkflowGraphError> {
        let mut in_degree: HashMap<NodeId, usize> = self
            .graph
            .nodes()
            .map(|n| (n, self.graph.neighbors_directed(n, Direction::Incoming).count()))
            .collect();

        let mut levels = Vec::new();
        let mut remaining = in_degree.len();

        while remaining > 0 {
            let mut level: Vec<NodeId> = in_degree
                .iter()
                .filter(|&(_, &degree)| degree == 0)
                .map(|(&n, _)| n)
                .collect();

            if level.is_empty() {
                return Err(WorkflowGraphError::CycleDetected);
            }
            level.sort();

            for &n in &level {
                in_degree.remove(&n);
                remaining -= 1;
                for successor in self.graph.neighbors_directed(n, Direction::Outgoing) {
                    if let Some(degree) = in_degree.get_mut(&successor) {
                        *degree -= 1;
                    }
                }
            }

            levels.push(level);
        }

        Ok(levels)
    }
}
