//! The execution engine: drives one workflow execution from dequeue to
//! settlement, implementing the full lock/circuit-breaker/DAG-traversal
//! algorithm.

use std::collections::HashMap;
use std::sync::Arc;

use nebula_action::ExecutionBudget;
use nebula_blocks::{BlockContext, BlockRegistry};
use nebula_core::{ExecutionId, NodeId, UserId};
use nebula_execution::{ExecutionPlan, ExecutionState, ExecutionStatus, JournalEntry};
use nebula_ports::{CircuitBreakerStore, ExecutionRepo};
use nebula_workflow::{NodeState, WorkflowDefinition};
use tokio_util::sync::CancellationToken;

use crate::breaker;
use crate::config::EngineConfig;
use crate::error::WorkerError;
use crate::events::{ExecutionEvent, ExecutionEvents};
use crate::lock;
use crate::node;
use crate::retry::NodeRetryPolicy;

/// Circuit covering every execution of one workflow definition.
fn workflow_circuit(workflow_id: nebula_core::WorkflowId) -> String {
    format!("workflow:{workflow_id}")
}

/// Circuit covering the worker process itself, independent of which
/// workflow is running.
const WORKER_CIRCUIT: &str = "execution-worker:workflow-execution";

/// Drives workflow executions against the handler registry, applying the
/// lock, circuit-breaker, and retry policies around each run.
pub struct ExecutionEngine {
    registry: Arc<BlockRegistry>,
    execution_repo: Arc<dyn ExecutionRepo>,
    breaker_store: Arc<dyn CircuitBreakerStore>,
    events: Arc<ExecutionEvents>,
    config: EngineConfig,
}

impl ExecutionEngine {
    #[must_use]
    pub fn new(
        registry: Arc<BlockRegistry>,
        execution_repo: Arc<dyn ExecutionRepo>,
        breaker_store: Arc<dyn CircuitBreakerStore>,
        events: Arc<ExecutionEvents>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            execution_repo,
            breaker_store,
            events,
            config,
        }
    }

    /// Drives `execution_id` to a terminal state, or returns immediately if
    /// another worker already owns it or a circuit is open.
    ///
    /// `cancellation` is checked at every suspension point in [`Self::traverse`]
    /// and raced against every in-flight node handler; once triggered, the
    /// execution settles through `Cancelling` into `Cancelled` rather than
    /// `Failed`.
    pub async fn run(
        &self,
        workflow: &WorkflowDefinition,
        execution_id: ExecutionId,
        user_id: UserId,
        cancellation: CancellationToken,
    ) -> Result<(), WorkerError> {
        let Some((mut state, lock_version)) =
            lock::acquire(self.execution_repo.as_ref(), execution_id, &self.config.worker_id)
                .await?
        else {
            return Ok(());
        };

        self.events.publish(ExecutionEvent::ExecutionStarted { execution_id });
        self.append_journal(execution_id, JournalEntry::ExecutionStarted { timestamp: now() })
            .await;

        let workflow_circuit = workflow_circuit(workflow.id);
        if let Err(err) = breaker::guard(self.breaker_store.as_ref(), &workflow_circuit).await {
            self.settle_failed(execution_id, &mut state, &err).await?;
            return Err(err);
        }
        if let Err(err) = breaker::guard(self.breaker_store.as_ref(), WORKER_CIRCUIT).await {
            self.settle_failed(execution_id, &mut state, &err).await?;
            return Err(err);
        }

        let plan = match ExecutionPlan::from_workflow(execution_id, workflow, ExecutionBudget::default())
        {
            Ok(plan) => plan,
            Err(err) => {
                let err = WorkerError::from(err);
                self.settle_failed(execution_id, &mut state, &err).await?;
                self.record_breaker_outcome(&workflow_circuit, false).await?;
                return Err(err);
            }
        };

        state.transition_status(ExecutionStatus::Running)?;

        let outcome = self
            .traverse(workflow, &plan, execution_id, user_id, &mut state, &cancellation)
            .await;

        // A user-requested cancellation isn't an infrastructure fault, so it
        // doesn't trip the circuit breaker the way a real failure would.
        let success = matches!(outcome, Ok(()) | Err(WorkerError::Cancelled));
        self.record_breaker_outcome(&workflow_circuit, success).await?;
        self.record_breaker_outcome(WORKER_CIRCUIT, success).await?;

        match &outcome {
            Ok(()) => self.settle_completed(execution_id, &mut state).await?,
            Err(WorkerError::Cancelled) => self.settle_cancelled(execution_id, &mut state).await?,
            Err(err) => self.settle_failed(execution_id, &mut state, err).await?,
        }

        lock::release(self.execution_repo.as_ref(), execution_id, state, lock_version).await?;
        self.events.close(execution_id);

        outcome
    }

    /// Runs every level of the plan in turn, up to `fan_out` nodes
    /// concurrently within a level. Returns the first halting node failure,
    /// if any, once every in-flight node in that level has settled.
    ///
    /// `cancellation` is checked before each level and each chunk starts, and
    /// raced against every in-flight node so a trigger interrupts handlers
    /// already running rather than only new ones. Once observed, every node
    /// that hasn't completed or failed yet — including ones in levels not
    /// reached — is marked [`NodeState::Cancelled`] and the function returns
    /// [`WorkerError::Cancelled`].
    async fn traverse(
        &self,
        workflow: &WorkflowDefinition,
        plan: &ExecutionPlan,
        execution_id: ExecutionId,
        user_id: UserId,
        state: &mut ExecutionState,
        cancellation: &CancellationToken,
    ) -> Result<(), WorkerError> {
        let mut outputs: HashMap<NodeId, serde_json::Value> = HashMap::new();
        let fan_out = self.config.fan_out.min(workflow.config.max_concurrency).max(1);
        let mut cancelled = cancellation.is_cancelled();

        'levels: for level in &plan.parallel_groups {
            if cancelled {
                break 'levels;
            }
            let mut halting_failure = None;

            for chunk in level.chunks(fan_out) {
                if cancellation.is_cancelled() {
                    cancelled = true;
                    break 'levels;
                }

                let results = futures::future::join_all(chunk.iter().map(|&node_id| {
                    let outputs = &outputs;
                    let cancellation = cancellation.clone();
                    async move {
                        let node = workflow
                            .node(node_id)
                            .expect("plan only contains nodes from this workflow");
                        let ctx = BlockContext::new(node_id, execution_id, workflow.id, user_id)
                            .with_previous_outputs(outputs.clone())
                            .with_workflow_data(serde_json::json!({ "workflowId": workflow.id.to_string() }));

                        self.events.publish(ExecutionEvent::NodeExecutionUpdate {
                            execution_id,
                            node_id,
                            state: NodeState::Running,
                        });

                        let deadline = self.config.node_timeout;
                        let policy = NodeRetryPolicy::from_config(&node.config);
                        let run = node::run_with_retry(&self.registry, node, &ctx, deadline, &policy);
                        tokio::select! {
                            () = cancellation.cancelled() => (node_id, node, Vec::new(), Err(WorkerError::Cancelled)),
                            (attempts, result) = run => (node_id, node, attempts, result),
                        }
                    }
                }))
                .await;

                for (node_id, node, attempts, result) in results {
                    let mut node_state = state.node_state(node_id).cloned().unwrap_or_default();
                    node_state.attempts = attempts;
                    if node_state.state == NodeState::Pending {
                        node_state.transition_to(NodeState::Ready)?;
                    }
                    node_state.transition_to(NodeState::Running)?;

                    match result {
                        Ok(output) => {
                            outputs.insert(node_id, output.clone());
                            node_state.transition_to(NodeState::Completed)?;
                            let bytes =
                                serde_json::to_vec(&output).map(|v| v.len() as u64).unwrap_or(0);
                            state.total_output_bytes += bytes;

                            self.events.publish(ExecutionEvent::NodeExecutionUpdate {
                                execution_id,
                                node_id,
                                state: NodeState::Completed,
                            });
                            self.append_journal(
                                execution_id,
                                JournalEntry::NodeCompleted { timestamp: now(), node_id, output_bytes: bytes },
                            )
                            .await;
                        }
                        Err(WorkerError::Cancelled) => {
                            node_state.transition_to(NodeState::Cancelled)?;
                            node_state.error_message = Some("execution cancelled".to_string());
                            self.events.publish(ExecutionEvent::NodeExecutionUpdate {
                                execution_id,
                                node_id,
                                state: NodeState::Cancelled,
                            });
                            cancelled = true;
                        }
                        Err(err) => {
                            let on_error_continue = node
                                .config
                                .get("onError")
                                .and_then(serde_json::Value::as_str)
                                == Some("continue");

                            if on_error_continue {
                                outputs.insert(node_id, serde_json::Value::Null);
                                node_state.transition_to(NodeState::Completed)?;
                                self.events.publish(ExecutionEvent::NodeExecutionUpdate {
                                    execution_id,
                                    node_id,
                                    state: NodeState::Completed,
                                });
                            } else {
                                node_state.transition_to(NodeState::Failed)?;
                                node_state.error_message = Some(err.to_string());
                                self.events.publish(ExecutionEvent::NodeExecutionUpdate {
                                    execution_id,
                                    node_id,
                                    state: NodeState::Failed,
                                });
                                self.append_journal(
                                    execution_id,
                                    JournalEntry::NodeFailed {
                                        timestamp: now(),
                                        node_id,
                                        error: err.to_string(),
                                    },
                                )
                                .await;
                                halting_failure.get_or_insert(err);
                            }
                        }
                    }

                    state.total_retries += node_state.attempts.len().saturating_sub(1) as u32;
                    state.set_node_state(node_id, node_state);
                }

                self.events.publish(ExecutionEvent::ExecutionMetrics {
                    execution_id,
                    completed_nodes: state.completed_node_ids().len(),
                    total_nodes: plan.total_nodes,
                });

                if cancelled {
                    break;
                }
            }

            if cancelled {
                break 'levels;
            }
            if let Some(err) = halting_failure {
                return Err(err);
            }
        }

        if cancelled {
            for node in &workflow.nodes {
                let mut node_state = state.node_state(node.id).cloned().unwrap_or_default();
                if matches!(node_state.state, NodeState::Pending | NodeState::Ready) {
                    node_state.transition_to(NodeState::Cancelled)?;
                    state.set_node_state(node.id, node_state);
                    self.events.publish(ExecutionEvent::NodeExecutionUpdate {
                        execution_id,
                        node_id: node.id,
                        state: NodeState::Cancelled,
                    });
                }
            }
            return Err(WorkerError::Cancelled);
        }

        Ok(())
    }

    async fn settle_completed(
        &self,
        execution_id: ExecutionId,
        state: &mut ExecutionState,
    ) -> Result<(), WorkerError> {
        state.transition_status(ExecutionStatus::Completed)?;
        self.events.publish(ExecutionEvent::ExecutionCompleted { execution_id });
        self.append_journal(
            execution_id,
            JournalEntry::ExecutionCompleted { timestamp: now(), status: ExecutionStatus::Completed },
        )
        .await;
        Ok(())
    }

    async fn settle_failed(
        &self,
        execution_id: ExecutionId,
        state: &mut ExecutionState,
        err: &WorkerError,
    ) -> Result<(), WorkerError> {
        if state.status == ExecutionStatus::Created {
            state.transition_status(ExecutionStatus::Running).ok();
        }
        state.transition_status(ExecutionStatus::Failed)?;
        self.events.publish(ExecutionEvent::ExecutionFailed {
            execution_id,
            error: err.to_string(),
        });
        self.append_journal(
            execution_id,
            JournalEntry::ExecutionFailed { timestamp: now(), error: err.to_string() },
        )
        .await;
        Ok(())
    }

    async fn settle_cancelled(
        &self,
        execution_id: ExecutionId,
        state: &mut ExecutionState,
    ) -> Result<(), WorkerError> {
        state.transition_status(ExecutionStatus::Cancelling)?;
        self.append_journal(
            execution_id,
            JournalEntry::CancellationRequested {
                timestamp: now(),
                reason: "cancellation token was triggered".to_string(),
            },
        )
        .await;
        state.transition_status(ExecutionStatus::Cancelled)?;
        self.events.publish(ExecutionEvent::ExecutionCancelled { execution_id });
        Ok(())
    }

    async fn record_breaker_outcome(&self, circuit_id: &str, success: bool) -> Result<(), WorkerError> {
        if success {
            breaker::record_success(self.breaker_store.as_ref(), circuit_id).await
        } else {
            breaker::record_failure(
                self.breaker_store.as_ref(),
                circuit_id,
                self.config.breaker_failure_threshold,
                self.config.breaker_cooldown,
            )
            .await
        }
    }

    async fn append_journal(&self, execution_id: ExecutionId, entry: JournalEntry) {
        if let Ok(value) = serde_json::to_value(&entry) {
            let _ = self.execution_repo.append_journal(execution_id, value).await;
        }
    }
}

fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_blocks::handlers::schedule::ScheduleHandler;
    use nebula_core::{ActionId, Version, WorkflowId};
    use nebula_execution_memory::InMemoryExecutionRepo;
    use nebula_ports_memory::MemoryCircuitBreakerStore;
    use nebula_workflow::{Connection, NodeDefinition, WorkflowConfig};

    fn engine() -> (ExecutionEngine, Arc<InMemoryExecutionRepo>) {
        let registry = Arc::new(BlockRegistry::builder().register("SCHEDULE", ScheduleHandler).build());
        let execution_repo = Arc::new(InMemoryExecutionRepo::new());
        let breaker_store = Arc::new(MemoryCircuitBreakerStore::new());
        let events = Arc::new(ExecutionEvents::new());
        let engine = ExecutionEngine::new(
            registry,
            execution_repo.clone(),
            breaker_store,
            events,
            EngineConfig::default(),
        );
        (engine, execution_repo)
    }

    fn linear_workflow(a: NodeId, b: NodeId) -> WorkflowDefinition {
        let now = chrono::Utc::now();
        let mut na = NodeDefinition::new(a, "a", ActionId::v4());
        na.config = serde_json::json!({"kind": "SCHEDULE"});
        let mut nb = NodeDefinition::new(b, "b", ActionId::v4());
        nb.config = serde_json::json!({"kind": "SCHEDULE"});
        WorkflowDefinition {
            id: WorkflowId::v4(),
            name: "wf".into(),
            description: None,
            version: Version::new(0, 1, 0),
            nodes: vec![na, nb],
            connections: vec![Connection::new(a, b)],
            variables: HashMap::new(),
            config: WorkflowConfig::default(),
            tags: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn run_completes_a_linear_two_node_workflow() {
        let (engine, repo) = engine();
        let a = NodeId::v4();
        let b = NodeId::v4();
        let workflow = linear_workflow(a, b);
        let execution_id = ExecutionId::v4();
        let state = ExecutionState::new(execution_id, workflow.id, &[a, b]);
        repo.seed(execution_id, state).await;

        engine
            .run(&workflow, execution_id, UserId::v4(), CancellationToken::new())
            .await
            .unwrap();

        let (_, value) = repo.get_state(execution_id).await.unwrap().unwrap();
        let state: ExecutionState = serde_json::from_value(value).unwrap();
        assert_eq!(state.status, ExecutionStatus::Completed);
        assert!(state.locked_by.is_none());
        assert_eq!(state.completed_node_ids().len(), 2);
    }

    #[tokio::test]
    async fn run_skips_execution_already_locked_by_another_worker() {
        let (engine, repo) = engine();
        let a = NodeId::v4();
        let b = NodeId::v4();
        let workflow = linear_workflow(a, b);
        let execution_id = ExecutionId::v4();
        let mut state = ExecutionState::new(execution_id, workflow.id, &[a, b]);
        state.try_acquire_lock("someone-else");
        repo.seed(execution_id, state).await;

        engine
            .run(&workflow, execution_id, UserId::v4(), CancellationToken::new())
            .await
            .unwrap();

        let (_, value) = repo.get_state(execution_id).await.unwrap().unwrap();
        let state: ExecutionState = serde_json::from_value(value).unwrap();
        assert_eq!(state.status, ExecutionStatus::Created);
    }

    #[tokio::test]
    async fn run_fails_execution_when_a_node_has_no_handler() {
        let (engine, repo) = engine();
        let a = NodeId::v4();
        let b = NodeId::v4();
        let mut workflow = linear_workflow(a, b);
        workflow.nodes[1].config = serde_json::json!({"kind": "NOT_REGISTERED"});
        let execution_id = ExecutionId::v4();
        let state = ExecutionState::new(execution_id, workflow.id, &[a, b]);
        repo.seed(execution_id, state).await;

        let err = engine
            .run(&workflow, execution_id, UserId::v4(), CancellationToken::new())
            .await;
        assert!(err.is_err());

        let (_, value) = repo.get_state(execution_id).await.unwrap().unwrap();
        let state: ExecutionState = serde_json::from_value(value).unwrap();
        assert_eq!(state.status, ExecutionStatus::Failed);
    }

    #[tokio::test]
    async fn run_continues_past_a_failed_node_with_on_error_continue() {
        let (engine, repo) = engine();
        let a = NodeId::v4();
        let b = NodeId::v4();
        let mut workflow = linear_workflow(a, b);
        workflow.nodes[0].config = serde_json::json!({"kind": "NOT_REGISTERED", "onError": "continue"});
        let execution_id = ExecutionId::v4();
        let state = ExecutionState::new(execution_id, workflow.id, &[a, b]);
        repo.seed(execution_id, state).await;

        engine
            .run(&workflow, execution_id, UserId::v4(), CancellationToken::new())
            .await
            .unwrap();

        let (_, value) = repo.get_state(execution_id).await.unwrap().unwrap();
        let state: ExecutionState = serde_json::from_value(value).unwrap();
        assert_eq!(state.status, ExecutionStatus::Completed);
    }

    #[tokio::test]
    async fn run_settles_as_cancelled_when_the_token_is_already_triggered() {
        let (engine, repo) = engine();
        let a = NodeId::v4();
        let b = NodeId::v4();
        let workflow = linear_workflow(a, b);
        let execution_id = ExecutionId::v4();
        let state = ExecutionState::new(execution_id, workflow.id, &[a, b]);
        repo.seed(execution_id, state).await;

        let token = CancellationToken::new();
        token.cancel();
        let err = engine.run(&workflow, execution_id, UserId::v4(), token).await;
        assert!(matches!(err, Err(WorkerError::Cancelled)));

        let (_, value) = repo.get_state(execution_id).await.unwrap().unwrap();
        let state: ExecutionState = serde_json::from_value(value).unwrap();
        assert_eq!(state.status, ExecutionStatus::Cancelled);
        for node_id in [a, b] {
            assert_eq!(state.node_state(node_id).unwrap().state, NodeState::Cancelled);
        }
    }
}
