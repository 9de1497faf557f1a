#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! In-memory [`ExecutionRepo`] driver: versioned state with compare-and-swap
//! transitions, an append-only journal, and time-bounded leases. Suitable
//! for tests and single-process deployments; nothing here survives a
//! restart.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use nebula_core::ExecutionId;
use nebula_ports::error::PortsError;
use nebula_ports::ExecutionRepo;
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone)]
struct Lease {
    holder: String,
    expires_at: Instant,
}

#[derive(Default)]
struct Inner {
    states: HashMap<ExecutionId, (u64, Value)>,
    journals: HashMap<ExecutionId, Vec<Value>>,
    leases: HashMap<ExecutionId, Lease>,
}

/// In-memory [`ExecutionRepo`]: a `Mutex`-guarded map of execution states,
/// journals, and leases.
#[derive(Default)]
pub struct InMemoryExecutionRepo {
    inner: Mutex<Inner>,
}

impl InMemoryExecutionRepo {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an execution's initial state at version 0, for test setup.
    pub async fn seed(&self, id: ExecutionId, state: nebula_execution::ExecutionState) {
        let value = serde_json::to_value(&state).expect("ExecutionState always serializes");
        let mut inner = self.inner.lock();
        inner.states.insert(id, (0, value));
    }
}

#[async_trait]
impl ExecutionRepo for InMemoryExecutionRepo {
    async fn get_state(&self, id: ExecutionId) -> Result<Option<(u64, Value)>, PortsError> {
        Ok(self.inner.lock().states.get(&id).cloned())
    }

    async fn transition(
        &self,
        id: ExecutionId,
        expected_version: u64,
        new_state: Value,
    ) -> Result<bool, PortsError> {
        let mut inner = self.inner.lock();
        match inner.states.get(&id) {
            None => {
                if expected_version != 0 {
                    return Ok(false);
                }
                inner.states.insert(id, (1, new_state));
                Ok(true)
            }
            Some((current_version, _)) if *current_version == expected_version => {
                inner.states.insert(id, (expected_version + 1, new_state));
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    async fn get_journal(&self, id: ExecutionId) -> Result<Vec<Value>, PortsError> {
        Ok(self.inner.lock().journals.get(&id).cloned().unwrap_or_default())
    }

    async fn append_journal(&self, id: ExecutionId, entry: Value) -> Result<(), PortsError> {
        self.inner.lock().journals.entry(id).or_default().push(entry);
        Ok(())
    }

    async fn acquire_lease(
        &self,
        id: ExecutionId,
        holder: String,
        ttl: Duration,
    ) -> Result<bool, PortsError> {
        let mut inner = self.inner.lock();
        let now = Instant::now();
        let eligible = match inner.leases.get(&id) {
            None => true,
            Some(lease) => lease.holder == holder || lease.expires_at <= now,
        };
        if !eligible {
            return Ok(false);
        }
        inner.leases.insert(
            id,
            Lease { holder, expires_at: now + ttl },
        );
        Ok(true)
    }

    async fn renew_lease(
        &self,
        id: ExecutionId,
        holder: &str,
        ttl: Duration,
    ) -> Result<bool, PortsError> {
        let mut inner = self.inner.lock();
        match inner.leases.get_mut(&id) {
            Some(lease) if lease.holder == holder => {
                lease.expires_at = Instant::now() + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_lease(&self, id: ExecutionId, holder: &str) -> Result<bool, PortsError> {
        let mut inner = self.inner.lock();
        match inner.leases.get(&id) {
            Some(lease) if lease.holder == holder => {
                inner.leases.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::WorkflowId;
    use serde_json::json;

    #[tokio::test]
    async fn get_state_on_unknown_execution_is_none() {
        let repo = InMemoryExecutionRepo::new();
        assert!(repo.get_state(ExecutionId::v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transition_creates_state_at_version_zero() {
        let repo = InMemoryExecutionRepo::new();
        let id = ExecutionId::v4();
        let ok = repo.transition(id, 0, json!({"a": 1})).await.unwrap();
        assert!(ok);
        let (version, value) = repo.get_state(id).await.unwrap().unwrap();
        assert_eq!(version, 1);
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn transition_rejects_stale_version() {
        let repo = InMemoryExecutionRepo::new();
        let id = ExecutionId::v4();
        repo.transition(id, 0, json!({"a": 1})).await.unwrap();
        let ok = repo.transition(id, 0, json!({"a": 2})).await.unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn seed_then_cas_succeeds_with_matching_version() {
        let repo = InMemoryExecutionRepo::new();
        let id = ExecutionId::v4();
        let state = nebula_execution::ExecutionState::new(id, WorkflowId::v4(), &[]);
        repo.seed(id, state).await;

        let (version, _) = repo.get_state(id).await.unwrap().unwrap();
        assert_eq!(version, 0);
        assert!(repo.transition(id, 0, json!({"b": 2})).await.unwrap());
    }

    #[tokio::test]
    async fn journal_append_and_read_back_preserve_order() {
        let repo = InMemoryExecutionRepo::new();
        let id = ExecutionId::v4();
        repo.append_journal(id, json!({"event": "execution_started"}))
            .await
            .unwrap();
        repo.append_journal(id, json!({"event": "execution_completed"}))
            .await
            .unwrap();

        let journal = repo.get_journal(id).await.unwrap();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0]["event"], "execution_started");
    }

    #[tokio::test]
    async fn lease_is_exclusive_until_released() {
        let repo = InMemoryExecutionRepo::new();
        let id = ExecutionId::v4();
        assert!(
            repo.acquire_lease(id, "worker-1".into(), Duration::from_secs(30))
                .await
                .unwrap()
        );
        assert!(
            !repo
                .acquire_lease(id, "worker-2".into(), Duration::from_secs(30))
                .await
                .unwrap()
        );

        assert!(repo.release_lease(id, "worker-1").await.unwrap());
        assert!(
            repo.acquire_lease(id, "worker-2".into(), Duration::from_secs(30))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn renew_lease_requires_matching_holder() {
        let repo = InMemoryExecutionRepo::new();
        let id = ExecutionId::v4();
        repo.acquire_lease(id, "worker-1".into(), Duration::from_secs(30))
            .await
            .unwrap();

        assert!(
            !repo
                .renew_lease(id, "worker-2", Duration::from_secs(30))
                .await
                .unwrap()
        );
        assert!(
            repo.renew_lease(id, "worker-1", Duration::from_secs(30))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn expired_lease_can_be_reacquired_by_another_holder() {
        let repo = InMemoryExecutionRepo::new();
        let id = ExecutionId::v4();
        repo.acquire_lease(id, "worker-1".into(), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(
            repo.acquire_lease(id, "worker-2".into(), Duration::from_secs(30))
                .await
                .unwrap()
        );
    }
}
