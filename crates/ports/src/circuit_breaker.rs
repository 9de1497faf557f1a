//! Circuit-breaker state persistence port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PortsError;

/// Open/closed state of a circuit, per the classic circuit-breaker pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    /// Requests flow normally.
    Closed,
    /// Requests fail fast without attempting the protected call.
    Open,
    /// One trial request is allowed to probe recovery.
    HalfOpen,
}

/// Persisted state for a single circuit, keyed by `circuit_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerRecord {
    pub circuit_id: String,
    pub state: BreakerState,
    pub consecutive_failures: u32,
    pub opened_at: Option<chrono::DateTime<chrono::Utc>>,
    pub next_attempt_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CircuitBreakerRecord {
    /// A fresh, closed circuit with no recorded failures.
    pub fn closed(circuit_id: impl Into<String>) -> Self {
        Self {
            circuit_id: circuit_id.into(),
            state: BreakerState::Closed,
            consecutive_failures: 0,
            opened_at: None,
            next_attempt_at: None,
        }
    }
}

/// Storage for circuit-breaker state, keyed by an opaque `circuit_id` string
/// (e.g. `"workflow:<id>"` or `"execution-worker:workflow-execution"`).
#[async_trait]
pub trait CircuitBreakerStore: Send + Sync {
    /// Fetch the record for a circuit, if one has been recorded.
    async fn get(&self, circuit_id: &str) -> Result<Option<CircuitBreakerRecord>, PortsError>;

    /// Overwrite the record for a circuit.
    async fn set(&self, record: CircuitBreakerRecord) -> Result<(), PortsError>;

    /// List every known circuit's state.
    async fn list_all(&self) -> Result<Vec<CircuitBreakerRecord>, PortsError>;

    /// Reset a circuit back to closed, clearing its failure count.
    async fn reset(&self, circuit_id: &str) -> Result<(), PortsError>;
}
