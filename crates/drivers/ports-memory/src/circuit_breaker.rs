use async_trait::async_trait;
use dashmap::DashMap;
use nebula_ports::error::PortsError;
use nebula_ports::{BreakerState, CircuitBreakerRecord, CircuitBreakerStore};

/// In-memory [`CircuitBreakerStore`] keyed by circuit id.
#[derive(Debug, Default)]
pub struct MemoryCircuitBreakerStore {
    records: DashMap<String, CircuitBreakerRecord>,
}

impl MemoryCircuitBreakerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CircuitBreakerStore for MemoryCircuitBreakerStore {
    async fn get(&self, circuit_id: &str) -> Result<Option<CircuitBreakerRecord>, PortsError> {
        Ok(self.records.get(circuit_id).map(|r| r.clone()))
    }

    async fn set(&self, record: CircuitBreakerRecord) -> Result<(), PortsError> {
        self.records.insert(record.circuit_id.clone(), record);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<CircuitBreakerRecord>, PortsError> {
        Ok(self.records.iter().map(|r| r.value().clone()).collect())
    }

    async fn reset(&self, circuit_id: &str) -> Result<(), PortsError> {
        self.records
            .insert(circuit_id.to_string(), CircuitBreakerRecord::closed(circuit_id));
        Ok(())
    }
}
