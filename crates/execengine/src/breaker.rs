//! Step 2 and step 6 of the execution algorithm: guard a circuit before
//! starting work, and update it once the execution settles.

use chrono::{Duration as ChronoDuration, Utc};
use nebula_ports::{BreakerState, CircuitBreakerRecord, CircuitBreakerStore};
use std::time::Duration;

use crate::error::WorkerError;

/// Checks a circuit before an execution starts.
///
/// An absent record is treated as closed. An open circuit whose cooldown has
/// not yet elapsed fails fast with [`WorkerError::CircuitOpen`]. An open
/// circuit past its cooldown is moved to half-open and allowed through, so
/// the caller's attempt becomes the recovery probe.
pub async fn guard(store: &dyn CircuitBreakerStore, circuit_id: &str) -> Result<(), WorkerError> {
    let record = store
        .get(circuit_id)
        .await?
        .unwrap_or_else(|| CircuitBreakerRecord::closed(circuit_id));

    if record.state != BreakerState::Open {
        return Ok(());
    }

    let now = Utc::now();
    match record.next_attempt_at {
        Some(next_attempt_at) if now < next_attempt_at => {
            let retry_after_secs = (next_attempt_at - now).num_seconds().max(0);
            Err(WorkerError::CircuitOpen { retry_after_secs })
        }
        _ => {
            let mut half_open = record;
            half_open.state = BreakerState::HalfOpen;
            store.set(half_open).await?;
            Ok(())
        }
    }
}

/// Closes the circuit and clears its failure count after a successful run.
pub async fn record_success(
    store: &dyn CircuitBreakerStore,
    circuit_id: &str,
) -> Result<(), WorkerError> {
    store.set(CircuitBreakerRecord::closed(circuit_id)).await?;
    Ok(())
}

/// Increments the circuit's failure count, opening it once `threshold` is
/// reached and scheduling the next recovery attempt after `cooldown`.
pub async fn record_failure(
    store: &dyn CircuitBreakerStore,
    circuit_id: &str,
    threshold: u32,
    cooldown: Duration,
) -> Result<(), WorkerError> {
    let mut record = store
        .get(circuit_id)
        .await?
        .unwrap_or_else(|| CircuitBreakerRecord::closed(circuit_id));

    record.consecutive_failures += 1;

    if record.consecutive_failures >= threshold {
        let now = Utc::now();
        record.state = BreakerState::Open;
        record.opened_at = Some(now);
        record.next_attempt_at = Some(
            now + ChronoDuration::from_std(cooldown).unwrap_or(ChronoDuration::seconds(60)),
        );
    }

    store.set(record).await?;
    Ok(())
}
