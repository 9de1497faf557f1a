//! Step 1 of the execution algorithm: claim the execution's lock via a
//! compare-and-swap update, so that at most one worker drives a given
//! execution at a time.

use nebula_core::ExecutionId;
use nebula_execution::ExecutionState;
use nebula_ports::ExecutionRepo;

use crate::error::WorkerError;

/// Attempts to claim `execution_id` for `worker_id`.
///
/// Loads the current state, tries [`ExecutionState::try_acquire_lock`], and
/// writes the result back with a compare-and-swap on `version`. A `false`
/// return means the lock is held by someone else, or another worker won the
/// race on the CAS write; callers should ack the dequeued message and move
/// on rather than retry.
///
/// The returned version is the one now on record in the repo, for
/// [`release`] to close the loop with — not `state.version`, which keeps
/// climbing in memory as the caller runs the execution and never reflects
/// what's actually been written back in between.
pub async fn acquire(
    repo: &dyn ExecutionRepo,
    execution_id: ExecutionId,
    worker_id: &str,
) -> Result<Option<(ExecutionState, u64)>, WorkerError> {
    let Some((version, raw)) = repo.get_state(execution_id).await? else {
        return Ok(None);
    };
    let mut state: ExecutionState = serde_json::from_value(raw).map_err(|err| {
        WorkerError::Execution(nebula_execution::ExecutionError::Serialization(err))
    })?;

    if !state.try_acquire_lock(worker_id) {
        return Ok(None);
    }

    let new_value = serde_json::to_value(&state).map_err(|err| {
        WorkerError::Execution(nebula_execution::ExecutionError::Serialization(err))
    })?;
    let won = repo.transition(execution_id, version, new_value).await?;

    Ok(if won { Some((state, version + 1)) } else { None })
}

/// Releases `execution_id`'s lock, unconditionally clearing `locked_by`, and
/// writes the final state back.
///
/// `repo_version` must be the version [`acquire`] handed back; the engine
/// only ever writes to the repo twice, at acquire and here, so that's the
/// version still on record regardless of how many in-memory transitions
/// `state` went through while the execution ran. Called in step 7 regardless
/// of outcome (success, failure, or cancellation) so the execution becomes
/// claimable again.
pub async fn release(
    repo: &dyn ExecutionRepo,
    execution_id: ExecutionId,
    mut state: ExecutionState,
    repo_version: u64,
) -> Result<(), WorkerError> {
    state.release_lock();
    let new_value = serde_json::to_value(&state).map_err(|err| {
        WorkerError::Execution(nebula_execution::ExecutionError::Serialization(err))
    })?;
    let won = repo.transition(execution_id, repo_version, new_value).await?;
    if !won {
        return Err(WorkerError::LockLost(execution_id));
    }
    Ok(())
}
