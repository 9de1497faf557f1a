//! Node execution attempt tracking.

use chrono::{DateTime, Utc};
use nebula_action::NodeOutputData;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::idempotency::IdempotencyKey;

/// A single attempt to execute a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeAttempt {
    /// Which attempt this is (0-indexed).
    pub attempt_number: u32,
    /// Idempotency key for this attempt.
    pub idempotency_key: IdempotencyKey,
    /// When this attempt started.
    pub started_at: DateTime<Utc>,
    /// When this attempt completed (if finished).
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Output data if the attempt succeeded.
    #[serde(default)]
    pub output: Option<NodeOutputData>,
    /// Error message if the attempt failed.
    #[serde(default)]
    pub error: Option<String>,
    /// Size of the output in bytes.
    #[serde(default)]
    pub output_bytes: u64,
}

impl NodeAttempt {
    /// Create a new attempt that has just started.
    #[must_use]
    pub fn new(attempt_number: u32, idempotency_key: IdempotencyKey) -> Self {
        Self {
            attempt_number,
            idempotency_key,
            started_at: Utc::now(),
            completed_at: None,
            output: None,
            error: None,
            output_bytes: 0,
        }
    }

    /// Mark this attempt as successfully completed.
    pub fn complete_success(&mut self, output: NodeOutputData, output_bytes: u64) {
        self.completed_at = Some(Utc::now());
        self.output = Some(output);
        self.output_bytes = output_bytes;
    }

    /// Mark this attempt as failed.
    pub fn complete_failure(&mut self, error: impl Into<String>) {
        self.completed_at = Some(Utc::now());
        self.error = Some(error.into());
    }

    /// Returns `true` if this attempt has finished (success or failure).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns `true` if this attempt succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.output.is_some() && self.error.is_none()
    }

    /// Returns `true` if this attempt failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Calculate the duration of this attempt.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at
            .map(|end| (end - self.started_at).to_std().unwrap_or(Duration::ZERO))
    }
}
