//! Log and agent-transcript persistence ports.

use async_trait::async_trait;
use nebula_core::{ExecutionId, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::PortsError;

/// Severity of a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// A single structured log line emitted during an execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub execution_id: ExecutionId,
    pub node_id: Option<NodeId>,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Append-only sink for execution log entries.
///
/// Implementations must preserve monotone timestamp ordering per
/// `(execution_id, node_id)`.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Append a log entry.
    async fn append(&self, entry: LogEntry) -> Result<(), PortsError>;

    /// Fetch every log entry recorded for an execution, in append order.
    async fn list(&self, execution_id: ExecutionId) -> Result<Vec<LogEntry>, PortsError>;
}

/// One step of an agent's reasoning trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkingStep {
    /// 1-indexed position within the transcript.
    pub step: u32,
    pub description: String,
    pub confidence: f64,
}

/// Record of a single AI-agent block invocation, persisted for audit and
/// later inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTranscript {
    pub execution_id: ExecutionId,
    pub node_id: NodeId,
    pub provider: String,
    pub model: String,
    pub user_prompt: String,
    pub system_prompt: Option<String>,
    pub thinking_steps: Vec<ThinkingStep>,
    pub status: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub result: Option<String>,
    pub error: Option<String>,
    pub total_tokens: Option<u64>,
    pub execution_ms: u64,
}

/// Persistence for [`AgentTranscript`] records.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Persist (or overwrite, by `(execution_id, node_id)`) a transcript.
    async fn save(&self, transcript: AgentTranscript) -> Result<(), PortsError>;

    /// Fetch the transcript for a specific node, if one was recorded.
    async fn get(
        &self,
        execution_id: ExecutionId,
        node_id: NodeId,
    ) -> Result<Option<AgentTranscript>, PortsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_serde_roundtrip() {
        let entry = LogEntry {
            execution_id: ExecutionId::v4(),
            node_id: Some(NodeId::v4()),
            level: LogLevel::Warn,
            message: "retrying".into(),
            timestamp: chrono::Utc::now(),
            metadata: serde_json::json!({"attempt": 2}),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "retrying");
        assert_eq!(back.level, LogLevel::Warn);
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_log_sink(_: &dyn LogSink) {}
        fn _assert_transcript_store(_: &dyn TranscriptStore) {}
    }
}
