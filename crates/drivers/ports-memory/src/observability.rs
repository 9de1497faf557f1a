use async_trait::async_trait;
use dashmap::DashMap;
use nebula_core::{ExecutionId, NodeId};
use nebula_ports::error::PortsError;
use nebula_ports::{AgentTranscript, LogEntry, LogSink, TranscriptStore};
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory [`LogSink`] backed by a per-execution append-only `Vec`.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    entries: DashMap<ExecutionId, Arc<Mutex<Vec<LogEntry>>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogSink for MemoryLogSink {
    async fn append(&self, entry: LogEntry) -> Result<(), PortsError> {
        self.entries
            .entry(entry.execution_id)
            .or_default()
            .lock()
            .push(entry);
        Ok(())
    }

    async fn list(&self, execution_id: ExecutionId) -> Result<Vec<LogEntry>, PortsError> {
        Ok(self
            .entries
            .get(&execution_id)
            .map(|v| v.lock().clone())
            .unwrap_or_default())
    }
}

/// In-memory [`TranscriptStore`] keyed by `(execution_id, node_id)`.
#[derive(Debug, Default)]
pub struct MemoryTranscriptStore {
    transcripts: DashMap<(ExecutionId, NodeId), AgentTranscript>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn save(&self, transcript: AgentTranscript) -> Result<(), PortsError> {
        self.transcripts
            .insert((transcript.execution_id, transcript.node_id), transcript);
        Ok(())
    }

    async fn get(
        &self,
        execution_id: ExecutionId,
        node_id: NodeId,
    ) -> Result<Option<AgentTranscript>, PortsError> {
        Ok(self
            .transcripts
            .get(&(execution_id, node_id))
            .map(|r| r.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_ports::LogLevel;

    #[tokio::test]
    async fn log_sink_preserves_append_order() {
        let sink = MemoryLogSink::new();
        let execution_id = ExecutionId::v4();
        for i in 0..3 {
            sink.append(LogEntry {
                execution_id,
                node_id: None,
                level: LogLevel::Info,
                message: format!("line {i}"),
                timestamp: chrono::Utc::now(),
                metadata: serde_json::Value::Null,
            })
            .await
            .unwrap();
        }

        let entries = sink.list(execution_id).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "line 0");
        assert_eq!(entries[2].message, "line 2");
    }

    #[tokio::test]
    async fn log_sink_separates_executions() {
        let sink = MemoryLogSink::new();
        let a = ExecutionId::v4();
        let b = ExecutionId::v4();
        sink.append(LogEntry {
            execution_id: a,
            node_id: None,
            level: LogLevel::Info,
            message: "a".into(),
            timestamp: chrono::Utc::now(),
            metadata: serde_json::Value::Null,
        })
        .await
        .unwrap();

        assert_eq!(sink.list(a).await.unwrap().len(), 1);
        assert_eq!(sink.list(b).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn transcript_store_roundtrips_by_node() {
        let store = MemoryTranscriptStore::new();
        let execution_id = ExecutionId::v4();
        let node_id = NodeId::v4();
        let transcript = AgentTranscript {
            execution_id,
            node_id,
            provider: "openrouter".into(),
            model: "gpt-4".into(),
            user_prompt: "hi".into(),
            system_prompt: None,
            thinking_steps: vec![],
            status: "completed".into(),
            started_at: chrono::Utc::now(),
            completed_at: None,
            result: Some("hello".into()),
            error: None,
            total_tokens: Some(42),
            execution_ms: 10,
        };
        store.save(transcript).await.unwrap();

        let fetched = store.get(execution_id, node_id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().result.as_deref(), Some("hello"));

        assert!(store.get(ExecutionId::v4(), node_id).await.unwrap().is_none());
    }
}
