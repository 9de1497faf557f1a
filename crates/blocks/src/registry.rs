use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use nebula_ports::observability::{LogEntry, LogLevel, LogSink};
use nebula_workflow::NodeDefinition;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;
use crate::handlers::unknown::UnknownHandler;

/// Wraps a handler so every invocation records start/end timestamps,
/// success/failure, and a log row via the log sink port.
struct MetricsHandler<H> {
    kind: String,
    inner: H,
    log_sink: Option<Arc<dyn LogSink>>,
}

#[async_trait]
impl<H: BlockHandler> BlockHandler for MetricsHandler<H> {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let started = chrono::Utc::now();
        let result = self.inner.execute(node, ctx).await;
        let (level, message) = match &result {
            Ok(_) => (LogLevel::Info, format!("block {} completed", self.kind)),
            Err(err) => (LogLevel::Error, format!("block {} failed: {err}", self.kind)),
        };
        if let Some(sink) = &self.log_sink {
            let entry = LogEntry {
                execution_id: ctx.execution_id,
                node_id: Some(ctx.node_id),
                level,
                message,
                timestamp: chrono::Utc::now(),
                metadata: serde_json::json!({
                    "kind": self.kind,
                    "started_at": started.to_rfc3339(),
                    "success": result.is_ok(),
                }),
            };
            let _ = sink.append(entry).await;
        }
        result
    }
}

/// Resolves a block kind to its handler, case-insensitively.
///
/// Immutable after construction; new kinds are added through
/// [`BlockRegistryBuilder`]. Unknown kinds resolve to a handler that
/// always fails with [`BlockError::UnknownBlockKind`], rather than `None`,
/// so callers never need a separate not-found branch.
pub struct BlockRegistry {
    handlers: HashMap<String, Arc<dyn BlockHandler>>,
    unknown: Arc<dyn BlockHandler>,
}

impl BlockRegistry {
    pub fn builder() -> BlockRegistryBuilder {
        BlockRegistryBuilder::new()
    }

    /// Looks up the handler for `kind`, case-insensitively.
    pub fn resolve(&self, kind: &str) -> Arc<dyn BlockHandler> {
        self.handlers
            .get(&kind.to_ascii_uppercase())
            .cloned()
            .unwrap_or_else(|| self.unknown.clone())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(&kind.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Builds an immutable [`BlockRegistry`].
pub struct BlockRegistryBuilder {
    handlers: HashMap<String, Arc<dyn BlockHandler>>,
    log_sink: Option<Arc<dyn LogSink>>,
}

impl BlockRegistryBuilder {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            log_sink: None,
        }
    }

    /// Attaches the log sink every registered handler's metrics decorator
    /// writes through.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Registers a handler for `kind`. Overwrites any existing handler for
    /// the same kind (compared case-insensitively).
    pub fn register(mut self, kind: &str, handler: impl BlockHandler + 'static) -> Self {
        let wrapped = MetricsHandler {
            kind: kind.to_ascii_uppercase(),
            inner: handler,
            log_sink: self.log_sink.clone(),
        };
        self.handlers
            .insert(kind.to_ascii_uppercase(), Arc::new(wrapped));
        self
    }

    pub fn build(self) -> BlockRegistry {
        let unknown = MetricsHandler {
            kind: "UNKNOWN".to_string(),
            inner: UnknownHandler,
            log_sink: self.log_sink.clone(),
        };
        BlockRegistry {
            handlers: self.handlers,
            unknown: Arc::new(unknown),
        }
    }
}

impl Default for BlockRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
