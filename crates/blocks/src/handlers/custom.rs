use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Fixed resource caps applied to every custom-block run, regardless of
/// what the user-authored code asks for.
pub const MAX_CPU_TIME: Duration = Duration::from_secs(30);
const MAX_STDOUT_BYTES: usize = 64 * 1024;

/// A user-authored code record, looked up by id.
#[derive(Debug, Clone)]
pub struct CodeRecord {
    pub source: String,
    pub language: String,
}

/// Looks up user-authored custom-block code by id.
#[async_trait]
pub trait CodeStore: Send + Sync {
    async fn get(&self, code_id: &str) -> Result<CodeRecord, BlockError>;
}

/// Captured output of one sandboxed run.
#[derive(Debug, Clone, Default)]
pub struct CustomRunResult {
    pub stdout: String,
    pub value: Option<Value>,
}

/// Runs user-authored code within fixed resource caps: bounded CPU-time,
/// restricted globals, and structured stdout capture.
#[async_trait]
pub trait CodeSandbox: Send + Sync {
    async fn run(
        &self,
        source: &str,
        language: &str,
        input: &Value,
        cpu_time_cap: Duration,
    ) -> Result<CustomRunResult, BlockError>;
}

/// Fetches a user-authored code record and executes it in a sandbox.
pub struct CustomBlockHandler {
    code_store: Arc<dyn CodeStore>,
    sandbox: Arc<dyn CodeSandbox>,
}

impl CustomBlockHandler {
    pub fn new(code_store: Arc<dyn CodeStore>, sandbox: Arc<dyn CodeSandbox>) -> Self {
        Self { code_store, sandbox }
    }
}

#[async_trait]
impl BlockHandler for CustomBlockHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;
        let code_id = config
            .get("codeId")
            .and_then(Value::as_str)
            .ok_or_else(|| BlockError::Validation("custom: missing `codeId`".into()))?;

        let record = self.code_store.get(code_id).await?;

        let run = tokio::time::timeout(
            MAX_CPU_TIME,
            self.sandbox
                .run(&record.source, &record.language, &config, MAX_CPU_TIME),
        )
        .await
        .map_err(|_| BlockError::DeadlineExceeded)??;

        let stdout = if run.stdout.len() > MAX_STDOUT_BYTES {
            run.stdout[..MAX_STDOUT_BYTES].to_string()
        } else {
            run.stdout
        };

        Ok(serde_json::json!({
            "stdout": stdout,
            "result": run.value.unwrap_or(Value::Null),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::id::{ActionId, ExecutionId, NodeId, UserId, WorkflowId};
    use serde_json::json;

    struct StubCodeStore;

    #[async_trait]
    impl CodeStore for StubCodeStore {
        async fn get(&self, code_id: &str) -> Result<CodeRecord, BlockError> {
            if code_id == "missing" {
                return Err(BlockError::Validation("no such code record".into()));
            }
            Ok(CodeRecord {
                source: "return input.x + 1".into(),
                language: "js".into(),
            })
        }
    }

    struct StubSandbox;

    #[async_trait]
    impl CodeSandbox for StubSandbox {
        async fn run(
            &self,
            _source: &str,
            _language: &str,
            input: &Value,
            _cpu_time_cap: Duration,
        ) -> Result<CustomRunResult, BlockError> {
            let x = input.get("x").and_then(Value::as_i64).unwrap_or(0);
            Ok(CustomRunResult {
                stdout: "ran\n".into(),
                value: Some(json!(x + 1)),
            })
        }
    }

    fn handler() -> CustomBlockHandler {
        CustomBlockHandler::new(Arc::new(StubCodeStore), Arc::new(StubSandbox))
    }

    fn ctx() -> BlockContext {
        BlockContext::new(NodeId::v4(), ExecutionId::v4(), WorkflowId::v4(), UserId::v4())
    }

    #[tokio::test]
    async fn runs_code_and_returns_result() {
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4())
            .with_config(json!({"codeId": "abc", "x": 41}));
        let out = handler().execute(&node, &ctx()).await.unwrap();
        assert_eq!(out["result"], json!(42));
        assert_eq!(out["stdout"], json!("ran\n"));
    }

    #[tokio::test]
    async fn missing_code_id_is_rejected() {
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4());
        let err = handler().execute(&node, &ctx()).await.unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_code_record_is_rejected() {
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4())
            .with_config(json!({"codeId": "missing"}));
        let err = handler().execute(&node, &ctx()).await.unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
    }
}
