use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nebula_core::id::{ExecutionId, NodeId, UserId};
use nebula_plugin_protocol::ContentBlock;
use nebula_ports::security::{SecurityCheckRequest, SecurityValidator};
use nebula_sandbox::{ToolServerKey, ToolServerSupervisor};
use nebula_workflow::NodeDefinition;
use serde::Deserialize;
use serde_json::Value;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;
use crate::handlers::blockchain::BlockchainProvider;

const DEFAULT_TIMEOUT_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub temperature: Option<f64>,
    #[serde(rename = "maxTokens")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,
    #[serde(rename = "userPrompt")]
    pub user_prompt: String,
    #[serde(rename = "maxSteps", default = "default_max_steps")]
    pub max_steps: u32,
    #[serde(rename = "thinkingMode", default = "default_thinking_mode")]
    pub thinking_mode: String,
}

fn default_max_steps() -> u32 {
    5
}

fn default_thinking_mode() -> String {
    "fast".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedToolSpec {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub config: Option<Value>,
    pub enabled: Option<bool>,
}

impl SelectedToolSpec {
    fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionSpec {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(rename = "timeoutMs")]
    pub timeout_ms: Option<u64>,
    #[serde(rename = "requireApproval", default)]
    pub require_approval: bool,
    #[serde(rename = "saveThinking", default)]
    pub save_thinking: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentBlockConfig {
    pub provider: ProviderSpec,
    pub agent: AgentSpec,
    #[serde(rename = "selectedTools", default)]
    pub selected_tools: Vec<SelectedToolSpec>,
    pub execution: ExecutionSpec,
}

/// Parses the agent config, accepting either `{provider, agent, ...}`
/// directly, or that shape nested under `data` or `data.config`.
fn parse_agent_config(raw: &Value) -> Result<AgentBlockConfig, BlockError> {
    let candidates = [raw, raw.get("data").unwrap_or(&Value::Null), raw
        .get("data")
        .and_then(|d| d.get("config"))
        .unwrap_or(&Value::Null)];

    for candidate in candidates {
        if candidate.is_null() {
            continue;
        }
        if let Ok(parsed) = serde_json::from_value::<AgentBlockConfig>(candidate.clone()) {
            return Ok(parsed);
        }
    }
    Err(BlockError::Validation(
        "ai_agent: config does not match either the `data` or `data.config` shape".into(),
    ))
}

/// One reasoning run, as the reasoning engine (C6) returns it.
#[derive(Debug, Clone)]
pub struct ReasonOutcome {
    pub text: String,
    pub steps: Vec<String>,
    pub tool_calls: Vec<Value>,
    pub confidence: f64,
}

/// A tool's callable implementation, as resolved for one execution: takes
/// the model's chosen arguments and resolves to either a JSON result or a
/// human-readable error. Structurally identical to the reasoning engine's
/// own tool-invoke type so a [`ToolDescriptor`] can cross into a
/// `nebula_llm_provider::ToolSpec` by direct assignment.
pub type ToolInvoke =
    Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<Value, String>> + Send>> + Send + Sync>;

/// One tool made available to a reasoning run, already bound to whatever
/// backend (MCP server, blockchain provider, ...) actually executes it.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameter_schema: Value,
    pub invoke: ToolInvoke,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameter_schema", &self.parameter_schema)
            .finish_non_exhaustive()
    }
}

/// What the AI-agent handler asks the reasoning engine to do.
#[derive(Debug, Clone)]
pub struct ReasonRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub tools: Vec<ToolDescriptor>,
    pub max_steps: u32,
    pub thinking_mode: String,
    pub user_id: UserId,
    pub execution_id: ExecutionId,
    pub node_id: NodeId,
    pub provider: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Narrow interface onto the reasoning engine (C6), so this crate doesn't
/// need to depend on it directly.
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn reason(&self, request: ReasonRequest) -> Result<ReasonOutcome, BlockError>;
}

/// Parses the agent block config, screens it through the security
/// validator, and invokes the reasoning engine under a hard deadline.
pub struct AiAgentHandler {
    reasoner: Arc<dyn Reasoner>,
    security: Arc<dyn SecurityValidator>,
    tool_servers: Arc<ToolServerSupervisor>,
    blockchain: Arc<dyn BlockchainProvider>,
}

impl AiAgentHandler {
    pub fn new(
        reasoner: Arc<dyn Reasoner>,
        security: Arc<dyn SecurityValidator>,
        tool_servers: Arc<ToolServerSupervisor>,
        blockchain: Arc<dyn BlockchainProvider>,
    ) -> Self {
        Self {
            reasoner,
            security,
            tool_servers,
            blockchain,
        }
    }

    /// Binds one selected tool to whatever backend its `type` names. `mcp`
    /// tools call out to the C4 tool-server supervisor under the executing
    /// user; `blockchain` tools call the configured chain provider; anything
    /// else has no executor and always errors when invoked.
    fn build_tool_descriptor(&self, tool: &SelectedToolSpec, user_id: UserId) -> ToolDescriptor {
        let description = tool.name.clone();
        let invoke: ToolInvoke = match tool.kind.as_str() {
            "mcp" => {
                let servers = self.tool_servers.clone();
                let server_name = tool
                    .config
                    .as_ref()
                    .and_then(|c| c.get("server"))
                    .and_then(Value::as_str)
                    .unwrap_or(&tool.name)
                    .to_string();
                let tool_name = tool.name.clone();
                Arc::new(move |params: Value| {
                    let servers = servers.clone();
                    let key = ToolServerKey::new(user_id, server_name.clone());
                    let tool_name = tool_name.clone();
                    Box::pin(async move {
                        let result = servers
                            .invoke(&key, &tool_name, params)
                            .await
                            .map_err(|err| err.to_string())?;
                        if result.is_error {
                            return Err(content_blocks_to_text(&result.content));
                        }
                        Ok(content_blocks_to_value(result.content))
                    }) as Pin<Box<dyn Future<Output = Result<Value, String>> + Send>>
                })
            }
            "blockchain" => {
                let provider = self.blockchain.clone();
                let operation = blockchain_operation(tool);
                let static_config = tool.config.clone();
                Arc::new(move |params: Value| {
                    let provider = provider.clone();
                    let operation = operation;
                    let config = merge_tool_config(static_config.as_ref(), &params);
                    Box::pin(async move {
                        let result = match operation {
                            BlockchainOperation::Liquidity => provider.liquidity_position(&config).await,
                            BlockchainOperation::Yield => provider.yield_position(&config).await,
                            BlockchainOperation::Portfolio => provider.portfolio_balance(&config).await,
                        };
                        result.map_err(|err| err.to_string())
                    }) as Pin<Box<dyn Future<Output = Result<Value, String>> + Send>>
                })
            }
            _ => {
                let name = tool.name.clone();
                Arc::new(move |_params: Value| {
                    let name = name.clone();
                    Box::pin(async move {
                        Err(format!("no built-in executor is configured for tool '{name}'"))
                    }) as Pin<Box<dyn Future<Output = Result<Value, String>> + Send>>
                })
            }
        };

        ToolDescriptor {
            name: tool.name.clone(),
            description,
            parameter_schema: serde_json::json!({}),
            invoke,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BlockchainOperation {
    Liquidity,
    Yield,
    Portfolio,
}

fn blockchain_operation(tool: &SelectedToolSpec) -> BlockchainOperation {
    let hint = tool
        .config
        .as_ref()
        .and_then(|c| c.get("operation"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| tool.name.to_ascii_lowercase());
    if hint.contains("yield") {
        BlockchainOperation::Yield
    } else if hint.contains("portfolio") || hint.contains("balance") {
        BlockchainOperation::Portfolio
    } else {
        BlockchainOperation::Liquidity
    }
}

/// Merges the tool's static config with the model-supplied arguments,
/// letting the model's values win on key collisions.
fn merge_tool_config(static_config: Option<&Value>, params: &Value) -> Value {
    match (static_config, params) {
        (Some(Value::Object(base)), Value::Object(overrides)) => {
            let mut merged = base.clone();
            for (key, value) in overrides {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        (_, Value::Object(_)) => params.clone(),
        (Some(config), _) => config.clone(),
        (None, other) => other.clone(),
    }
}

fn content_blocks_to_value(blocks: Vec<ContentBlock>) -> Value {
    let mut values: Vec<Value> = blocks
        .into_iter()
        .map(|block| match block {
            ContentBlock::Text { text } => Value::String(text),
            ContentBlock::Image { data, mime_type } => {
                serde_json::json!({ "mimeType": mime_type, "data": data })
            }
        })
        .collect();
    match values.len() {
        0 => Value::Null,
        1 => values.remove(0),
        _ => Value::Array(values),
    }
}

fn content_blocks_to_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text } => text.clone(),
            ContentBlock::Image { mime_type, .. } => format!("<{mime_type} image>"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl BlockHandler for AiAgentHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let raw = ctx.effective_inputs(&node.config)?;
        let config = parse_agent_config(&raw)?;

        let enabled_tools: Vec<&SelectedToolSpec> = config
            .selected_tools
            .iter()
            .filter(|t| t.is_enabled())
            .collect();
        let tool_ids: Vec<String> = enabled_tools.iter().map(|t| t.id.clone()).collect();
        let tools: Vec<ToolDescriptor> = enabled_tools
            .iter()
            .map(|t| self.build_tool_descriptor(t, ctx.user_id))
            .collect();

        let check = self
            .security
            .validate(
                SecurityCheckRequest {
                    prompt: config.agent.user_prompt.clone(),
                    system_prompt: Some(config.agent.system_prompt.clone()),
                    tool_ids,
                    user_permissions: Vec::new(),
                },
                ctx.user_id,
                ctx.execution_id,
            )
            .await?;
        if !check.valid {
            return Err(BlockError::SecurityViolation(check.violations));
        }

        let timeout_ms = config.execution.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        let request = ReasonRequest {
            prompt: config.agent.user_prompt.clone(),
            system_prompt: Some(config.agent.system_prompt.clone()),
            tools,
            max_steps: config.agent.max_steps,
            thinking_mode: config.agent.thinking_mode.clone(),
            user_id: ctx.user_id,
            execution_id: ctx.execution_id,
            node_id: ctx.node_id,
            provider: config.provider.kind.clone(),
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
        };

        let outcome = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.reasoner.reason(request),
        )
        .await
        .map_err(|_| BlockError::DeadlineExceeded)??;

        Ok(normalize_output(&outcome))
    }
}

/// `result`, `response`, `data`, `output`, `text`, `content`, `summary` all
/// carry the same string so template authors have stable accessors
/// regardless of which alias they reach for.
fn normalize_output(outcome: &ReasonOutcome) -> Value {
    let mut out = serde_json::Map::new();
    for key in ["result", "response", "data", "output", "text", "content", "summary"] {
        out.insert(key.to_string(), Value::String(outcome.text.clone()));
    }
    out.insert("confidence".into(), serde_json::json!(outcome.confidence));
    out.insert("steps".into(), serde_json::json!(outcome.steps));
    out.insert("toolCalls".into(), serde_json::json!(outcome.tool_calls));
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::id::{ActionId, ExecutionId, NodeId, WorkflowId};
    use nebula_ports::error::PortsError;
    use nebula_ports::security::SecurityCheckResult;
    use serde_json::json;

    struct StubReasoner;

    #[async_trait]
    impl Reasoner for StubReasoner {
        async fn reason(&self, request: ReasonRequest) -> Result<ReasonOutcome, BlockError> {
            Ok(ReasonOutcome {
                text: format!("answered: {}", request.prompt),
                steps: vec!["planned".into(), "executed".into()],
                tool_calls: vec![],
                confidence: 0.8,
            })
        }
    }

    struct AllowAll;

    #[async_trait]
    impl SecurityValidator for AllowAll {
        async fn validate(
            &self,
            _request: SecurityCheckRequest,
            _user_id: UserId,
            _execution_id: ExecutionId,
        ) -> Result<SecurityCheckResult, PortsError> {
            Ok(SecurityCheckResult::ok())
        }
    }

    struct DenyAll;

    #[async_trait]
    impl SecurityValidator for DenyAll {
        async fn validate(
            &self,
            _request: SecurityCheckRequest,
            _user_id: UserId,
            _execution_id: ExecutionId,
        ) -> Result<SecurityCheckResult, PortsError> {
            Ok(SecurityCheckResult::rejected(vec![
                nebula_ports::security::SecurityViolation::PromptInjection,
            ]))
        }
    }

    fn agent_config_json() -> Value {
        json!({
            "provider": {"type": "openai", "model": "gpt-4"},
            "agent": {
                "name": "assistant",
                "systemPrompt": "be helpful",
                "userPrompt": "what is the eth price",
                "maxSteps": 3,
                "thinkingMode": "fast",
            },
            "selectedTools": [],
            "execution": {"mode": "sync", "timeoutMs": 1000},
        })
    }

    fn ctx() -> BlockContext {
        BlockContext::new(NodeId::v4(), ExecutionId::v4(), WorkflowId::v4(), UserId::v4())
    }

    fn handler(reasoner: Arc<dyn Reasoner>, security: Arc<dyn SecurityValidator>) -> AiAgentHandler {
        AiAgentHandler::new(
            reasoner,
            security,
            Arc::new(ToolServerSupervisor::new("nebula", "test")),
            Arc::new(crate::handlers::blockchain::UnavailableBlockchainProvider),
        )
    }

    #[tokio::test]
    async fn executes_and_normalizes_output() {
        let handler = handler(Arc::new(StubReasoner), Arc::new(AllowAll));
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4())
            .with_config(agent_config_json());
        let out = handler.execute(&node, &ctx()).await.unwrap();
        let expected_text = out["result"].clone();
        for key in ["response", "data", "output", "text", "content", "summary"] {
            assert_eq!(out[key], expected_text);
        }
    }

    #[tokio::test]
    async fn parses_nested_data_config_shape() {
        let handler = handler(Arc::new(StubReasoner), Arc::new(AllowAll));
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4())
            .with_config(json!({"data": {"config": agent_config_json()}}));
        let out = handler.execute(&node, &ctx()).await.unwrap();
        assert!(out["result"].as_str().unwrap().contains("eth price"));
    }

    #[tokio::test]
    async fn security_violation_aborts_execution() {
        let handler = handler(Arc::new(StubReasoner), Arc::new(DenyAll));
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4())
            .with_config(agent_config_json());
        let err = handler.execute(&node, &ctx()).await.unwrap_err();
        assert!(matches!(err, BlockError::SecurityViolation(_)));
    }

    #[tokio::test]
    async fn disabled_tools_are_excluded() {
        let mut config = agent_config_json();
        config["selectedTools"] = json!([
            {"id": "t1", "name": "tool one", "type": "builtin", "enabled": false},
        ]);
        let handler = handler(Arc::new(StubReasoner), Arc::new(AllowAll));
        let node = NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4()).with_config(config);
        let out = handler.execute(&node, &ctx()).await;
        assert!(out.is_ok());
    }

    #[tokio::test]
    async fn mcp_tool_invocation_surfaces_the_supervisor_error() {
        let config = SelectedToolSpec {
            id: "t1".to_string(),
            name: "lookup".to_string(),
            kind: "mcp".to_string(),
            config: None,
            enabled: None,
        };
        let handler = handler(Arc::new(StubReasoner), Arc::new(AllowAll));
        let descriptor = handler.build_tool_descriptor(&config, UserId::v4());
        let err = (descriptor.invoke)(json!({})).await.unwrap_err();
        assert!(err.contains("lookup") || !err.is_empty());
    }

    #[tokio::test]
    async fn blockchain_tool_invocation_uses_the_configured_provider() {
        let config = SelectedToolSpec {
            id: "t2".to_string(),
            name: "portfolio lookup".to_string(),
            kind: "blockchain".to_string(),
            config: Some(json!({"wallet": "0xabc"})),
            enabled: None,
        };
        let handler = handler(Arc::new(StubReasoner), Arc::new(AllowAll));
        let descriptor = handler.build_tool_descriptor(&config, UserId::v4());
        let err = (descriptor.invoke)(json!({})).await.unwrap_err();
        assert!(err.contains("not configured"));
    }

    #[tokio::test]
    async fn builtin_tool_invocation_has_no_executor() {
        let config = SelectedToolSpec {
            id: "t3".to_string(),
            name: "summarize".to_string(),
            kind: "builtin".to_string(),
            config: None,
            enabled: None,
        };
        let handler = handler(Arc::new(StubReasoner), Arc::new(AllowAll));
        let descriptor = handler.build_tool_descriptor(&config, UserId::v4());
        let err = (descriptor.invoke)(json!({})).await.unwrap_err();
        assert!(err.contains("summarize"));
    }

    #[test]
    fn malformed_config_is_rejected() {
        let err = parse_agent_config(&json!({"not": "an agent config"})).unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
    }
}
