use nebula_core::UserId;
use nebula_llm_provider::ToolSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkingMode {
    Fast,
    Deliberate,
    Collaborative,
}

impl ThinkingMode {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "deliberate" => ThinkingMode::Deliberate,
            "collaborative" => ThinkingMode::Collaborative,
            _ => ThinkingMode::Fast,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReasonRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub provider: String,
    pub model: String,
    pub tools: Vec<ToolSpec>,
    pub max_steps: u32,
    pub thinking_mode: ThinkingMode,
    pub session_id: String,
    pub user_id: UserId,
}

/// One step of the reasoning trace, carrying its own confidence so a
/// failing step doesn't need to abort the run.
#[derive(Debug, Clone)]
pub struct ReasonStep {
    pub description: String,
    pub confidence: f64,
}

impl ReasonStep {
    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ResolvedToolCall {
    pub name: String,
    pub parameters: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReasonOutcome {
    pub text: String,
    pub steps: Vec<ReasonStep>,
    pub tool_calls: Vec<ResolvedToolCall>,
    pub confidence: f64,
    pub path: Vec<&'static str>,
}
