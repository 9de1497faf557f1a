//! Reasoning engine (C6): plan, select tools, execute, optionally reflect,
//! then persist a transcript — all driven by a [`nebula_llm_provider::ProviderPool`].
//!
//! [`BlocksReasoner`] adapts this crate's richer request/outcome shapes to
//! the narrow [`nebula_blocks::Reasoner`] port the AI-agent block handler
//! depends on.

mod confidence;
mod engine;
mod tool_select;
mod types;

use std::sync::Arc;

use async_trait::async_trait;
use nebula_blocks::{BlockError, ReasonOutcome as BlockReasonOutcome, ReasonRequest as BlockReasonRequest, Reasoner};
use nebula_llm_provider::{ProviderPool, ToolSpec};
use nebula_ports::observability::TranscriptStore;
use nebula_ports::subscription::SubscriptionPort;

pub use confidence::{ConfidenceScorer, HeuristicConfidence};
pub use engine::ReasoningEngine;
pub use tool_select::{parse_selected_tools, SelectedTool};
pub use types::{ReasonOutcome, ReasonRequest, ReasonStep, ResolvedToolCall, ThinkingMode};

/// Wires [`ReasoningEngine`] up as a [`nebula_blocks::Reasoner`], translating
/// between the block handler's port-boundary types and this crate's own.
pub struct BlocksReasoner {
    engine: ReasoningEngine,
}

impl BlocksReasoner {
    pub fn new(
        providers: Arc<ProviderPool>,
        scorer: Arc<dyn ConfidenceScorer>,
        subscription: Arc<dyn SubscriptionPort>,
        transcripts: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            engine: ReasoningEngine::new(providers, scorer, subscription, transcripts),
        }
    }

    pub fn with_heuristic_confidence(
        providers: Arc<ProviderPool>,
        subscription: Arc<dyn SubscriptionPort>,
        transcripts: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self::new(providers, Arc::new(HeuristicConfidence), subscription, transcripts)
    }
}

#[async_trait]
impl Reasoner for BlocksReasoner {
    async fn reason(&self, request: BlockReasonRequest) -> Result<BlockReasonOutcome, BlockError> {
        let tools = request
            .tools
            .iter()
            .map(|tool| ToolSpec {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameter_schema: tool.parameter_schema.clone(),
                invoke: tool.invoke.clone(),
            })
            .collect();

        let internal_request = ReasonRequest {
            prompt: request.prompt.clone(),
            system_prompt: request.system_prompt.clone(),
            provider: request.provider.clone(),
            model: request.model.clone(),
            tools,
            max_steps: request.max_steps,
            thinking_mode: ThinkingMode::parse(&request.thinking_mode),
            session_id: request.node_id.to_string(),
            user_id: request.user_id,
        };

        let outcome = self
            .engine
            .reason(internal_request, request.execution_id, request.node_id)
            .await;

        Ok(BlockReasonOutcome {
            text: outcome.text,
            steps: outcome.steps.into_iter().map(|s| s.description).collect(),
            tool_calls: outcome
                .tool_calls
                .into_iter()
                .map(|call| serde_json::to_value(call).unwrap_or(serde_json::Value::Null))
                .collect(),
            confidence: outcome.confidence,
        })
    }
}
