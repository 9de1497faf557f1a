use std::sync::Arc;
use std::time::Instant;

use nebula_core::{ExecutionId, NodeId};
use nebula_llm_provider::{GenerateRequest, ProviderError, ProviderPool, ToolCall};
use nebula_ports::observability::{AgentTranscript, ThinkingStep, TranscriptStore};
use nebula_ports::subscription::SubscriptionPort;

use crate::confidence::ConfidenceScorer;
use crate::tool_select::parse_selected_tools;
use crate::types::{ReasonOutcome, ReasonRequest, ReasonStep, ResolvedToolCall, ThinkingMode};

const PLAN_TEMPERATURE: f64 = 0.3;
const PLAN_MAX_TOKENS: u32 = 500;
const SELECT_TEMPERATURE: f64 = 0.2;

/// Plan → select-tools → execute → reflect → persist over a provider pool.
pub struct ReasoningEngine {
    providers: Arc<ProviderPool>,
    scorer: Arc<dyn ConfidenceScorer>,
    subscription: Arc<dyn SubscriptionPort>,
    transcripts: Arc<dyn TranscriptStore>,
}

impl ReasoningEngine {
    pub fn new(
        providers: Arc<ProviderPool>,
        scorer: Arc<dyn ConfidenceScorer>,
        subscription: Arc<dyn SubscriptionPort>,
        transcripts: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            providers,
            scorer,
            subscription,
            transcripts,
        }
    }

    /// Runs the full plan/select/execute/reflect/persist pipeline. A failing
    /// stage never aborts the run: it contributes a zero-confidence step and
    /// the engine proceeds with whatever it has.
    pub async fn reason(
        &self,
        request: ReasonRequest,
        execution_id: ExecutionId,
        node_id: NodeId,
    ) -> ReasonOutcome {
        let started_at = chrono::Utc::now();
        let started = Instant::now();
        let mut steps = Vec::new();
        let mut path = Vec::new();

        let tool_names: Vec<String> = request.tools.iter().map(|t| t.name.clone()).collect();

        let plan = self.plan(&request, &tool_names, &mut steps, &mut path).await;
        let selected = self
            .select_tools(&request, plan.as_deref(), &tool_names, &mut steps, &mut path)
            .await;

        let (text, tool_calls) = self
            .execute(&request, plan.as_deref(), &selected, &mut steps, &mut path)
            .await;

        if request.thinking_mode == ThinkingMode::Deliberate
            && self
                .subscription
                .can_use_deliberate(request.user_id)
                .await
                .unwrap_or(false)
        {
            self.reflect(&text, &tool_calls, &mut steps, &mut path);
        }

        let confidence = if steps.is_empty() {
            0.0
        } else {
            steps.iter().map(|s| s.confidence).sum::<f64>() / steps.len() as f64
        };

        let outcome = ReasonOutcome {
            text,
            steps,
            tool_calls,
            confidence,
            path,
        };

        self.persist(
            &request,
            execution_id,
            node_id,
            started_at,
            started.elapsed().as_millis() as u64,
            &outcome,
        )
        .await;

        outcome
    }

    async fn plan(
        &self,
        request: &ReasonRequest,
        tool_names: &[String],
        steps: &mut Vec<ReasonStep>,
        path: &mut Vec<&'static str>,
    ) -> Option<String> {
        path.push("plan");
        let tools_hint = if tool_names.is_empty() {
            "no tools are available".to_string()
        } else {
            format!("available tools: {}", tool_names.join(", "))
        };
        let prompt = format!(
            "Produce a numbered 3-5 step plan for the following task ({tools_hint}).\n\nTask: {}",
            request.prompt
        );

        let generate = GenerateRequest::new(prompt)
            .with_temperature(PLAN_TEMPERATURE)
            .with_max_tokens(PLAN_MAX_TOKENS);
        let generate = match &request.system_prompt {
            Some(sys) => generate.with_system_prompt(sys.clone()),
            None => generate,
        };

        match self.providers.generate(&request.provider, generate).await {
            Ok(response) => {
                let confidence = self.scorer.score_plan(&response.text);
                steps.push(ReasonStep {
                    description: format!("plan: {}", response.text),
                    confidence,
                });
                Some(response.text)
            }
            Err(err) => {
                steps.push(ReasonStep::failed(format!("plan step failed: {err}")));
                None
            }
        }
    }

    async fn select_tools(
        &self,
        request: &ReasonRequest,
        plan_text: Option<&str>,
        tool_names: &[String],
        steps: &mut Vec<ReasonStep>,
        path: &mut Vec<&'static str>,
    ) -> Vec<crate::tool_select::SelectedTool> {
        path.push("select_tools");
        if tool_names.is_empty() {
            steps.push(ReasonStep {
                description: "no tools available to select".to_string(),
                confidence: 1.0,
            });
            return Vec::new();
        }

        let prompt = format!(
            "{}Given the task \"{}\" and the available tools [{}], respond with exactly one line: \
             \"Selected tools: [name with param: value, ...]\".",
            plan_text.map(|p| format!("Plan:\n{p}\n\n")).unwrap_or_default(),
            request.prompt,
            tool_names.join(", "),
        );
        let generate = GenerateRequest::new(prompt).with_temperature(SELECT_TEMPERATURE);

        match self.providers.generate(&request.provider, generate).await {
            Ok(response) => {
                let selected = parse_selected_tools(&response.text, tool_names);
                let confidence = if selected.is_empty() { 0.0 } else { 1.0 };
                steps.push(ReasonStep {
                    description: format!("selected {} tool(s)", selected.len()),
                    confidence,
                });
                selected
            }
            Err(err) => {
                steps.push(ReasonStep::failed(format!("tool selection failed: {err}")));
                Vec::new()
            }
        }
    }

    async fn execute(
        &self,
        request: &ReasonRequest,
        plan_text: Option<&str>,
        selected: &[crate::tool_select::SelectedTool],
        steps: &mut Vec<ReasonStep>,
        path: &mut Vec<&'static str>,
    ) -> (String, Vec<ResolvedToolCall>) {
        path.push("execute");

        let mut prompt = request.prompt.clone();
        if let Some(plan) = plan_text {
            prompt = format!("{plan}\n\nNow carry out the plan for: {}", request.prompt);
        }

        let generate = GenerateRequest::new(prompt)
            .with_tools(request.tools.clone())
            .with_max_steps(request.max_steps);
        let generate = match &request.system_prompt {
            Some(sys) => generate.with_system_prompt(sys.clone()),
            None => generate,
        };

        let (text, provider_calls) = match self.providers.generate(&request.provider, generate).await {
            Ok(response) => {
                let confidence = self
                    .scorer
                    .score_execution(&response.text, response.tool_calls.len());
                steps.push(ReasonStep {
                    description: "execution completed".to_string(),
                    confidence,
                });
                (response.text, response.tool_calls)
            }
            Err(err) => {
                steps.push(ReasonStep::failed(format!("execution step failed: {err}")));
                (String::new(), Vec::new())
            }
        };

        let mut resolved: Vec<ResolvedToolCall> = provider_calls
            .into_iter()
            .map(|call: ToolCall| ResolvedToolCall {
                name: call.name,
                parameters: call.arguments,
                result: call.result,
                error: None,
            })
            .collect();

        for tool in selected {
            let parameters = serde_json::to_value(&tool.parameters).unwrap_or_default();
            let spec = request.tools.iter().find(|spec| spec.name == tool.name);
            let (result, error) = match spec {
                Some(spec) => match (spec.invoke)(parameters.clone()).await {
                    Ok(value) => (Some(value), None),
                    Err(err) => (None, Some(err)),
                },
                None => (None, Some(format!("tool '{}' is not available", tool.name))),
            };
            resolved.push(ResolvedToolCall {
                name: tool.name.clone(),
                parameters,
                result,
                error,
            });
        }

        (text, resolved)
    }

    fn reflect(
        &self,
        text: &str,
        tool_calls: &[ResolvedToolCall],
        steps: &mut Vec<ReasonStep>,
        path: &mut Vec<&'static str>,
    ) {
        path.push("reflect");
        let confidence = self.scorer.score_execution(text, tool_calls.len());
        let critique = if confidence >= 0.66 {
            "execution looks complete and consistent with the plan".to_string()
        } else {
            "execution is thin or shows signs of error; consider a retry".to_string()
        };
        steps.push(ReasonStep {
            description: format!("reflection: {critique}"),
            confidence,
        });
    }

    async fn persist(
        &self,
        request: &ReasonRequest,
        execution_id: ExecutionId,
        node_id: NodeId,
        started_at: chrono::DateTime<chrono::Utc>,
        execution_ms: u64,
        outcome: &ReasonOutcome,
    ) {
        let thinking_steps = outcome
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| ThinkingStep {
                step: index as u32 + 1,
                description: step.description.clone(),
                confidence: step.confidence,
            })
            .collect();

        let transcript = AgentTranscript {
            execution_id,
            node_id,
            provider: request.provider.clone(),
            model: request.model.clone(),
            user_prompt: request.prompt.clone(),
            system_prompt: request.system_prompt.clone(),
            thinking_steps,
            status: "completed".to_string(),
            started_at,
            completed_at: Some(chrono::Utc::now()),
            result: Some(outcome.text.clone()),
            error: None,
            total_tokens: None,
            execution_ms,
        };

        if let Err(err) = self.transcripts.save(transcript).await {
            tracing::warn!(error = %err, "failed to persist agent transcript");
        }
    }
}
