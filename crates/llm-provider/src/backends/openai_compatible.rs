use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::provider::Provider;
use crate::request::{GenerateRequest, GenerateResponse, ToolCall, Usage};

/// Backend for any OpenAI-compatible `/chat/completions` API: OpenAI,
/// OpenRouter, and local Ollama all speak (close enough to) this shape.
pub struct OpenAiCompatibleProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn tools_payload(request: &GenerateRequest) -> Option<Value> {
        if request.tools.is_empty() {
            return None;
        }
        Some(Value::Array(
            request
                .tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.parameter_schema,
                        }
                    })
                })
                .collect(),
        ))
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let mut messages = Vec::new();
        if let Some(system) = &request.system_prompt {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if let Some(tools) = Self::tools_payload(&request) {
            body["tools"] = tools;
        }

        let client = Client::new();
        let mut builder = client.post(format!("{}/chat/completions", self.base_url)).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| ProviderError::Http {
                provider: self.name.clone(),
                message: err.to_string(),
            })?;

        let body: Value = response.json().await.map_err(|err| ProviderError::Http {
            provider: self.name.clone(),
            message: err.to_string(),
        })?;

        let choice = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .ok_or_else(|| ProviderError::MalformedResponse {
                provider: self.name.clone(),
                message: "missing choices[0]".to_string(),
            })?;
        let message = &choice["message"];
        let text = message
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let tool_calls = message
            .get("tool_calls")
            .and_then(Value::as_array)
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| {
                        let function = call.get("function")?;
                        let name = function.get("name")?.as_str()?.to_string();
                        let arguments = function
                            .get("arguments")
                            .and_then(Value::as_str)
                            .and_then(|raw| serde_json::from_str(raw).ok())
                            .unwrap_or(Value::Null);
                        Some(ToolCall {
                            name,
                            arguments,
                            result: None,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let usage = body.get("usage").map(|usage| Usage {
            prompt_tokens: usage.get("prompt_tokens").and_then(Value::as_u64).unwrap_or(0) as u32,
            completion_tokens: usage
                .get("completion_tokens")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32,
        });

        Ok(GenerateResponse {
            text,
            steps: Vec::new(),
            tool_calls,
            usage,
        })
    }

    async fn healthy(&self) -> bool {
        let client = Client::new();
        let mut builder = client.get(format!("{}/models", self.base_url));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        matches!(builder.send().await, Ok(response) if response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_parses_text_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "hello there"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5}
            })))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("openai", server.uri(), "gpt-test");
        let response = provider.generate(GenerateRequest::new("hi")).await.unwrap();
        assert_eq!(response.text, "hello there");
        assert_eq!(response.usage.unwrap().prompt_tokens, 10);
    }

    #[tokio::test]
    async fn healthy_reflects_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("openai", server.uri(), "gpt-test");
        assert!(provider.healthy().await);
    }

    #[tokio::test]
    async fn unhealthy_when_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("openai", server.uri(), "gpt-test");
        assert!(!provider.healthy().await);
    }
}
