use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::provider::Provider;
use crate::request::{GenerateRequest, GenerateResponse, ToolCall};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Backend for Anthropic's `/v1/messages` API, whose request/response shape
/// differs from the OpenAI family: system prompt is a top-level field, and
/// tool use comes back as typed content blocks rather than a `tool_calls`
/// array.
pub struct AnthropicProvider {
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{"role": "user", "content": request.prompt}],
        });
        if let Some(system) = &request.system_prompt {
            body["system"] = Value::String(system.clone());
        }
        if !request.tools.is_empty() {
            body["tools"] = Value::Array(
                request
                    .tools
                    .iter()
                    .map(|tool| {
                        json!({
                            "name": tool.name,
                            "description": tool.description,
                            "input_schema": tool.parameter_schema,
                        })
                    })
                    .collect(),
            );
        }

        let client = Client::new();
        let response = client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| ProviderError::Http {
                provider: self.name().to_string(),
                message: err.to_string(),
            })?;

        let body: Value = response.json().await.map_err(|err| ProviderError::Http {
            provider: self.name().to_string(),
            message: err.to_string(),
        })?;

        let content = body
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::MalformedResponse {
                provider: self.name().to_string(),
                message: "missing content array".to_string(),
            })?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for block in content {
            match block.get("type").and_then(Value::as_str) {
                Some("text") => {
                    if let Some(part) = block.get("text").and_then(Value::as_str) {
                        text.push_str(part);
                    }
                }
                Some("tool_use") => {
                    if let Some(name) = block.get("name").and_then(Value::as_str) {
                        tool_calls.push(ToolCall {
                            name: name.to_string(),
                            arguments: block.get("input").cloned().unwrap_or(Value::Null),
                            result: None,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(GenerateResponse {
            text,
            steps: Vec::new(),
            tool_calls,
            usage: None,
        })
    }

    async fn healthy(&self) -> bool {
        let client = Client::new();
        let response = client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": self.model,
                "max_tokens": 1,
                "messages": [{"role": "user", "content": "ping"}],
            }))
            .send()
            .await;
        matches!(response, Ok(response) if response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_concatenates_text_blocks_and_collects_tool_use() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    {"type": "text", "text": "the weather is "},
                    {"type": "text", "text": "sunny"},
                    {"type": "tool_use", "name": "get_weather", "input": {"city": "nyc"}},
                ]
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new(server.uri(), "key", "claude-test");
        let response = provider.generate(GenerateRequest::new("weather?")).await.unwrap();
        assert_eq!(response.text, "the weather is sunny");
        assert_eq!(response.tool_calls[0].name, "get_weather");
    }
}
