use std::time::Duration;

use async_trait::async_trait;
use nebula_workflow::NodeDefinition;
use reqwest::Client;
use serde_json::Value;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// One row of the legacy price-monitor data-source table.
struct PriceSource {
    asset: &'static str,
    url_template: &'static str,
    data_path: &'static str,
}

const PRICE_SOURCES: &[PriceSource] = &[
    PriceSource {
        asset: "ETH",
        url_template: "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=usd",
        data_path: "ethereum.usd",
    },
    PriceSource {
        asset: "BTC",
        url_template: "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd",
        data_path: "bitcoin.usd",
    },
    PriceSource {
        asset: "USDC",
        url_template: "https://api.coingecko.com/api/v3/simple/price?ids=usd-coin&vs_currencies=usd",
        data_path: "usd-coin.usd",
    },
    PriceSource {
        asset: "USDT",
        url_template: "https://api.coingecko.com/api/v3/simple/price?ids=tether&vs_currencies=usd",
        data_path: "tether.usd",
    },
    PriceSource {
        asset: "SEI",
        url_template: "https://api.coingecko.com/api/v3/simple/price?ids=sei-network&vs_currencies=usd",
        data_path: "sei-network.usd",
    },
];

fn price_source(asset: &str) -> Option<&'static PriceSource> {
    PRICE_SOURCES
        .iter()
        .find(|s| s.asset.eq_ignore_ascii_case(asset))
}

/// `config.retry`: attempt count and the exponential back-off parameters.
struct RetryPolicy {
    max_attempts: u32,
    base: Duration,
    factor: f64,
    cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
            factor: 2.0,
            cap: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    fn from_config(config: &Value) -> Self {
        let mut policy = Self::default();
        if let Some(retry) = config.get("retry") {
            if let Some(n) = retry.get("maxAttempts").and_then(Value::as_u64) {
                policy.max_attempts = n as u32;
            }
            if let Some(ms) = retry.get("baseMs").and_then(Value::as_u64) {
                policy.base = Duration::from_millis(ms);
            }
            if let Some(ms) = retry.get("capMs").and_then(Value::as_u64) {
                policy.cap = Duration::from_millis(ms);
            }
        }
        policy
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let scaled = self.base.as_secs_f64() * self.factor.powi(attempt as i32);
        let capped = scaled.min(self.cap.as_secs_f64());
        let jitter = 1.0 - rand::random::<f64>() * 0.10;
        Duration::from_secs_f64(capped * jitter)
    }
}

enum ResponseFormat {
    Json,
    Text,
    Xml,
    Html,
    Binary,
}

impl ResponseFormat {
    fn from_config(config: &Value) -> Self {
        match config.get("responseFormat").and_then(Value::as_str) {
            Some("text") => ResponseFormat::Text,
            Some("xml") => ResponseFormat::Xml,
            Some("html") => ResponseFormat::Html,
            Some("binary") => ResponseFormat::Binary,
            _ => ResponseFormat::Json,
        }
    }
}

/// HTTP request block: URL/method/headers/body templating, four auth
/// shapes, retrying exponential back-off, an SSL-verification override,
/// response-format selection, and a legacy price-monitor fallback when
/// `config.asset` is present but `config.url` is absent.
pub struct HttpRequestHandler;

#[async_trait]
impl BlockHandler for HttpRequestHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;

        let (url, data_path) = resolve_url(&config)?;
        let method = config
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET")
            .to_ascii_uppercase();
        let verify_ssl = config
            .get("sslVerify")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .map_err(|e| BlockError::Http(e.to_string()))?;

        let retry = RetryPolicy::from_config(&config);
        let format = ResponseFormat::from_config(&config);

        let mut last_err = None;
        for attempt in 0..retry.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(retry.delay_for(attempt - 1)).await;
            }
            match send_once(&client, &method, &url, &config).await {
                Ok(response) => {
                    let body = parse_response(response, &format)
                        .await
                        .map_err(|e| BlockError::Http(e.to_string()))?;
                    return Ok(match &data_path {
                        Some(path) => extract_path(&body, path),
                        None => body,
                    });
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(BlockError::Http(
            last_err.unwrap_or_else(|| "request failed".to_string()),
        ))
    }
}

fn resolve_url(config: &Value) -> Result<(String, Option<String>), BlockError> {
    if let Some(url) = config.get("url").and_then(Value::as_str) {
        return Ok((url.to_string(), None));
    }
    if let Some(asset) = config.get("asset").and_then(Value::as_str) {
        let source = price_source(asset).ok_or_else(|| {
            BlockError::Validation(format!("http: no price source registered for `{asset}`"))
        })?;
        return Ok((source.url_template.to_string(), Some(source.data_path.to_string())));
    }
    Err(BlockError::Validation(
        "http: config must set either `url` or `asset`".into(),
    ))
}

async fn send_once(
    client: &Client,
    method: &str,
    url: &str,
    config: &Value,
) -> Result<reqwest::Response, String> {
    let mut builder = match method {
        "GET" => client.get(url),
        "POST" => client.post(url),
        "PUT" => client.put(url),
        "PATCH" => client.patch(url),
        "DELETE" => client.delete(url),
        other => return Err(format!("unsupported method: {other}")),
    };

    if let Some(headers) = config.get("headers").and_then(Value::as_object) {
        for (key, value) in headers {
            if let Some(v) = value.as_str() {
                builder = builder.header(key, v);
            }
        }
    }

    builder = apply_auth(builder, config);

    if let Some(body) = config.get("body") {
        builder = builder.json(body);
    }

    builder
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())
}

fn apply_auth(mut builder: reqwest::RequestBuilder, config: &Value) -> reqwest::RequestBuilder {
    let Some(auth) = config.get("auth") else {
        return builder;
    };
    match auth.get("type").and_then(Value::as_str) {
        Some("basic") => {
            let username = auth.get("username").and_then(Value::as_str).unwrap_or_default();
            let password = auth.get("password").and_then(Value::as_str);
            builder = builder.basic_auth(username, password);
        }
        Some("bearer") => {
            if let Some(token) = auth.get("token").and_then(Value::as_str) {
                builder = builder.bearer_auth(token);
            }
        }
        Some("api_key") => {
            let header = auth.get("header").and_then(Value::as_str).unwrap_or("X-Api-Key");
            if let Some(key) = auth.get("key").and_then(Value::as_str) {
                builder = builder.header(header, key);
            }
        }
        _ => {}
    }
    builder
}

async fn parse_response(
    response: reqwest::Response,
    format: &ResponseFormat,
) -> Result<Value, String> {
    match format {
        ResponseFormat::Json => response.json::<Value>().await.map_err(|e| e.to_string()),
        ResponseFormat::Text | ResponseFormat::Xml | ResponseFormat::Html => {
            response.text().await.map(Value::String).map_err(|e| e.to_string())
        }
        ResponseFormat::Binary => {
            use base64::Engine as _;
            let bytes = response.bytes().await.map_err(|e| e.to_string())?;
            Ok(Value::String(
                base64::engine::general_purpose::STANDARD.encode(bytes),
            ))
        }
    }
}

fn extract_path(value: &Value, dotted_path: &str) -> Value {
    let mut current = value;
    for segment in dotted_path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Value::Null,
        }
    }
    current.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::id::{ActionId, ExecutionId, NodeId, UserId, WorkflowId};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ctx() -> BlockContext {
        BlockContext::new(NodeId::v4(), ExecutionId::v4(), WorkflowId::v4(), UserId::v4())
    }

    fn node(config: Value) -> NodeDefinition {
        NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4()).with_config(config)
    }

    #[tokio::test]
    async fn successful_json_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let n = node(json!({"url": format!("{}/ping", server.uri()), "method": "GET"}));
        let out = HttpRequestHandler.execute(&n, &ctx()).await.unwrap();
        assert_eq!(out, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn bearer_auth_header_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let n = node(json!({
            "url": server.uri(),
            "auth": {"type": "bearer", "token": "abc123"},
        }));
        let out = HttpRequestHandler.execute(&n, &ctx()).await.unwrap();
        assert_eq!(out, json!({"ok": true}));
    }

    #[tokio::test]
    async fn retries_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let n = node(json!({
            "url": server.uri(),
            "retry": {"maxAttempts": 3, "baseMs": 1, "capMs": 2},
        }));
        let out = HttpRequestHandler.execute(&n, &ctx()).await.unwrap();
        assert_eq!(out, json!({"ok": true}));
    }

    #[tokio::test]
    async fn missing_url_and_asset_is_rejected() {
        let n = node(json!({}));
        let err = HttpRequestHandler.execute(&n, &ctx()).await.unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_asset_is_rejected() {
        let n = node(json!({"asset": "DOGE"}));
        let err = HttpRequestHandler.execute(&n, &ctx()).await.unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
    }

    #[test]
    fn known_asset_resolves_to_price_source() {
        assert!(price_source("eth").is_some());
        assert!(price_source("DOGE").is_none());
    }

    #[test]
    fn retry_delay_never_exceeds_cap_with_jitter() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base: Duration::from_secs(1),
            factor: 2.0,
            cap: Duration::from_secs(5),
        };
        for attempt in 0..5 {
            let delay = policy.delay_for(attempt);
            assert!(delay.as_secs_f64() <= 5.0);
        }
    }
}
