//! Fixture plugin with a single `increment` tool holding mutable state
//! across calls, used to exercise the supervisor's request multiplexer
//! against a long-lived child process.

use async_trait::async_trait;
use nebula_plugin_protocol::{ContentBlock, ToolSchema, ToolsCallResult};
use nebula_plugin_sdk::{PluginError, PluginServer, ToolHandler};
use serde_json::{json, Value};
use tokio::sync::Mutex;

struct Counter {
    value: Mutex<i64>,
}

#[async_trait]
impl ToolHandler for Counter {
    fn tools(&self) -> Vec<ToolSchema> {
        vec![ToolSchema {
            name: "increment".to_string(),
            description: "increments a counter by the given step and returns the new total"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "step": { "type": "integer" } }
            }),
        }]
    }

    async fn call(&self, name: &str, arguments: Value) -> Result<ToolsCallResult, PluginError> {
        if name != "increment" {
            return Err(PluginError::UnknownTool(name.to_string()));
        }
        let step = arguments.get("step").and_then(Value::as_i64).unwrap_or(1);
        let mut value = self.value.lock().await;
        *value += step;
        Ok(ToolsCallResult {
            content: vec![ContentBlock::Text {
                text: value.to_string(),
            }],
            is_error: false,
        })
    }
}

#[tokio::main]
async fn main() {
    let counter = Counter {
        value: Mutex::new(0),
    };
    PluginServer::new(counter, "nebula-counter-fixture", env!("CARGO_PKG_VERSION"))
        .serve_stdio()
        .await;
}
