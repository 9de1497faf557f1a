//! Minimal fixture plugin used by supervisor integration tests: declares one
//! `echo` tool that returns its input arguments as text.

use async_trait::async_trait;
use nebula_plugin_protocol::{ContentBlock, ToolSchema, ToolsCallResult};
use nebula_plugin_sdk::{PluginError, PluginServer, ToolHandler};
use serde_json::{json, Value};

struct Echo;

#[async_trait]
impl ToolHandler for Echo {
    fn tools(&self) -> Vec<ToolSchema> {
        vec![ToolSchema {
            name: "echo".to_string(),
            description: "returns its input arguments unchanged".to_string(),
            input_schema: json!({"type": "object"}),
        }]
    }

    async fn call(&self, name: &str, arguments: Value) -> Result<ToolsCallResult, PluginError> {
        if name != "echo" {
            return Err(PluginError::UnknownTool(name.to_string()));
        }
        Ok(ToolsCallResult {
            content: vec![ContentBlock::Text {
                text: arguments.to_string(),
            }],
            is_error: false,
        })
    }
}

#[tokio::main]
async fn main() {
    PluginServer::new(Echo, "nebula-echo-fixture", env!("CARGO_PKG_VERSION"))
        .serve_stdio()
        .await;
}
