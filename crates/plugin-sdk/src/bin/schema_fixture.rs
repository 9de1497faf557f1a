//! Fixture plugin that advertises several tools with varied input schemas
//! and one resource, used to exercise `tools/list` and `resources/list`
//! against a realistic multi-tool catalogue.

use async_trait::async_trait;
use nebula_plugin_protocol::{ContentBlock, ResourceDescriptor, ToolSchema, ToolsCallResult};
use nebula_plugin_sdk::{PluginError, PluginServer, ToolHandler};
use serde_json::{json, Value};

struct SchemaFixture;

#[async_trait]
impl ToolHandler for SchemaFixture {
    fn tools(&self) -> Vec<ToolSchema> {
        vec![
            ToolSchema {
                name: "no_args".to_string(),
                description: "takes no arguments".to_string(),
                input_schema: json!({"type": "object", "properties": {}}),
            },
            ToolSchema {
                name: "required_field".to_string(),
                description: "requires a single string field".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "value": { "type": "string" } },
                    "required": ["value"]
                }),
            },
        ]
    }

    fn resources(&self) -> Vec<ResourceDescriptor> {
        vec![ResourceDescriptor {
            uri: "fixture://schema/readme".to_string(),
            name: "readme".to_string(),
            description: Some("static fixture resource".to_string()),
            mime_type: Some("text/plain".to_string()),
        }]
    }

    async fn call(&self, name: &str, _arguments: Value) -> Result<ToolsCallResult, PluginError> {
        match name {
            "no_args" | "required_field" => Ok(ToolsCallResult {
                content: vec![ContentBlock::Text {
                    text: "ok".to_string(),
                }],
                is_error: false,
            }),
            other => Err(PluginError::UnknownTool(other.to_string())),
        }
    }
}

#[tokio::main]
async fn main() {
    PluginServer::new(
        SchemaFixture,
        "nebula-plugin-schema-fixture",
        env!("CARGO_PKG_VERSION"),
    )
    .serve_stdio()
    .await;
}
