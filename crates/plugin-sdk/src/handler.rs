use async_trait::async_trait;
use nebula_plugin_protocol::{ResourceDescriptor, ToolSchema, ToolsCallResult};
use serde_json::Value;

use crate::error::PluginError;

/// What a plugin author implements: the tool catalogue and dispatch logic.
///
/// The SDK's [`crate::PluginServer`] owns everything about the wire
/// protocol; this trait is the only thing a plugin needs to write.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Advertised tool schemas, returned from `tools/list`.
    fn tools(&self) -> Vec<ToolSchema>;

    /// Invokes one tool by name with its call arguments.
    async fn call(&self, name: &str, arguments: Value) -> Result<ToolsCallResult, PluginError>;

    /// Advertised resources, returned from `resources/list`. Most plugins
    /// have none.
    fn resources(&self) -> Vec<ResourceDescriptor> {
        Vec::new()
    }
}
