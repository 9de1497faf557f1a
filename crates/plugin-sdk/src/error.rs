use thiserror::Error;

/// Errors a plugin author's [`crate::ToolHandler`] can raise.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
}

impl PluginError {
    /// JSON-RPC error code, following the method-not-found / invalid-params
    /// / internal-error convention from the JSON-RPC 2.0 spec.
    pub fn rpc_code(&self) -> i64 {
        match self {
            PluginError::UnknownTool(_) => -32601,
            PluginError::InvalidArguments(_) => -32602,
            PluginError::ExecutionFailed(_) => -32000,
        }
    }
}
