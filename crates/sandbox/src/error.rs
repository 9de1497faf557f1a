use std::time::Duration;

use thiserror::Error;

/// Errors raised by the tool-server supervisor.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("tool server {0} is not registered")]
    UnknownServer(String),

    #[error("failed to spawn tool server: {0}")]
    Spawn(String),

    #[error("handshake with tool server {server} timed out after {elapsed:?}")]
    HandshakeTimeout { server: String, elapsed: Duration },

    #[error("tool server {server} has no tool named {tool}")]
    UnknownTool { server: String, tool: String },

    #[error("request to tool server {server} timed out after {elapsed:?}")]
    RequestTimeout { server: String, elapsed: Duration },

    #[error("tool server {0} is unavailable: {1}")]
    SupervisorUnavailable(String, String),

    #[error("tool server {server} returned an error: {message}")]
    ToolError { server: String, message: String },

    #[error("transport error talking to tool server {server}: {message}")]
    Transport { server: String, message: String },
}
