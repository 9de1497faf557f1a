//! Wire types for the tool-server protocol: JSON-RPC 2.0 over line-delimited
//! stdio, and the `initialize` / `tools/list` / `tools/call` /
//! `resources/list` method shapes the supervisor and plugin SDK share.

mod envelope;
mod methods;

pub use envelope::{JsonRpcError, Notification, Request, RequestId, Response};
pub use methods::{
    method, ClientInfo, ContentBlock, InitializeParams, InitializeResult, ResourceDescriptor,
    ResourcesListResult, ServerInfo, ToolSchema, ToolsCallParams, ToolsCallResult,
    ToolsListResult,
};
