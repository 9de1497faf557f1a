use std::sync::Arc;

use nebula_plugin_protocol::{
    method, InitializeParams, InitializeResult, JsonRpcError, Request, RequestId, Response,
    ResourcesListResult, ServerInfo, ToolsCallParams, ToolsCallResult, ToolsListResult,
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::handler::ToolHandler;

const PROTOCOL_VERSION: &str = "2024-11-05";

/// Runs a [`ToolHandler`] as a child-side tool server: reads line-delimited
/// JSON-RPC requests from `stdin`, dispatches them, writes one [`Response`]
/// line per request to `stdout`.
///
/// A plugin binary is just this loop plus a handler:
///
/// ```ignore
/// #[tokio::main]
/// async fn main() {
///     PluginServer::new(MyHandler, "my-plugin", env!("CARGO_PKG_VERSION"))
///         .serve_stdio()
///         .await;
/// }
/// ```
pub struct PluginServer<H: ToolHandler> {
    handler: Arc<H>,
    name: String,
    version: String,
}

impl<H: ToolHandler> PluginServer<H> {
    pub fn new(handler: H, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            handler: Arc::new(handler),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Serves forever over the process's real stdin/stdout.
    pub async fn serve_stdio(&self) {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await;
    }

    /// Serves over arbitrary async reader/writer pair, for testing without a
    /// real child process.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W)
    where
        R: tokio::io::AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::error!(%err, "plugin stdin read failed");
                    break;
                }
            };

            let response = self.dispatch_line(&line).await;
            let Ok(text) = serde_json::to_string(&response) else {
                tracing::error!("failed to serialize response");
                continue;
            };
            if writer.write_all(text.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
                || writer.flush().await.is_err()
            {
                tracing::error!("plugin stdout write failed");
                break;
            }
        }
    }

    async fn dispatch_line(&self, line: &str) -> Response {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                return Response::failure(
                    RequestId::Number(0),
                    JsonRpcError::new(-32700, format!("parse error: {err}")),
                )
            }
        };
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request) -> Response {
        match request.method.as_str() {
            method::INITIALIZE => self.handle_initialize(request),
            method::TOOLS_LIST => self.handle_tools_list(request),
            method::TOOLS_CALL => self.handle_tools_call(request).await,
            method::RESOURCES_LIST => self.handle_resources_list(request),
            other => Response::failure(
                request.id,
                JsonRpcError::new(-32601, format!("unknown method: {other}")),
            ),
        }
    }

    fn handle_initialize(&self, request: Request) -> Response {
        let requested: Option<InitializeParams> = request
            .params
            .as_ref()
            .and_then(|params| serde_json::from_value(params.clone()).ok());
        tracing::info!(
            client = requested.map(|p| p.client_info.name).unwrap_or_default(),
            "plugin initialized"
        );
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: self.name.clone(),
                version: self.version.clone(),
            },
            capabilities: Value::Object(Default::default()),
        };
        Response::success(request.id, serde_json::to_value(result).unwrap())
    }

    fn handle_tools_list(&self, request: Request) -> Response {
        let result = ToolsListResult {
            tools: self.handler.tools(),
        };
        Response::success(request.id, serde_json::to_value(result).unwrap())
    }

    fn handle_resources_list(&self, request: Request) -> Response {
        let result = ResourcesListResult {
            resources: self.handler.resources(),
        };
        Response::success(request.id, serde_json::to_value(result).unwrap())
    }

    async fn handle_tools_call(&self, request: Request) -> Response {
        let params: ToolsCallParams = match request
            .params
            .clone()
            .and_then(|params| serde_json::from_value(params).ok())
        {
            Some(params) => params,
            None => {
                return Response::failure(
                    request.id,
                    JsonRpcError::new(-32602, "invalid params for tools/call"),
                )
            }
        };

        match self.handler.call(&params.name, params.arguments).await {
            Ok(result) => Response::success(request.id, serde_json::to_value(result).unwrap()),
            Err(err) => {
                let code = err.rpc_code();
                Response::failure(request.id, JsonRpcError::new(code, err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use nebula_plugin_protocol::{ContentBlock, ToolSchema};
    use serde_json::json;

    use super::*;
    use crate::error::PluginError;

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        fn tools(&self) -> Vec<ToolSchema> {
            vec![ToolSchema {
                name: "echo".into(),
                description: "echoes input".into(),
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

    async fn run_one(input: &str) -> Response {
        let server = PluginServer::new(EchoHandler, "echo-fixture", "0.1.0");
        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await;
        let text = String::from_utf8(output).unwrap();
        serde_json::from_str(text.trim()).unwrap()
    }

    #[tokio::test]
    async fn initialize_returns_server_info() {
        let req = Request::new(RequestId::Number(1), method::INITIALIZE, None);
        let resp = run_one(&(serde_json::to_string(&req).unwrap() + "\n")).await;
        assert!(resp.is_success());
        assert_eq!(resp.result.unwrap()["serverInfo"]["name"], "echo-fixture");
    }

    #[tokio::test]
    async fn tools_list_returns_declared_tools() {
        let req = Request::new(RequestId::Number(1), method::TOOLS_LIST, None);
        let resp = run_one(&(serde_json::to_string(&req).unwrap() + "\n")).await;
        let tools = resp.result.unwrap()["tools"].clone();
        assert_eq!(tools[0]["name"], "echo");
    }

    #[tokio::test]
    async fn tools_call_dispatches_to_handler() {
        let params = ToolsCallParams {
            name: "echo".into(),
            arguments: json!({"x": 1}),
        };
        let req = Request::new(
            RequestId::Number(1),
            method::TOOLS_CALL,
            Some(serde_json::to_value(params).unwrap()),
        );
        let resp = run_one(&(serde_json::to_string(&req).unwrap() + "\n")).await;
        assert!(resp.is_success());
    }

    #[tokio::test]
    async fn tools_call_unknown_tool_maps_to_method_not_found() {
        let params = ToolsCallParams {
            name: "nope".into(),
            arguments: Value::Null,
        };
        let req = Request::new(
            RequestId::Number(1),
            method::TOOLS_CALL,
            Some(serde_json::to_value(params).unwrap()),
        );
        let resp = run_one(&(serde_json::to_string(&req).unwrap() + "\n")).await;
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let req = Request::new(RequestId::Number(1), "bogus/method", None);
        let resp = run_one(&(serde_json::to_string(&req).unwrap() + "\n")).await;
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn malformed_line_yields_parse_error() {
        let resp = run_one("not json\n").await;
        assert_eq!(resp.error.unwrap().code, -32700);
    }
}
