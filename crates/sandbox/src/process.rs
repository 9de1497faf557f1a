use std::process::Stdio;
use std::time::Duration;

use nebula_plugin_protocol::{
    method, ClientInfo, InitializeParams, InitializeResult, Request, Response, ResourceDescriptor,
    ResourcesListResult, ToolSchema, ToolsCallParams, ToolsCallResult, ToolsListResult,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin};
use tokio::sync::Mutex;

use crate::error::SandboxError;
use crate::multiplexer::RequestMultiplexer;
use crate::registration::ToolServerRegistration;
use crate::restrict::SandboxPolicy;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A spawned tool-server child process: the pipes, the request multiplexer
/// multiplexing its stdout, and the reader task keeping it drained.
pub struct ChildProcess {
    server_name: String,
    child: Mutex<Child>,
    stdin: Mutex<ChildStdin>,
    mux: RequestMultiplexer,
    reader_task: tokio::task::JoinHandle<()>,
}

impl ChildProcess {
    pub async fn spawn(
        server_name: &str,
        registration: &ToolServerRegistration,
        policy: SandboxPolicy,
    ) -> Result<Self, SandboxError> {
        let mut command = tokio::process::Command::new(&registration.command);
        command
            .args(&registration.args)
            .envs(&registration.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        crate::restrict::apply(&mut command, policy);

        let mut child = command
            .spawn()
            .map_err(|err| SandboxError::Spawn(err.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SandboxError::Spawn("child has no stdin pipe".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SandboxError::Spawn("child has no stdout pipe".to_string()))?;

        let mux = RequestMultiplexer::new(server_name.to_string());
        let reader_task = tokio::spawn(read_responses(stdout, mux.clone(), server_name.to_string()));

        Ok(Self {
            server_name: server_name.to_string(),
            child: Mutex::new(child),
            stdin: Mutex::new(stdin),
            mux,
            reader_task,
        })
    }

    async fn send(&self, request: &Request) -> Result<(), SandboxError> {
        let mut line = serde_json::to_string(request).map_err(|err| SandboxError::Transport {
            server: self.server_name.clone(),
            message: err.to_string(),
        })?;
        line.push('\n');
        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|err| SandboxError::Transport {
                server: self.server_name.clone(),
                message: err.to_string(),
            })?;
        stdin.flush().await.map_err(|err| SandboxError::Transport {
            server: self.server_name.clone(),
            message: err.to_string(),
        })
    }

    async fn call(&self, method: &str, params: serde_json::Value, deadline: Duration) -> Result<serde_json::Value, SandboxError> {
        let id = self.mux.next_request_id();
        let request = Request::new(id.clone(), method, Some(params));
        self.send(&request).await?;
        let response = self.mux.wait_for(id, deadline).await?;
        match (response.result, response.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(SandboxError::ToolError {
                server: self.server_name.clone(),
                message: error.message,
            }),
            (None, None) => Err(SandboxError::Transport {
                server: self.server_name.clone(),
                message: "response had neither result nor error".to_string(),
            }),
        }
    }

    pub async fn handshake(&self, client_name: &str, client_version: &str) -> Result<InitializeResult, SandboxError> {
        let params = InitializeParams {
            protocol_version: "2024-11-05".to_string(),
            client_info: ClientInfo {
                name: client_name.to_string(),
                version: client_version.to_string(),
            },
            capabilities: serde_json::json!({}),
        };
        let result = self
            .call(
                method::INITIALIZE,
                serde_json::to_value(params).unwrap(),
                HANDSHAKE_TIMEOUT,
            )
            .await?;
        serde_json::from_value(result).map_err(|err| SandboxError::Transport {
            server: self.server_name.clone(),
            message: err.to_string(),
        })
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolSchema>, SandboxError> {
        let result = self
            .call(method::TOOLS_LIST, serde_json::json!({}), REQUEST_TIMEOUT)
            .await?;
        let parsed: ToolsListResult =
            serde_json::from_value(result).map_err(|err| SandboxError::Transport {
                server: self.server_name.clone(),
                message: err.to_string(),
            })?;
        Ok(parsed.tools)
    }

    pub async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, SandboxError> {
        let result = self
            .call(method::RESOURCES_LIST, serde_json::json!({}), REQUEST_TIMEOUT)
            .await?;
        let parsed: ResourcesListResult =
            serde_json::from_value(result).map_err(|err| SandboxError::Transport {
                server: self.server_name.clone(),
                message: err.to_string(),
            })?;
        Ok(parsed.resources)
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        deadline: Duration,
    ) -> Result<ToolsCallResult, SandboxError> {
        let params = ToolsCallParams {
            name: name.to_string(),
            arguments,
        };
        let result = self
            .call(method::TOOLS_CALL, serde_json::to_value(params).unwrap(), deadline)
            .await?;
        serde_json::from_value(result).map_err(|err| SandboxError::Transport {
            server: self.server_name.clone(),
            message: err.to_string(),
        })
    }

    pub fn pending_count(&self) -> usize {
        self.mux.pending_count()
    }

    pub fn fail_pending(&self, message: &str) {
        self.mux.fail_all(message);
    }

    pub async fn terminate(&self, grace: Duration) {
        self.fail_pending("tool server is draining");
        let mut child = self.child.lock().await;
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        if let Some(pid) = child.id() {
            send_sigterm(pid);
        }
        let _ = tokio::time::timeout(grace, child.wait()).await;
        let _ = child.kill().await;
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

async fn read_responses(
    stdout: tokio::process::ChildStdout,
    mux: RequestMultiplexer,
    server_name: String,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match serde_json::from_str::<Response>(&line) {
                Ok(response) => mux.resolve(response),
                Err(err) => {
                    tracing::warn!(server = %server_name, %err, "malformed response line from tool server");
                }
            },
            Ok(None) => {
                mux.fail_all("tool server closed stdout");
                break;
            }
            Err(err) => {
                tracing::error!(server = %server_name, %err, "error reading tool server stdout");
                mux.fail_all("tool server stdout read error");
                break;
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn send_sigterm(pid: u32) {
    let _ = nix::sys::signal::kill(
        nix::unistd::Pid::from_raw(pid as i32),
        nix::sys::signal::Signal::SIGTERM,
    );
}

#[cfg(not(target_os = "linux"))]
fn send_sigterm(_pid: u32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_rejects_nonexistent_command() {
        let registration = ToolServerRegistration::new("nebula-definitely-not-a-real-binary");
        let result = ChildProcess::spawn("srv", &registration, crate::restrict::SandboxPolicy::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn spawn_cat_and_terminate_cleanly() {
        let registration = ToolServerRegistration::new("cat");
        let child = ChildProcess::spawn("srv", &registration, crate::restrict::SandboxPolicy::default()).await.unwrap();
        child.terminate(Duration::from_millis(100)).await;
    }
}
