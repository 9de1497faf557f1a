use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nebula_plugin_protocol::{ToolSchema, ToolsCallResult};
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::error::SandboxError;
use crate::process::ChildProcess;
use crate::registration::{ToolServerKey, ToolServerRegistration};
use crate::state::ServerState;

const HEALTH_PROBE_INTERVAL: Duration = Duration::from_secs(30);
const HEALTH_FAILURE_THRESHOLD: u32 = 3;
const DRAIN_QUIESCENCE: Duration = Duration::from_secs(10);
const DEFAULT_CALL_DEADLINE: Duration = Duration::from_secs(30);

struct ServerEntry {
    registration: ToolServerRegistration,
    state: RwLock<ServerState>,
    child: Mutex<Option<Arc<ChildProcess>>>,
    tools: RwLock<Vec<ToolSchema>>,
    consecutive_health_failures: RwLock<u32>,
}

/// Supervises the lifecycle of every registered tool server: spawns child
/// processes, drives them through the handshake, multiplexes `tools/call`
/// requests, and runs an idle health-check loop.
pub struct ToolServerSupervisor {
    client_name: String,
    client_version: String,
    entries: RwLock<HashMap<ToolServerKey, Arc<ServerEntry>>>,
}

impl ToolServerSupervisor {
    pub fn new(client_name: impl Into<String>, client_version: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            client_version: client_version.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a tool server and spawns it. Re-registration with the same
    /// key restarts the child if its launch parameters changed.
    pub async fn register(
        &self,
        key: ToolServerKey,
        registration: ToolServerRegistration,
    ) -> Result<(), SandboxError> {
        let existing = self.entries.read().get(&key).cloned();
        if let Some(entry) = existing {
            if !entry.registration.differs_from(&registration) {
                return Ok(());
            }
            self.stop(&key).await;
        }

        let entry = Arc::new(ServerEntry {
            registration,
            state: RwLock::new(ServerState::New),
            child: Mutex::new(None),
            tools: RwLock::new(Vec::new()),
            consecutive_health_failures: RwLock::new(0),
        });
        self.entries.write().insert(key.clone(), entry.clone());
        self.spawn_and_handshake(&key, &entry).await
    }

    async fn spawn_and_handshake(
        &self,
        key: &ToolServerKey,
        entry: &Arc<ServerEntry>,
    ) -> Result<(), SandboxError> {
        *entry.state.write() = ServerState::Spawning;
        let child = match ChildProcess::spawn(&key.server_name, &entry.registration, crate::restrict::SandboxPolicy::default()).await {
            Ok(child) => Arc::new(child),
            Err(err) => {
                *entry.state.write() = ServerState::Failed;
                return Err(err);
            }
        };

        *entry.state.write() = ServerState::Handshaking;
        if let Err(err) = child.handshake(&self.client_name, &self.client_version).await {
            *entry.state.write() = ServerState::Failed;
            return Err(err);
        }

        let tools = match child.list_tools().await {
            Ok(tools) => tools,
            Err(err) => {
                *entry.state.write() = ServerState::Failed;
                return Err(err);
            }
        };
        let _ = child.list_resources().await;

        *entry.tools.write() = tools;
        *entry.child.lock().await = Some(child);
        *entry.state.write() = ServerState::Ready;
        Ok(())
    }

    fn lookup(&self, key: &ToolServerKey) -> Result<Arc<ServerEntry>, SandboxError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| SandboxError::UnknownServer(key.server_name.clone()))
    }

    pub async fn discover(&self, key: &ToolServerKey) -> Result<Vec<ToolSchema>, SandboxError> {
        let entry = self.lookup(key)?;
        Ok(entry.tools.read().clone())
    }

    pub async fn invoke(
        &self,
        key: &ToolServerKey,
        tool_name: &str,
        params: serde_json::Value,
    ) -> Result<ToolsCallResult, SandboxError> {
        let entry = self.lookup(key)?;
        let state = *entry.state.read();
        if !state.accepts_requests() {
            return Err(SandboxError::SupervisorUnavailable(
                key.server_name.clone(),
                format!("server is in state {state:?}"),
            ));
        }
        if !entry.tools.read().iter().any(|tool| tool.name == tool_name) {
            return Err(SandboxError::UnknownTool {
                server: key.server_name.clone(),
                tool: tool_name.to_string(),
            });
        }

        let child = entry
            .child
            .lock()
            .await
            .clone()
            .ok_or_else(|| SandboxError::UnknownServer(key.server_name.clone()))?;

        *entry.state.write() = ServerState::Busy;
        let result = child.call_tool(tool_name, params, DEFAULT_CALL_DEADLINE).await;
        if *entry.state.read() == ServerState::Busy {
            *entry.state.write() = ServerState::Ready;
        }
        result
    }

    /// One idle health probe: `tools/list` with a short deadline. Three
    /// consecutive failures transition the server to `FAILED`.
    pub async fn health_check(&self, key: &ToolServerKey) -> Result<(), SandboxError> {
        let entry = self.lookup(key)?;
        if *entry.state.read() != ServerState::Ready {
            return Ok(());
        }
        let child = entry.child.lock().await.clone();
        let Some(child) = child else {
            return Ok(());
        };

        match child.list_tools().await {
            Ok(tools) => {
                *entry.tools.write() = tools;
                *entry.consecutive_health_failures.write() = 0;
                Ok(())
            }
            Err(err) => {
                let mut failures = entry.consecutive_health_failures.write();
                *failures += 1;
                if *failures >= HEALTH_FAILURE_THRESHOLD {
                    *entry.state.write() = ServerState::Failed;
                }
                Err(err)
            }
        }
    }

    pub fn health_probe_interval(&self) -> Duration {
        HEALTH_PROBE_INTERVAL
    }

    pub fn state_of(&self, key: &ToolServerKey) -> Option<ServerState> {
        self.entries.read().get(key).map(|entry| *entry.state.read())
    }

    /// Drains and stops one server: waits up to a quiescence window for
    /// in-flight requests, then terminates the child.
    pub async fn stop(&self, key: &ToolServerKey) {
        let Some(entry) = self.entries.read().get(key).cloned() else {
            return;
        };
        *entry.state.write() = ServerState::Draining;
        if let Some(child) = entry.child.lock().await.take() {
            child.terminate(DRAIN_QUIESCENCE).await;
        }
        *entry.state.write() = ServerState::Stopped;
    }

    pub async fn shutdown(&self) {
        let keys: Vec<_> = self.entries.read().keys().cloned().collect();
        for key in keys {
            self.stop(&key).await;
        }
    }
}
