use std::collections::HashMap;

use nebula_core::UserId;
use serde::{Deserialize, Serialize};

/// Key a tool server is registered and looked up under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolServerKey {
    pub user_id: UserId,
    pub server_name: String,
}

impl ToolServerKey {
    pub fn new(user_id: UserId, server_name: impl Into<String>) -> Self {
        Self {
            user_id,
            server_name: server_name.into(),
        }
    }
}

/// Everything needed to spawn a tool server's child process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerRegistration {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ToolServerRegistration {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Whether a re-registration under the same key actually changes the
    /// child's launch parameters, and therefore requires a restart.
    pub fn differs_from(&self, other: &ToolServerRegistration) -> bool {
        self.command != other.command || self.args != other.args || self.env != other.env
    }
}
