//! Runtime configuration: defaults, then an optional TOML file, then
//! `NEBULA_ENGINE_*` environment overrides, loaded through the workspace's
//! layered configuration crate.

use std::time::Duration;

use nebula_config::{Config, ConfigResult};
use serde_json::json;

/// Worker concurrency, timeout, and circuit-breaker defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Identity this worker uses to claim an execution's lock.
    pub worker_id: String,
    /// Ready nodes run concurrently up to this cap within one execution.
    pub fan_out: usize,
    /// Per-node deadline when the node's own config doesn't override it.
    pub node_timeout: Duration,
    /// Deadline for an AI-agent block's full reasoning call.
    pub agent_timeout: Duration,
    /// Consecutive failures before a circuit opens.
    pub breaker_failure_threshold: u32,
    /// How long an open circuit stays open before probing recovery.
    pub breaker_cooldown: Duration,
    /// Lease duration an acquired execution lock is renewed under.
    pub lease_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_id: "local-worker".to_string(),
            fan_out: 4,
            node_timeout: Duration::from_secs(5 * 60),
            agent_timeout: Duration::from_secs(5 * 60),
            breaker_failure_threshold: 5,
            breaker_cooldown: Duration::from_secs(60),
            lease_ttl: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Loads config from built-in defaults, an optional file at `path`, and
    /// `NEBULA_ENGINE_*` environment variables, in that priority order.
    pub async fn load(path: Option<&std::path::Path>) -> ConfigResult<Self> {
        let defaults = EngineConfig::default();
        let mut builder = Config::builder().with_value(json!({
            "worker_id": defaults.worker_id,
            "fan_out": defaults.fan_out,
            "node_timeout_secs": defaults.node_timeout.as_secs(),
            "agent_timeout_secs": defaults.agent_timeout.as_secs(),
            "breaker_failure_threshold": defaults.breaker_failure_threshold,
            "breaker_cooldown_secs": defaults.breaker_cooldown.as_secs(),
            "lease_ttl_secs": defaults.lease_ttl.as_secs(),
        }));
        if let Some(path) = path {
            builder = builder.with_file(path);
        }
        let config = builder.with_env_prefix("NEBULA_ENGINE").build().await?;

        Ok(Self {
            worker_id: config.get_or("worker_id", defaults.worker_id).await,
            fan_out: config.get_or("fan_out", defaults.fan_out).await,
            node_timeout: Duration::from_secs(
                config
                    .get_or("node_timeout_secs", defaults.node_timeout.as_secs())
                    .await,
            ),
            agent_timeout: Duration::from_secs(
                config
                    .get_or("agent_timeout_secs", defaults.agent_timeout.as_secs())
                    .await,
            ),
            breaker_failure_threshold: config
                .get_or(
                    "breaker_failure_threshold",
                    defaults.breaker_failure_threshold,
                )
                .await,
            breaker_cooldown: Duration::from_secs(
                config
                    .get_or("breaker_cooldown_secs", defaults.breaker_cooldown.as_secs())
                    .await,
            ),
            lease_ttl: Duration::from_secs(
                config
                    .get_or("lease_ttl_secs", defaults.lease_ttl.as_secs())
                    .await,
            ),
        })
    }
}
