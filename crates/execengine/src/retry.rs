//! Per-node retry policy: same exponential back-off shape as the HTTP
//! handler's own `config.retry`, applied by the engine around a node's
//! `onError` handling rather than inside a single handler call.

use std::time::Duration;

use serde_json::Value;

/// `node.config.retry`: attempt count and exponential back-off parameters.
#[derive(Debug, Clone)]
pub struct NodeRetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub factor: f64,
    pub cap: Duration,
}

impl Default for NodeRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
            factor: 2.0,
            cap: Duration::from_secs(5),
        }
    }
}

impl NodeRetryPolicy {
    pub fn from_config(config: &Value) -> Self {
        let mut policy = Self::default();
        if let Some(retry) = config.get("retry") {
            if let Some(n) = retry.get("maxAttempts").and_then(Value::as_u64) {
                policy.max_attempts = n as u32;
            }
            if let Some(ms) = retry.get("baseMs").and_then(Value::as_u64) {
                policy.base = Duration::from_millis(ms);
            }
            if let Some(ms) = retry.get("capMs").and_then(Value::as_u64) {
                policy.cap = Duration::from_millis(ms);
            }
        }
        policy
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let scaled = self.base.as_secs_f64() * self.factor.powi(attempt as i32);
        let capped = scaled.min(self.cap.as_secs_f64());
        let jitter = 1.0 - rand::random::<f64>() * 0.10;
        Duration::from_secs_f64(capped * jitter)
    }
}
