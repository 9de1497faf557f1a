//! Validator that accepts anything

use crate::core::{ConfigResult, ConfigValidator};
use async_trait::async_trait;
use serde_json::Value;

/// Accepts any configuration value. Useful as a default when no
/// validation is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpValidator;

#[async_trait]
impl ConfigValidator for NoOpValidator {
    async fn validate(&self, _data: &Value) -> ConfigResult<()> {
        Ok(())
    }
}
