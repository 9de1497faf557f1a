//! Runs multiple validators and aggregates their errors

use crate::core::{ConfigResult, ConfigResultAggregator, ConfigValidator};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Runs every registered validator against the data and reports all
/// failures together rather than stopping at the first one.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Arc<dyn ConfigValidator>>,
}

impl CompositeValidator {
    /// Create an empty composite validator.
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Register an additional validator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_validator(mut self, validator: Arc<dyn ConfigValidator>) -> Self {
        self.validators.push(validator);
        self
    }
}

#[async_trait]
impl ConfigValidator for CompositeValidator {
    async fn validate(&self, data: &Value) -> ConfigResult<()> {
        let mut aggregator = ConfigResultAggregator::with_context("configuration validation");
        for validator in &self.validators {
            aggregator.check(validator.validate(data).await);
        }
        aggregator.finish()
    }
}
