//! Validator backed by an arbitrary closure

use crate::core::{ConfigResult, ConfigValidator};
use async_trait::async_trait;
use serde_json::Value;

/// Wraps a synchronous closure as a [`ConfigValidator`].
pub struct FunctionValidator<F>
where
    F: Fn(&Value) -> ConfigResult<()> + Send + Sync,
{
    f: F,
    rules: Option<String>,
}

impl<F> FunctionValidator<F>
where
    F: Fn(&Value) -> ConfigResult<()> + Send + Sync,
{
    /// Wrap `f` as a validator.
    pub fn new(f: F) -> Self {
        Self { f, rules: None }
    }

    /// Attach a human-readable description of the rules this validator enforces.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }
}

#[async_trait]
impl<F> ConfigValidator for FunctionValidator<F>
where
    F: Fn(&Value) -> ConfigResult<()> + Send + Sync,
{
    async fn validate(&self, data: &Value) -> ConfigResult<()> {
        (self.f)(data)
    }

    fn rules(&self) -> Option<String> {
        self.rules.clone()
    }
}
