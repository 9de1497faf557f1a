//! Pre-flight security screening port for AI-agent block execution.

use async_trait::async_trait;
use nebula_core::{ExecutionId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::PortsError;

/// The inputs a [`SecurityValidator`] inspects before an agent block is
/// allowed to call a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityCheckRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub tool_ids: Vec<String>,
    pub user_permissions: Vec<String>,
}

/// A specific reason a [`SecurityCheckRequest`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityViolation {
    /// The prompt or system prompt looks like a prompt-injection attempt.
    PromptInjection,
    /// The requested tool combination is not allowed together.
    DisallowedToolCombination { tools: Vec<String> },
    /// The user lacks a permission required by one of the requested tools.
    MissingPermission { permission: String },
}

/// Result of a security screening pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityCheckResult {
    pub valid: bool,
    pub violations: Vec<SecurityViolation>,
}

impl SecurityCheckResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
        }
    }

    pub fn rejected(violations: Vec<SecurityViolation>) -> Self {
        Self {
            valid: false,
            violations,
        }
    }
}

/// Pre-flight check run before the AI-agent block hands a prompt to a model.
#[async_trait]
pub trait SecurityValidator: Send + Sync {
    /// Inspect a prepared agent invocation for policy violations.
    async fn validate(
        &self,
        request: SecurityCheckRequest,
        user_id: UserId,
        execution_id: ExecutionId,
    ) -> Result<SecurityCheckResult, PortsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_result_has_no_violations() {
        let result = SecurityCheckResult::ok();
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn rejected_result_carries_violations() {
        let result = SecurityCheckResult::rejected(vec![SecurityViolation::PromptInjection]);
        assert!(!result.valid);
        assert_eq!(result.violations.len(), 1);
    }

    #[test]
    fn trait_is_object_safe() {
        fn _assert(_: &dyn SecurityValidator) {}
    }
}
