use async_trait::async_trait;
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Evaluates a single comparison against one field of the effective inputs.
///
/// Config shape: `{ "field": <key>, "operator": <op>, "value": <expected> }`
/// where `op` is one of `eq`, `ne`, `gt`, `gte`, `lt`, `lte`, `contains`.
/// Output: `{ "result": bool }`.
pub struct ConditionHandler;

#[async_trait]
impl BlockHandler for ConditionHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;
        let field = config
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| BlockError::Validation("condition: missing `field`".into()))?;
        let operator = config
            .get("operator")
            .and_then(Value::as_str)
            .ok_or_else(|| BlockError::Validation("condition: missing `operator`".into()))?;
        let expected = config
            .get("value")
            .ok_or_else(|| BlockError::Validation("condition: missing `value`".into()))?;
        let actual = config.get(field).cloned().unwrap_or(Value::Null);

        let result = evaluate(&actual, operator, expected)?;
        Ok(serde_json::json!({ "result": result }))
    }
}

fn evaluate(actual: &Value, operator: &str, expected: &Value) -> Result<bool, BlockError> {
    match operator {
        "eq" => Ok(actual == expected),
        "ne" => Ok(actual != expected),
        "gt" | "gte" | "lt" | "lte" => {
            let (a, b) = (as_f64(actual), as_f64(expected));
            match (a, b) {
                (Some(a), Some(b)) => Ok(match operator {
                    "gt" => a > b,
                    "gte" => a >= b,
                    "lt" => a < b,
                    "lte" => a <= b,
                    _ => unreachable!(),
                }),
                _ => Err(BlockError::Validation(
                    "condition: non-numeric operands for ordering operator".into(),
                )),
            }
        }
        "contains" => {
            let haystack = actual.as_str().unwrap_or_default();
            let needle = expected.as_str().unwrap_or_default();
            Ok(haystack.contains(needle))
        }
        other => Err(BlockError::Validation(format!(
            "condition: unknown operator `{other}`"
        ))),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    value.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::id::{ActionId, ExecutionId, NodeId, UserId, WorkflowId};
    use serde_json::json;

    fn ctx() -> BlockContext {
        BlockContext::new(NodeId::v4(), ExecutionId::v4(), WorkflowId::v4(), UserId::v4())
    }

    fn node(config: Value) -> NodeDefinition {
        NodeDefinition::new(NodeId::v4(), "n".into(), ActionId::v4()).with_config(config)
    }

    #[tokio::test]
    async fn eq_true() {
        let n = node(json!({"field": "status", "operator": "eq", "value": "ok", "status": "ok"}));
        let out = ConditionHandler.execute(&n, &ctx()).await.unwrap();
        assert_eq!(out, json!({"result": true}));
    }

    #[tokio::test]
    async fn gt_numeric() {
        let n = node(json!({"field": "price", "operator": "gt", "value": 10, "price": 15}));
        let out = ConditionHandler.execute(&n, &ctx()).await.unwrap();
        assert_eq!(out, json!({"result": true}));
    }

    #[tokio::test]
    async fn contains_substring() {
        let n = node(json!({"field": "msg", "operator": "contains", "value": "err", "msg": "an error occurred"}));
        let out = ConditionHandler.execute(&n, &ctx()).await.unwrap();
        assert_eq!(out, json!({"result": true}));
    }

    #[tokio::test]
    async fn missing_field_defaults_to_null() {
        let n = node(json!({"field": "absent", "operator": "eq", "value": Value::Null}));
        let out = ConditionHandler.execute(&n, &ctx()).await.unwrap();
        assert_eq!(out, json!({"result": true}));
    }

    #[tokio::test]
    async fn unknown_operator_is_rejected() {
        let n = node(json!({"field": "a", "operator": "regex", "value": "x", "a": "x"}));
        let err = ConditionHandler.execute(&n, &ctx()).await.unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
    }
}
