//! The dual data context an expression is evaluated against.

use serde_json::Value;

/// Bundles the node's input payload (`json.*`) with execution metadata
/// (`ctx.*`) so a single expression grammar can reach both.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    json: &'a Value,
    ctx: &'a Value,
}

impl<'a> TemplateContext<'a> {
    /// Builds a context from the node input and the execution metadata value.
    pub fn new(json: &'a Value, ctx: &'a Value) -> Self {
        Self { json, ctx }
    }

    pub fn json(&self) -> &'a Value {
        self.json
    }

    pub fn ctx(&self) -> &'a Value {
        self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exposes_both_sides() {
        let json = json!({"a": 1});
        let ctx = json!({"executionId": "e1"});
        let tc = TemplateContext::new(&json, &ctx);
        assert_eq!(tc.json(), &json);
        assert_eq!(tc.ctx(), &ctx);
    }
}
