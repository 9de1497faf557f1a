use async_trait::async_trait;
use nebula_workflow::NodeDefinition;
use serde_json::Value;
use std::sync::Arc;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Port the email handler sends through.
///
/// Kept narrow and out-of-crate-concrete so the transport (SMTP, a
/// provider API) can be swapped without touching the handler.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BlockError>;
}

/// Sends an email after rendering `to`/`subject`/`body` against the
/// effective inputs.
pub struct EmailHandler {
    sender: Arc<dyn EmailSender>,
}

impl EmailHandler {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl BlockHandler for EmailHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;
        let to = config
            .get("to")
            .and_then(Value::as_str)
            .ok_or_else(|| BlockError::Validation("email: missing `to`".into()))?;
        let subject = config.get("subject").and_then(Value::as_str).unwrap_or("");
        let body = config.get("body").and_then(Value::as_str).unwrap_or("");

        self.sender.send(to, subject, body).await?;

        Ok(serde_json::json!({ "sent": true, "to": to }))
    }
}
