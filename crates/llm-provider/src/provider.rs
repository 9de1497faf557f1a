use async_trait::async_trait;

use crate::error::ProviderError;
use crate::request::{GenerateRequest, GenerateResponse};

/// A uniform handle over one language-model back-end.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError>;

    async fn healthy(&self) -> bool;
}
