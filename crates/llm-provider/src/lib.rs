//! Language-model provider pool: a uniform [`Provider`] handle over
//! vendor-specific HTTP back-ends, held by name in a [`ProviderPool`] that
//! falls back to the next healthy provider in a configured chain.

mod backends;
mod error;
mod pool;
mod provider;
mod request;

pub use backends::{AnthropicProvider, OpenAiCompatibleProvider};
pub use error::ProviderError;
pub use pool::ProviderPool;
pub use provider::Provider;
pub use request::{GenerateRequest, GenerateResponse, ToolCall, ToolInvoke, ToolSpec, Usage};
