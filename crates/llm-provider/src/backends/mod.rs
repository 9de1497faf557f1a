mod anthropic;
mod openai_compatible;

pub use anthropic::AnthropicProvider;
pub use openai_compatible::OpenAiCompatibleProvider;
