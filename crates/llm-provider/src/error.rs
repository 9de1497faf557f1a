use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider {0} is not registered")]
    UnknownProvider(String),

    #[error("no healthy provider available (tried: {0:?})")]
    NoHealthyProvider(Vec<String>),

    #[error("http error talking to provider {provider}: {message}")]
    Http { provider: String, message: String },

    #[error("provider {provider} returned an unexpected response shape: {message}")]
    MalformedResponse { provider: String, message: String },
}
