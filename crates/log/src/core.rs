//! Error type for the logging facade itself (filter parsing, writer setup).

use thiserror::Error;

/// Errors raised while building or reloading the logger.
#[derive(Debug, Error)]
pub enum LogError {
    /// An `EnvFilter` directive string failed to parse.
    #[error("invalid filter directive: {0}")]
    Filter(String),

    /// The logger configuration was otherwise invalid.
    #[error("logging configuration error: {0}")]
    Config(String),

    /// Setting up a writer (e.g. a rolling file appender) failed.
    #[error("logging io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for this crate's fallible operations.
pub type LogResult<T> = Result<T, LogError>;
