//! Error type for the configuration system

/// Errors produced while loading, validating or accessing configuration
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A source failed to load (file missing, network error, parse error)
    #[error("{message} (source: {origin})")]
    SourceError {
        /// Human-readable description
        message: String,
        /// Name or identifier of the failing source
        origin: String,
    },

    /// Configuration failed schema or business-rule validation
    #[error("validation error: {message}")]
    ValidationError {
        /// Human-readable description
        message: String,
        /// Dot-path of the offending field, if known
        field: Option<String>,
    },

    /// A value could not be converted to the requested type
    #[error("type error: {message} (expected {expected}, got {actual})")]
    TypeError {
        /// Human-readable description
        message: String,
        /// Expected type name
        expected: String,
        /// Actual type name encountered
        actual: String,
    },

    /// A dot-path could not be resolved against the current data
    #[error("path error: {message} (path: {path})")]
    PathError {
        /// Human-readable description
        message: String,
        /// The path that failed to resolve
        path: String,
    },

    /// Underlying (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Watcher-related failure
    #[error("watch error: {0}")]
    WatchError(String),
}

impl ConfigError {
    /// Build a [`ConfigError::SourceError`]
    pub fn source_error(message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::SourceError {
            message: message.into(),
            origin: origin.into(),
        }
    }

    /// Build a [`ConfigError::ValidationError`]
    pub fn validation_error(message: impl Into<String>, field: Option<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field,
        }
    }

    /// Build a [`ConfigError::TypeError`]
    pub fn type_error(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeError {
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Build a [`ConfigError::PathError`]
    pub fn path_error(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::PathError {
            message: message.into(),
            path: path.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::source_error(err.to_string(), "io")
    }
}
