//! Shared error type for Nebula core operations.

use thiserror::Error;

/// Errors raised by core identity, scope, and version operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid scope: {0}")]
    InvalidScope(String),

    #[error("version mismatch: {0}")]
    VersionMismatch(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_scope(reason: impl Into<String>) -> Self {
        Self::InvalidScope(reason.into())
    }

    pub fn version_mismatch(reason: impl Into<String>) -> Self {
        Self::VersionMismatch(reason.into())
    }
}
