use std::fmt;

use crate::kind::ErrorKind;

/// The crate's error type: a classified message with an optional source.
///
/// Domain crates define their own error enums with `thiserror` and convert
/// into this type at module boundaries (manually, or via
/// `#[derive(NebulaError)]` with the `derive` feature), rather than
/// propagating dozens of distinct error types up through the engine.
pub struct NebulaError {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl NebulaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Debug for NebulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NebulaError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for NebulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for NebulaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NebulaError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("NebulaError", 2)?;
        state.serialize_field("kind", self.kind.as_str())?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = NebulaError::not_found("workflow abc");
        assert_eq!(err.to_string(), "not_found: workflow abc");
    }

    #[test]
    fn with_source_is_reachable_via_error_trait() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = NebulaError::internal("write failed").with_source(source);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn is_retryable_follows_kind() {
        let err = NebulaError::new(ErrorKind::Timeout, "slow downstream");
        assert!(err.is_retryable());
    }
}
