use std::fmt;

/// Broad classification of an error, independent of where it occurred.
///
/// Callers branch on `ErrorKind` to decide whether to retry, surface a user
/// facing message, or treat the failure as a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// The requested resource does not exist.
    NotFound,
    /// The caller supplied malformed or semantically invalid input.
    InvalidInput,
    /// The operation conflicts with existing state (e.g. a duplicate key).
    Conflict,
    /// The caller lacks permission to perform the operation.
    Unauthorized,
    /// The operation did not complete within its allotted time.
    Timeout,
    /// A downstream dependency is temporarily unreachable.
    Unavailable,
    /// The operation was cancelled by its caller.
    Cancelled,
    /// An unexpected, non-classified failure.
    Internal,
}

impl ErrorKind {
    /// Whether an operation that failed with this kind is generally safe to
    /// retry without caller intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::Unavailable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
