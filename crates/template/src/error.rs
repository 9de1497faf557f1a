use thiserror::Error;

/// Errors from template validation.
#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    /// `{{` and `}}` counts differ in the source string.
    #[error("unbalanced template braces: {open} '{{{{' vs {close} '}}}}'" )]
    UnbalancedBraces { open: usize, close: usize },

    /// The text inside `{{ }}` doesn't match any recognized expression shape.
    #[error("unknown template expression: {0}")]
    UnknownExpression(String),
}
