//! Static validation of template strings without executing substitutions.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::TemplateError;
use crate::expr;

static OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{").unwrap());
static CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\}\}").unwrap());
static EXPRESSION_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").unwrap());

/// Checks that `template` has balanced `{{`/`}}` delimiters and that every
/// enclosed expression matches a recognized shape, without evaluating any
/// of them.
pub fn validate(template: &str) -> Result<(), TemplateError> {
    let open = OPEN.find_iter(template).count();
    let close = CLOSE.find_iter(template).count();
    if open != close {
        return Err(TemplateError::UnbalancedBraces { open, close });
    }
    for caps in EXPRESSION_SPAN.captures_iter(template) {
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        expr::parse(raw)?;
    }
    Ok(())
}
