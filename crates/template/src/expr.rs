//! Parsing of the closed expression grammar recognized inside `{{ }}`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TemplateError;

/// One of the fixed expression shapes the template processor understands.
///
/// This is deliberately closed: no pipes, arithmetic, or user-defined
/// functions. Anything that doesn't match one of these shapes is an
/// unknown-expression finding, not a partial evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Json(String),
    Ctx(String),
    Now,
    Uuid,
    RandomInt(i64, i64),
    RandomFloat(f64, f64),
    RandomString(usize),
    FormatDate(String, String),
    FormatNumber(String, usize),
    FormatCurrency(String, String),
    Uppercase(String),
    Lowercase(String),
    Substring(String, i64, i64),
}

static JSON_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^json\.(.+)$").unwrap());
static CTX_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ctx\.(.+)$").unwrap());
static RANDOM_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$randomInt\(\s*(-?\d+)\s*,\s*(-?\d+)\s*\)$").unwrap());
static RANDOM_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$randomFloat\(\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*\)$").unwrap()
});
static RANDOM_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$randomString\(\s*(\d+)\s*\)$").unwrap());
static FORMAT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\$formatDate\(\s*([^,]+?)\s*,\s*"([^"]*)"\s*\)$"#).unwrap());
static FORMAT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$formatNumber\(\s*([^,]+?)\s*,\s*(\d+)\s*\)$").unwrap());
static FORMAT_CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\$formatCurrency\(\s*([^,]+?)\s*,\s*"([^"]*)"\s*\)$"#).unwrap()
});
static UPPERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$uppercase\(\s*(.+?)\s*\)$").unwrap());
static LOWERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$lowercase\(\s*(.+?)\s*\)$").unwrap());
static SUBSTRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$substring\(\s*([^,]+?)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*\)$").unwrap()
});

/// Parses the text inside one `{{ }}` span.
///
/// Returns [`TemplateError::UnknownExpression`] when `raw` matches none of
/// the recognized shapes.
pub fn parse(raw: &str) -> Result<Expr, TemplateError> {
    let raw = raw.trim();

    if raw == "$now" {
        return Ok(Expr::Now);
    }
    if raw == "$uuid" {
        return Ok(Expr::Uuid);
    }
    if let Some(c) = JSON_PATH.captures(raw) {
        return Ok(Expr::Json(c[1].to_string()));
    }
    if let Some(c) = CTX_PATH.captures(raw) {
        return Ok(Expr::Ctx(c[1].to_string()));
    }
    if let Some(c) = RANDOM_INT.captures(raw) {
        let a: i64 = c[1].parse().map_err(|_| unknown(raw))?;
        let b: i64 = c[2].parse().map_err(|_| unknown(raw))?;
        return Ok(Expr::RandomInt(a, b));
    }
    if let Some(c) = RANDOM_FLOAT.captures(raw) {
        let a: f64 = c[1].parse().map_err(|_| unknown(raw))?;
        let b: f64 = c[2].parse().map_err(|_| unknown(raw))?;
        return Ok(Expr::RandomFloat(a, b));
    }
    if let Some(c) = RANDOM_STRING.captures(raw) {
        let n: usize = c[1].parse().map_err(|_| unknown(raw))?;
        return Ok(Expr::RandomString(n));
    }
    if let Some(c) = FORMAT_DATE.captures(raw) {
        return Ok(Expr::FormatDate(c[1].to_string(), c[2].to_string()));
    }
    if let Some(c) = FORMAT_NUMBER.captures(raw) {
        let digits: usize = c[2].parse().map_err(|_| unknown(raw))?;
        return Ok(Expr::FormatNumber(c[1].to_string(), digits));
    }
    if let Some(c) = FORMAT_CURRENCY.captures(raw) {
        return Ok(Expr::FormatCurrency(c[1].to_string(), c[2].to_string()));
    }
    if let Some(c) = UPPERCASE.captures(raw) {
        return Ok(Expr::Uppercase(c[1].to_string()));
    }
    if let Some(c) = LOWERCASE.captures(raw) {
        return Ok(Expr::Lowercase(c[1].to_string()));
    }
    if let Some(c) = SUBSTRING.captures(raw) {
        let a: i64 = c[2].parse().map_err(|_| unknown(raw))?;
        let b: i64 = c[3].parse().map_err(|_| unknown(raw))?;
        return Ok(Expr::Substring(c[1].to_string(), a, b));
    }

    Err(unknown(raw))
}

fn unknown(raw: &str) -> TemplateError {
    TemplateError::UnknownExpression(raw.to_string())
}
