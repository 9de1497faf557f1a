//! Single-pass substitution of `{{ }}` expressions in strings and JSON values.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::context::TemplateContext;
use crate::error::TemplateError;
use crate::expr::{self, Expr};
use crate::path;

static EXPRESSION_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").unwrap());

/// Renders every `{{ }}` expression found in `template` against `ctx`.
///
/// Substitution is single-pass: the output of one expression is never
/// re-scanned for further `{{ }}` spans. Unknown expressions propagate as
/// an error; the caller decides whether to fail the node or fall back to
/// the raw text.
pub fn render_str(template: &str, ctx: &TemplateContext<'_>) -> Result<String, TemplateError> {
    let mut last_end = 0;
    let mut out = String::with_capacity(template.len());
    for caps in EXPRESSION_SPAN.captures_iter(template) {
        let whole = caps.get(0).unwrap();
        out.push_str(&template[last_end..whole.start()]);
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let parsed = expr::parse(raw)?;
        out.push_str(&evaluate(&parsed, ctx));
        last_end = whole.end();
    }
    out.push_str(&template[last_end..]);
    Ok(out)
}

/// Recursively renders every string leaf of a JSON value.
///
/// Non-string leaves (numbers, bools, null) pass through unchanged; only
/// string values and string map/array entries are scanned for `{{ }}`.
pub fn render_value(value: &Value, ctx: &TemplateContext<'_>) -> Result<Value, TemplateError> {
    match value {
        Value::String(s) => Ok(Value::String(render_str(s, ctx)?)),
        Value::Array(items) => {
            let rendered: Result<Vec<_>, _> = items.iter().map(|v| render_value(v, ctx)).collect();
            Ok(Value::Array(rendered?))
        }
        Value::Object(map) => {
            let mut rendered = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                rendered.insert(k.clone(), render_value(v, ctx)?);
            }
            Ok(Value::Object(rendered))
        }
        other => Ok(other.clone()),
    }
}

fn evaluate(parsed: &Expr, ctx: &TemplateContext<'_>) -> String {
    match parsed {
        Expr::Json(p) => stringify(path::resolve(ctx.json(), p)),
        Expr::Ctx(p) => stringify(path::resolve(ctx.ctx(), p)),
        Expr::Now => chrono::Utc::now().to_rfc3339(),
        Expr::Uuid => uuid::Uuid::new_v4().to_string(),
        Expr::RandomInt(lo, hi) => random_int(*lo, *hi).to_string(),
        Expr::RandomFloat(lo, hi) => random_float(*lo, *hi).to_string(),
        Expr::RandomString(n) => random_string(*n),
        Expr::FormatDate(p, fmt) => format_date(path::resolve(ctx.json(), p), fmt),
        Expr::FormatNumber(p, digits) => format_number(path::resolve(ctx.json(), p), *digits),
        Expr::FormatCurrency(p, iso) => format_currency(path::resolve(ctx.json(), p), iso),
        Expr::Uppercase(p) => stringify(path::resolve(ctx.json(), p)).to_uppercase(),
        Expr::Lowercase(p) => stringify(path::resolve(ctx.json(), p)).to_lowercase(),
        Expr::Substring(p, start, end) => substring(&stringify(path::resolve(ctx.json(), p)), *start, *end),
    }
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn random_int(lo: i64, hi: i64) -> i64 {
    if hi <= lo {
        return lo;
    }
    let span = (hi - lo + 1) as u64;
    let draw: u64 = rand::random();
    lo + (draw % span) as i64
}

fn random_float(lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    let draw: f64 = rand::random::<f64>();
    lo + draw * (hi - lo)
}

fn random_string(len: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..len)
        .map(|_| {
            let draw: u8 = rand::random();
            ALPHABET[(draw as usize) % ALPHABET.len()] as char
        })
        .collect()
}

fn format_date(value: Option<&Value>, fmt: &str) -> String {
    let raw = match value {
        Some(Value::String(s)) => s.clone(),
        _ => return String::new(),
    };
    let parsed = chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S")
                .map(|naive| naive.and_utc())
        });
    let Ok(dt) = parsed else {
        return raw;
    };
    let strftime_fmt = fmt
        .replace("YYYY", "%Y")
        .replace("MM", "%m")
        .replace("DD", "%d")
        .replace("HH", "%H")
        .replace("mm", "%M")
        .replace("ss", "%S");
    dt.format(&strftime_fmt).to_string()
}

fn format_number(value: Option<&Value>, digits: usize) -> String {
    let Some(n) = value.and_then(Value::as_f64) else {
        return String::new();
    };
    format!("{n:.digits$}")
}

fn format_currency(value: Option<&Value>, iso: &str) -> String {
    let Some(n) = value.and_then(Value::as_f64) else {
        return String::new();
    };
    format!("{iso} {n:.2}")
}

fn substring(source: &str, start: i64, end: i64) -> String {
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len() as i64;
    let clamp = |i: i64| i.clamp(0, len) as usize;
    let start = clamp(start);
    let end = clamp(end);
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}
