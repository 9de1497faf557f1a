use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static SELECTED_TOOLS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)selected tools:\s*\[(.*)\]").unwrap());
static ETH_ADDRESS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"0x[a-fA-F0-9]{4,}").unwrap());

const SYMBOL_TOKENS: &[&str] = &["ETH", "USDC", "BTC", "USDT", "SEI"];

/// One tool the "select tools" step decided to use, with any inline
/// parameter hints extracted from the surrounding text.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTool {
    pub name: String,
    pub parameters: HashMap<String, Value>,
}

/// Parses a `"Selected tools: [name with param: value, ...]"` line against
/// the list of tool names actually available, matching case-insensitively
/// by exact id, by space-for-underscore form, or by any underscore-token of
/// length > 3.
pub fn parse_selected_tools(text: &str, available: &[String]) -> Vec<SelectedTool> {
    let Some(captures) = SELECTED_TOOLS_LINE.captures(text) else {
        return Vec::new();
    };
    let body = &captures[1];

    body.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let name = match_tool(entry, available)?;
            let parameters = extract_hints(entry);
            Some(SelectedTool { name, parameters })
        })
        .collect()
}

fn match_tool(entry: &str, available: &[String]) -> Option<String> {
    let lower = entry.to_ascii_lowercase();
    let spaced = |name: &str| name.to_ascii_lowercase().replace('_', " ");

    available
        .iter()
        .find(|name| lower.contains(&name.to_ascii_lowercase()))
        .or_else(|| available.iter().find(|name| lower.contains(&spaced(name))))
        .or_else(|| {
            available.iter().find(|name| {
                name.split('_')
                    .filter(|token| token.len() > 3)
                    .any(|token| lower.contains(&token.to_ascii_lowercase()))
            })
        })
        .cloned()
}

fn extract_hints(entry: &str) -> HashMap<String, Value> {
    let mut hints = HashMap::new();

    if let Some(found) = ETH_ADDRESS.find(entry) {
        hints.insert("address".to_string(), Value::String(found.as_str().to_string()));
    }

    let upper = entry.to_ascii_uppercase();
    if let Some(symbol) = SYMBOL_TOKENS.iter().find(|token| upper.contains(**token)) {
        hints.insert("token".to_string(), Value::String(symbol.to_string()));
    }

    for token in entry.split(|c: char| !c.is_ascii_alphanumeric() && c != '.') {
        if token.is_empty() || token.len() > 8 {
            continue;
        }
        if let Ok(number) = token.parse::<f64>() {
            let key = if token.contains('.') { "amount" } else { "limit" };
            hints.entry(key.to_string()).or_insert(Value::from(number));
        }
    }

    hints
}
