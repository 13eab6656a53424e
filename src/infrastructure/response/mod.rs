use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static OBJECT_TYPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("object type pattern is valid"));

static WHITESPACE_RUN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Whether `value` can be placed into an upstream URL path as an object type
/// (`contacts`, `0-1`, `2-1234567`, `p_pets`).
pub fn is_valid_object_type(value: &str) -> bool {
    OBJECT_TYPE_PATTERN.is_match(value)
}

/// Message carried by a CRM error body, or `fallback` when it has none.
pub fn upstream_message(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(|message| WHITESPACE_RUN_PATTERN.replace_all(message.trim(), " ").to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
