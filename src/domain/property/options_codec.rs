// Options are stored in the "Options" cell as a JSON array of objects with
// keys label, value, displayOrder, hidden, readonly.

use serde_json::Value;

use super::PropertyOption;
use crate::domain::error::{AppError, Result};

/// Encode options as the text stored in an "Options" cell.
pub fn encode_options(options: &[PropertyOption]) -> Result<String> {
    serde_json::to_string(options)
        .map_err(|e| AppError::Internal(format!("Failed to encode options: {}", e)))
}

/// Decode an "Options" cell.
///
/// Entries are read leniently: missing or null text fields become `""`,
/// flags use truthiness, and an entry without a numeric `displayOrder` takes
/// its position in the list. Fails when the text is not JSON or is not an
/// array.
pub fn decode_options(text: &str) -> Result<Vec<PropertyOption>> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|e| AppError::ParseError(format!("Options are not valid JSON: {}", e)))?;

    let entries = parsed
        .as_array()
        .ok_or_else(|| AppError::ParseError("Options are not in array format".to_string()))?;

    Ok(entries
        .iter()
        .enumerate()
        .map(|(position, entry)| PropertyOption {
            label: text_field(entry, "label"),
            value: text_field(entry, "value"),
            display_order: entry
                .get("displayOrder")
                .and_then(as_order)
                .unwrap_or(position as i64),
            hidden: entry.get("hidden").map(truthy).unwrap_or(false),
            readonly: entry.get("readonly").map(truthy).unwrap_or(false),
        })
        .collect())
}

fn text_field(entry: &Value, key: &str) -> String {
    match entry.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn as_order(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
