//! Named coercions for the loosely typed upstream values.
//!
//! Upstream fields arrive as strings, numbers, nulls or not at all. Each
//! function here fixes one default policy so the field mappings can say
//! which policy they use instead of re-deriving it inline.

use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

/// Trimmed text. Numbers are stringified; anything else is empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// A non-empty string, kept verbatim (URLs, colours).
pub fn url(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Integer from a number (floats truncate) or a numeric string.
pub fn int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

/// Untruncated number from a number or a numeric string.
pub fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|f| f.is_finite())
}

/// `int`, with zero treated as "not provided".
pub fn nonzero_int(value: Option<&Value>) -> Option<i64> {
    int(value).filter(|n| *n != 0)
}

/// `nonzero_int`, falling back to `default`.
pub fn int_or(value: Option<&Value>, default: i64) -> i64 {
    nonzero_int(value).unwrap_or(default)
}

/// String entries of an array; other entries are dropped.
pub fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Record entries of an array; other entries are dropped.
pub fn records(value: Option<&Value>) -> impl Iterator<Item = &Record> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Text stored either as one string or as a list of fragments.
pub fn joined_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(_)) => strings(value).join(" ").trim().to_string(),
        other => text(other),
    }
}
