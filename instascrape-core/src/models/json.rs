//! Field lookups over raw JSON nodes.
//!
//! The web API is inconsistent about types: ids arrive as strings or numbers,
//! counts sometimes as strings. These helpers normalise that so the model
//! constructors stay declarative.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::CoreError;

/// Reads a string at a JSON pointer, accepting numbers as well.
pub(crate) fn str_at(node: &Value, pointer: &str) -> Option<String> {
    match node.pointer(pointer)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads the first pointer that resolves to a string.
pub(crate) fn first_str(node: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| str_at(node, p))
}

/// Reads a required string, naming the field on failure.
pub(crate) fn required_str(node: &Value, pointer: &str) -> Result<String, CoreError> {
    str_at(node, pointer).ok_or_else(|| CoreError::missing(pointer.trim_start_matches('/')))
}

/// Reads a required string from the first pointer that resolves.
pub(crate) fn required_first_str(node: &Value, pointers: &[&str]) -> Result<String, CoreError> {
    first_str(node, pointers).ok_or_else(|| {
        CoreError::missing(pointers.first().map_or("", |p| p.trim_start_matches('/')))
    })
}

/// Reads an unsigned integer, accepting numeric strings.
pub(crate) fn u64_at(node: &Value, pointer: &str) -> Option<u64> {
    match node.pointer(pointer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Reads the first pointer that resolves to an unsigned integer.
pub(crate) fn first_u64(node: &Value, pointers: &[&str]) -> Option<u64> {
    pointers.iter().find_map(|p| u64_at(node, p))
}

/// Reads a float, accepting numeric strings.
pub(crate) fn f64_at(node: &Value, pointer: &str) -> Option<f64> {
    match node.pointer(pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Reads a boolean flag, treating anything absent as `false`.
pub(crate) fn flag_at(node: &Value, pointer: &str) -> bool {
    node.pointer(pointer).and_then(Value::as_bool).unwrap_or(false)
}

/// Reads a unix timestamp (seconds) from the first pointer that resolves.
pub(crate) fn timestamp_at(node: &Value, pointers: &[&str]) -> Option<DateTime<Utc>> {
    let secs = pointers.iter().find_map(|p| u64_at(node, p))?;
    Utc.timestamp_opt(i64::try_from(secs).ok()?, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str_at_accepts_numbers() {
        let node = json!({"id": 42, "name": "x"});
        assert_eq!(str_at(&node, "/id").as_deref(), Some("42"));
        assert_eq!(str_at(&node, "/name").as_deref(), Some("x"));
        assert_eq!(str_at(&node, "/missing"), None);
    }

    #[test]
    fn test_u64_at_accepts_strings() {
        let node = json!({"a": "17", "b": 3, "c": "nope"});
        assert_eq!(u64_at(&node, "/a"), Some(17));
        assert_eq!(u64_at(&node, "/b"), Some(3));
        assert_eq!(u64_at(&node, "/c"), None);
    }

    #[test]
    fn test_required_names_field() {
        let err = required_str(&json!({}), "/owner/id").unwrap_err();
        assert!(err.to_string().contains("owner/id"));
    }

    #[test]
    fn test_timestamp_at() {
        let node = json!({"taken_at_timestamp": 1_500_000_000});
        let ts = timestamp_at(&node, &["/date", "/taken_at_timestamp"]).unwrap();
        assert_eq!(ts.timestamp(), 1_500_000_000);
    }
}
