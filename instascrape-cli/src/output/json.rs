//! JSON output formatting.

use anyhow::Result;
use instascrape_core::{Account, Tag};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// A list of items with its length.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOutput<'a, T> {
    pub count: usize,
    pub items: &'a [T],
}

/// Combined account and hashtag search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<&'a [Account]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [Tag]>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}

/// Wraps a slice with its count.
pub fn list<T>(items: &[T]) -> ListOutput<'_, T> {
    ListOutput {
        count: items.len(),
        items,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_list_carries_count() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format(&list(&["a", "b"])).unwrap();
        assert_eq!(output, r#"{"count":2,"items":["a","b"]}"#);
    }
}
