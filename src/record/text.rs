//! Notion rich-text decoding.
//!
//! A rich-text value is a list of segments, each `[text, decorations?]`:
//!
//! ```text
//! [["Hello "], ["world", [["b"]]], ["docs", [["a", "https://example.com"]]]]
//! ```
//!
//! Dates and mentions use the placeholder text `‣` with the payload inside
//! the decoration list:
//!
//! ```text
//! [["‣", [["d", {"type": "date", "start_date": "2023-03-15"}]]]]
//! ```

use serde_json::Value;

/// Concatenated text of all segments.
pub fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(segments) => segments
            .iter()
            .filter_map(|seg| match seg {
                Value::Array(parts) => parts.first().and_then(Value::as_str),
                Value::String(s) => Some(s.as_str()),
                _ => None,
            })
            .collect(),
        _ => String::new(),
    }
}

/// First link target found in the segment decorations.
pub fn first_link(value: &Value) -> Option<&str> {
    value.as_array()?.iter().find_map(|seg| {
        seg.get(1)?.as_array()?.iter().find_map(|decoration| {
            let parts = decoration.as_array()?;
            match parts.as_slice() {
                [kind, target, ..] if kind.as_str() == Some("a") => target.as_str(),
                _ => None,
            }
        })
    })
}

/// `start_date` of a date property, found at `data[0][1][0][1].start_date`.
pub fn date_start(value: &Value) -> Option<&str> {
    value
        .get(0)?
        .get(1)?
        .get(0)?
        .get(1)?
        .get("start_date")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_joins_segments() {
        let value = json!([["Hello "], ["world", [["b"]]]]);
        assert_eq!(plain(&value), "Hello world");
    }

    #[test]
    fn test_plain_non_text() {
        assert_eq!(plain(&json!(null)), "");
        assert_eq!(plain(&json!(42)), "");
        assert_eq!(plain(&json!("raw")), "raw");
    }

    #[test]
    fn test_first_link() {
        let value = json!([["cover.png", [["a", "https://img.example.com/c.png"]]]]);
        assert_eq!(first_link(&value), Some("https://img.example.com/c.png"));
        assert_eq!(first_link(&json!([["plain"]])), None);
    }

    #[test]
    fn test_date_start() {
        let value = json!([["‣", [["d", {"type": "date", "start_date": "2023-03-15"}]]]]);
        assert_eq!(date_start(&value), Some("2023-03-15"));
    }

    #[test]
    fn test_date_start_missing() {
        assert_eq!(date_start(&json!([["‣"]])), None);
        assert_eq!(date_start(&json!([["‣", [["d", {"type": "date"}]]]])), None);
        assert_eq!(date_start(&json!("2023-03-15")), None);
    }
}
