//! Page property formatting.
//!
//! A property is formatted by the first override whose predicate accepts
//! it and which produces a value. Overrides may also decline (`None`), in
//! which case the chain moves on; the default formatter always ends it.
//!
//! | Applies to (page header only)               | Output                   |
//! |---------------------------------------------|--------------------------|
//! | `last_edited_time` properties               | `Last updated <Month>`   |
//! | `date` property named "published"           | `<Month>`                |
//! | `text` property named "author"              | `<b>{default}</b>`       |

use crate::record::{PropertyEntry, text};
use crate::render::text::rich_text;
use crate::utils::date::DateTimeUtc;
use crate::utils::html::{self, escape};

/// A property being formatted, and where it is shown.
#[derive(Debug, Clone, Copy)]
pub struct PropertyContext<'a> {
    pub entry: PropertyEntry<'a>,
    /// Rendered in the header of a page rather than a collection cell.
    pub page_header: bool,
}

impl<'a> PropertyContext<'a> {
    pub fn new(entry: PropertyEntry<'a>, page_header: bool) -> Self {
        Self { entry, page_header }
    }

    #[inline]
    fn is_named(&self, name: &str) -> bool {
        self.entry.schema.is_named(name)
    }

    #[inline]
    fn kind(&self) -> &str {
        &self.entry.schema.kind
    }
}

type Predicate = Box<dyn Fn(&PropertyContext<'_>) -> bool + Send + Sync>;
type Formatter = Box<dyn Fn(&PropertyContext<'_>, &dyn Fn() -> String) -> Option<String> + Send + Sync>;

struct Override {
    applies: Predicate,
    format: Formatter,
}

/// Ordered override chain with the default formatter at the end.
pub struct PropertyFormatters {
    overrides: Vec<Override>,
}

impl Default for PropertyFormatters {
    fn default() -> Self {
        Self::standard()
    }
}

impl PropertyFormatters {
    /// No overrides: every property uses the default formatter.
    pub fn empty() -> Self {
        Self {
            overrides: Vec::new(),
        }
    }

    /// The blog-post header overrides.
    pub fn standard() -> Self {
        Self::empty()
            .with(
                |cx| cx.page_header && cx.kind() == "last_edited_time",
                |cx, _| {
                    let edited = cx.entry.block.last_edited()?;
                    Some(format!("Last updated {}", edited.month_name()))
                },
            )
            .with(
                |cx| cx.page_header && cx.kind() == "date" && cx.is_named("published"),
                |cx, _| {
                    let start = text::date_start(cx.entry.data?)?;
                    let date = DateTimeUtc::parse(start)?;
                    Some(date.month_name().to_owned())
                },
            )
            .with(
                |cx| cx.page_header && cx.kind() == "text" && cx.is_named("author"),
                |_, default| Some(html::element("b", &[], &default())),
            )
    }

    /// Append an override. Earlier overrides take precedence.
    pub fn with<P, F>(mut self, applies: P, format: F) -> Self
    where
        P: Fn(&PropertyContext<'_>) -> bool + Send + Sync + 'static,
        F: Fn(&PropertyContext<'_>, &dyn Fn() -> String) -> Option<String> + Send + Sync + 'static,
    {
        self.overrides.push(Override {
            applies: Box::new(applies),
            format: Box::new(format),
        });
        self
    }

    /// Format a property to HTML.
    pub fn format(&self, cx: &PropertyContext<'_>) -> String {
        let default = || default_format(cx);
        self.overrides
            .iter()
            .filter(|o| (o.applies)(cx))
            .find_map(|o| (o.format)(cx, &default))
            .unwrap_or_else(default)
    }
}

/// Formatting by property type, used when no override applies.
pub fn default_format(cx: &PropertyContext<'_>) -> String {
    let entry = &cx.entry;
    match cx.kind() {
        "last_edited_time" | "created_time" => entry
            .block
            .last_edited()
            .map(DateTimeUtc::format_short)
            .unwrap_or_default(),
        "date" => entry
            .data
            .and_then(text::date_start)
            .and_then(DateTimeUtc::parse)
            .map(DateTimeUtc::format_short)
            .unwrap_or_default(),
        "checkbox" => {
            let checked = entry.data.map(text::plain).is_some_and(|v| v == "Yes");
            if checked { "☑" } else { "☐" }.to_owned()
        }
        "url" => {
            let url = entry.data.map(text::plain).unwrap_or_default();
            if url.is_empty() {
                String::new()
            } else {
                html::element("a", &[("href", &url)], &escape(&url))
            }
        }
        _ => entry.data.map(rich_text).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::{parse, post_record};
    use crate::record::{Block, PageRecord, PropertySchema, Timestamp};
    use serde_json::json;

    fn header_entry<'a>(record: &'a PageRecord, name: &str) -> PropertyEntry<'a> {
        let root = record.root().unwrap();
        record
            .header_properties(root)
            .into_iter()
            .find(|p| p.schema.name == name)
            .unwrap()
    }

    #[test]
    fn test_author_bold_only_in_header() {
        let record = parse(&post_record());
        let entry = header_entry(&record, "Author");
        let formatters = PropertyFormatters::standard();

        let header = formatters.format(&PropertyContext::new(entry, true));
        assert_eq!(header, "<b>Jane Doe</b>");

        let cell = formatters.format(&PropertyContext::new(entry, false));
        assert_eq!(cell, "Jane Doe");
        assert!(!cell.contains("<b>"));
    }

    #[test]
    fn test_last_edited_header() {
        let block = Block {
            id: "p".into(),
            kind: "page".into(),
            last_edited_time: Some(Timestamp::Text("2023-03-15T00:00:00Z".into())),
            ..Block::default()
        };
        let schema = PropertySchema {
            name: "Updated".into(),
            kind: "last_edited_time".into(),
        };
        let entry = PropertyEntry {
            id: "edit",
            schema: &schema,
            data: None,
            block: &block,
        };
        let formatters = PropertyFormatters::standard();

        assert_eq!(
            formatters.format(&PropertyContext::new(entry, true)),
            "Last updated March"
        );
        assert_eq!(
            formatters.format(&PropertyContext::new(entry, false)),
            "Mar 15, 2023"
        );
    }

    #[test]
    fn test_published_month() {
        let record = parse(&post_record());
        let entry = header_entry(&record, "Published");
        let formatters = PropertyFormatters::standard();

        assert_eq!(formatters.format(&PropertyContext::new(entry, true)), "January");
        assert_eq!(
            formatters.format(&PropertyContext::new(entry, false)),
            "Jan 20, 2023"
        );
    }

    #[test]
    fn test_published_without_date_falls_through() {
        let block = Block::default();
        let schema = PropertySchema {
            name: "Published".into(),
            kind: "text".into(),
        };
        let data = json!([["soon"]]);
        let entry = PropertyEntry {
            id: "pubd",
            schema: &schema,
            data: Some(&data),
            block: &block,
        };

        let out = PropertyFormatters::standard().format(&PropertyContext::new(entry, true));
        assert_eq!(out, "soon");
    }

    #[test]
    fn test_header_overrides_check_property_type() {
        let block = Block::default();
        let formatters = PropertyFormatters::standard();

        let person = PropertySchema {
            name: "Author".into(),
            kind: "person".into(),
        };
        let name = json!([["Jane Doe"]]);
        let entry = PropertyEntry {
            id: "auth",
            schema: &person,
            data: Some(&name),
            block: &block,
        };
        assert_eq!(formatters.format(&PropertyContext::new(entry, true)), "Jane Doe");

        let text = PropertySchema {
            name: "Published".into(),
            kind: "text".into(),
        };
        let mention = json!([["‣", [["d", {"type": "date", "start_date": "2023-01-20"}]]]]);
        let entry = PropertyEntry {
            id: "pubd",
            schema: &text,
            data: Some(&mention),
            block: &block,
        };
        assert_ne!(formatters.format(&PropertyContext::new(entry, true)), "January");
    }

    #[test]
    fn test_override_order() {
        let formatters = PropertyFormatters::standard().with(
            |cx| cx.is_named("author"),
            |_, default| Some(default().to_uppercase()),
        );

        let record = parse(&post_record());
        let entry = header_entry(&record, "Author");
        // `author` comes first and wins in the header.
        assert_eq!(formatters.format(&PropertyContext::new(entry, true)), "<b>Jane Doe</b>");
        assert_eq!(formatters.format(&PropertyContext::new(entry, false)), "JANE DOE");
    }

    #[test]
    fn test_empty_chain_uses_default() {
        let record = parse(&post_record());
        let entry = header_entry(&record, "Author");
        let out = PropertyFormatters::empty().format(&PropertyContext::new(entry, true));
        assert_eq!(out, "Jane Doe");
    }
}
