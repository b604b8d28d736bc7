//! Rich text to HTML.
//!
//! Decorations are applied innermost first, in the order Notion lists them.

use serde_json::Value;

use crate::core::PageUrlMapper;
use crate::utils::date::DateTimeUtc;
use crate::utils::html::{self, escape};

/// Rich text with page mentions linked to `/<id>`.
pub fn rich_text(value: &Value) -> String {
    render(value, None)
}

/// Rich text with page mentions linked through `pages`.
pub fn rich_text_linked(value: &Value, pages: &PageUrlMapper<'_>) -> String {
    render(value, Some(pages))
}

fn render(value: &Value, pages: Option<&PageUrlMapper<'_>>) -> String {
    let segments = match value {
        Value::Array(segments) => segments,
        Value::String(s) => return escape(s).into_owned(),
        _ => return String::new(),
    };

    let mut out = String::new();
    for segment in segments {
        let Some(parts) = segment.as_array() else {
            continue;
        };
        let text = parts.first().and_then(Value::as_str).unwrap_or_default();
        let decorations = parts
            .get(1)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut html = escape(text).into_owned();
        for decoration in decorations {
            html = decorate(html, decoration, pages);
        }
        out.push_str(&html);
    }
    out
}

fn decorate(inner: String, decoration: &Value, pages: Option<&PageUrlMapper<'_>>) -> String {
    let Some(parts) = decoration.as_array() else {
        return inner;
    };
    let kind = parts.first().and_then(Value::as_str).unwrap_or_default();
    let arg = parts.get(1);

    match kind {
        "b" => html::element("b", &[], &inner),
        "i" => html::element("em", &[], &inner),
        "s" => html::element("s", &[], &inner),
        "c" => html::element("code", &[("class", "notion-inline-code")], &inner),
        "_" => html::element("span", &[("class", "notion-inline-underscore")], &inner),
        "a" => match arg.and_then(Value::as_str) {
            Some(href) => html::element("a", &[("class", "notion-link"), ("href", href)], &inner),
            None => inner,
        },
        "h" => match arg.and_then(Value::as_str) {
            Some(color) => html::element("span", &[("class", &format!("notion-{color}"))], &inner),
            None => inner,
        },
        "d" => arg
            .and_then(|d| d.get("start_date"))
            .and_then(Value::as_str)
            .and_then(DateTimeUtc::parse)
            .map(|date| escape(&date.format_short()).into_owned())
            .unwrap_or(inner),
        "p" => match arg.and_then(Value::as_str) {
            Some(id) => {
                let href = match pages {
                    Some(pages) => pages.map_raw(id),
                    None => format!("/{}", id.replace('-', "")),
                };
                html::element("a", &[("class", "notion-page-link"), ("href", &href)], &inner)
            }
            None => inner,
        },
        "e" => match arg.and_then(Value::as_str) {
            Some(tex) => html::element(
                "span",
                &[("class", "notion-equation notion-equation-inline")],
                &format!("\\({}\\)", escape(tex)),
            ),
            None => inner,
        },
        _ => inner,
    }
}
