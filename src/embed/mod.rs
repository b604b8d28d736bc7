//! Standalone HTML pages compiled into the binary.
//!
//! - [`LoadingPage`] - shown while a record is still being written
//! - [`NotFoundPage`] - shown for missing or unreadable records
//!
//! Templates carry `__NAME__` markers. [`fill`] replaces them in a single
//! scan, so a value that happens to contain a marker is written out as-is.

use crate::utils::html::escape;

const LOADING: &str = include_str!("pages/loading.html");
const NOT_FOUND: &str = include_str!("pages/not_found.html");

/// Placeholder page, refreshes itself until the record is ready.
#[derive(Debug, Clone, Copy)]
pub struct LoadingPage<'a> {
    pub title: &'a str,
    pub lang: &'a str,
}

impl LoadingPage<'_> {
    pub fn render(&self) -> String {
        let (lang, title) = (escape(self.lang), escape(self.title));
        fill(LOADING, &[("LANG", &*lang), ("TITLE", &*title)])
    }
}

/// Not-found page with the reason a page could not be shown.
#[derive(Debug, Clone, Copy)]
pub struct NotFoundPage<'a> {
    pub site_name: Option<&'a str>,
    pub lang: &'a str,
    pub page_id: Option<&'a str>,
    pub error: Option<&'a str>,
}

impl NotFoundPage<'_> {
    pub fn render(&self) -> String {
        let title = match self.site_name {
            Some(name) if !name.is_empty() => format!("{name} - Page Not Found"),
            _ => "Page Not Found".to_owned(),
        };
        let (lang, title, detail) = (escape(self.lang), escape(&title), self.detail());
        fill(
            NOT_FOUND,
            &[("LANG", &*lang), ("TITLE", &*title), ("DETAIL", detail.as_str())],
        )
    }

    fn detail(&self) -> String {
        match (self.error, self.page_id) {
            (Some(error), _) => format!("<p class=\"error\">{}</p>", escape(error)),
            (None, Some(id)) => format!(
                "<p>Make sure that Notion page <code>{}</code> is publicly accessible.</p>",
                escape(id)
            ),
            (None, None) => String::new(),
        }
    }
}

/// Replace each `__KEY__` in `template` with its value. Unknown markers
/// are kept.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("__") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("__").and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("__");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_escapes_title() {
        let html = LoadingPage {
            title: "A & B",
            lang: "en",
        }
        .render();
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<html lang=\"en\">"));
    }

    #[test]
    fn test_not_found_prefers_error() {
        let html = NotFoundPage {
            site_name: Some("Site"),
            lang: "en",
            page_id: Some("abc"),
            error: Some("malformed <record>"),
        }
        .render();
        assert!(html.contains("<title>Site - Page Not Found</title>"));
        assert!(html.contains("malformed &lt;record&gt;"));
        assert!(!html.contains("publicly accessible"));
    }

    #[test]
    fn test_not_found_page_id_hint() {
        let html = NotFoundPage {
            site_name: None,
            lang: "en",
            page_id: Some("abc"),
            error: None,
        }
        .render();
        assert!(html.contains("<title>Page Not Found</title>"));
        assert!(html.contains("<code>abc</code> is publicly accessible"));
    }

    #[test]
    fn test_values_are_not_filled_again() {
        let html = NotFoundPage {
            site_name: Some("__DETAIL__"),
            lang: "en",
            page_id: None,
            error: Some("__TITLE__"),
        }
        .render();
        assert!(html.contains("<title>__DETAIL__ - Page Not Found</title>"));
        assert!(html.contains("<p class=\"error\">__TITLE__</p>"));
    }

    #[test]
    fn test_fill_keeps_unknown_markers() {
        assert_eq!(fill("a __X__ b __Y__", &[("Y", "1")]), "a __X__ b 1");
        assert_eq!(fill("snake__case", &[]), "snake__case");
        assert_eq!(fill("____A__", &[("A", "v")]), "__v");
    }
}
