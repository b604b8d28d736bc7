//! Per-block rendering.

use crate::capability::{CapabilityKind, LoadState};
use crate::record::{Block, text};
use crate::utils::html::{self, escape};
use crate::debug;

use super::text::rich_text_linked;
use super::toc::{render_toc, table_of_contents};
use super::{MAX_DEPTH, RenderContext, anchor_id};

/// Children of `parent`, with consecutive list items grouped.
pub fn render_children(cx: &RenderContext<'_>, parent: &Block, depth: usize) -> String {
    if depth > MAX_DEPTH {
        return String::new();
    }

    let mut out = String::new();
    let mut list: Option<(&str, String)> = None;

    for child in parent.content.iter().filter_map(|id| cx.record.block(id)) {
        let list_tag = match child.kind.as_str() {
            "bulleted_list" => Some("ul"),
            "numbered_list" => Some("ol"),
            _ => None,
        };

        if let Some((tag, items)) = list.take() {
            if Some(tag) == list_tag {
                list = Some((tag, items));
            } else {
                out.push_str(&close_list(tag, &items));
            }
        }

        let rendered = render_block(cx, child, depth + 1);
        match (list_tag, list.as_mut()) {
            (Some(_), Some((_, items))) => items.push_str(&rendered),
            (Some(tag), None) => list = Some((tag, rendered)),
            (None, _) => out.push_str(&rendered),
        }
    }

    if let Some((tag, items)) = list {
        out.push_str(&close_list(tag, &items));
    }
    out
}

fn close_list(tag: &str, items: &str) -> String {
    let class = if tag == "ul" {
        "notion-list notion-list-disc"
    } else {
        "notion-list notion-list-numbered"
    };
    html::element(tag, &[("class", class)], items)
}

pub fn render_block(cx: &RenderContext<'_>, block: &Block, depth: usize) -> String {
    let title = || {
        block
            .property("title")
            .map(|v| rich_text_linked(v, &cx.mappers.pages))
            .unwrap_or_default()
    };
    let children = || render_children(cx, block, depth);

    if let Some(kind) = CapabilityKind::for_block_type(&block.kind)
        && kind != CapabilityKind::Modal
    {
        return capability_block(cx, kind, block);
    }

    match block.kind.as_str() {
        "text" => {
            let body = title();
            let class = if body.is_empty() {
                "notion-text notion-blank"
            } else {
                "notion-text"
            };
            let mut out = html::element("div", &[("class", class)], &body);
            out.push_str(&children());
            out
        }
        "header" | "sub_header" | "sub_sub_header" => {
            let (tag, level) = match block.kind.as_str() {
                "header" => ("h2", "notion-h1"),
                "sub_header" => ("h3", "notion-h2"),
                _ => ("h4", "notion-h3"),
            };
            html::element(
                tag,
                &[
                    ("class", &format!("notion-h {level}")),
                    ("id", &anchor_id(&block.id)),
                ],
                &title(),
            )
        }
        "bulleted_list" | "numbered_list" => {
            html::element("li", &[], &format!("{}{}", title(), children()))
        }
        "to_do" => {
            let checked = block
                .property("checked")
                .map(text::plain)
                .is_some_and(|v| v == "Yes");
            let class = if checked {
                "notion-to-do-item notion-to-do-checked"
            } else {
                "notion-to-do-item"
            };
            let box_ = if checked { "☑" } else { "☐" };
            html::element(
                "div",
                &[("class", class)],
                &format!(
                    "<span class=\"notion-property-checkbox\">{box_}</span> {}{}",
                    title(),
                    children()
                ),
            )
        }
        "quote" => html::element(
            "blockquote",
            &[("class", "notion-quote")],
            &format!("{}{}", title(), children()),
        ),
        "callout" => {
            let icon = block.format.page_icon.as_deref().unwrap_or_default();
            html::element(
                "div",
                &[("class", "notion-callout")],
                &format!(
                    "<span class=\"notion-callout-icon\">{}</span><div class=\"notion-callout-text\">{}{}</div>",
                    escape(icon),
                    title(),
                    children()
                ),
            )
        }
        "divider" => html::element("hr", &[("class", "notion-hr")], ""),
        "toggle" => html::element(
            "details",
            &[("class", "notion-toggle")],
            &format!("<summary>{}</summary><div>{}</div>", title(), children()),
        ),
        "column_list" => html::element("div", &[("class", "notion-row")], &children()),
        "column" => html::element("div", &[("class", "notion-column")], &children()),
        "image" => image_block(cx, block),
        "bookmark" => {
            let link = block
                .property("link")
                .map(text::plain)
                .unwrap_or_default();
            if link.is_empty() {
                return String::new();
            }
            let label = match title() {
                t if t.is_empty() => escape(&link).into_owned(),
                t => t,
            };
            html::element(
                "a",
                &[("class", "notion-bookmark"), ("href", &link)],
                &html::element("div", &[("class", "notion-bookmark-title")], &label),
            )
        }
        "page" => {
            let label = escape(&cx.record.block_title(block)).into_owned();
            html::element(
                "a",
                &[
                    ("class", "notion-page-link"),
                    ("href", &cx.mappers.pages.map_raw(&block.id)),
                ],
                &html::element("span", &[("class", "notion-page-title")], &label),
            )
        }
        "table_of_contents" => {
            // Inline TOC of the page this block sits in.
            let page = cx.record.root().unwrap_or(block);
            render_toc(&table_of_contents(cx.record, page))
        }
        other => {
            debug!("render"; "unsupported block type `{}` ({})", other, block.id);
            String::new()
        }
    }
}

/// Image with caption; the zoom overlay comes from the modal capability.
fn image_block(cx: &RenderContext<'_>, block: &Block) -> String {
    let source = block
        .property("source")
        .map(|v| text::first_link(v).map(str::to_owned).unwrap_or_else(|| text::plain(v)))
        .or_else(|| {
            block
                .format
                .extra
                .get("display_source")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_default();
    let Some(src) = cx.mappers.images.map(&source, block) else {
        return String::new();
    };

    let caption = block
        .property("caption")
        .map(|v| rich_text_linked(v, &cx.mappers.pages))
        .unwrap_or_default();

    let loading = if cx.config.preview_images { "lazy" } else { "eager" };
    let mut figure = html::element(
        "img",
        &[("src", &src), ("alt", &text_alt(block)), ("loading", loading)],
        "",
    );
    figure.push_str(&capability_block(cx, CapabilityKind::Modal, block));
    if !caption.is_empty() {
        figure.push_str(&html::element(
            "figcaption",
            &[("class", "notion-asset-caption")],
            &caption,
        ));
    }

    html::element("figure", &[("class", "notion-asset-wrapper notion-asset-wrapper-image")], &figure)
}

fn text_alt(block: &Block) -> String {
    block
        .property("caption")
        .map(text::plain)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "notion image".to_owned())
}

/// Dispatch to a capability, or a placeholder when it isn't Ready.
fn capability_block(cx: &RenderContext<'_>, kind: CapabilityKind, block: &Block) -> String {
    match cx.capabilities.state(kind) {
        LoadState::Ready(component) => component.render(block, cx),
        _ if kind.is_client_only() => {
            if cx.config.target.is_server() {
                hydration_placeholder(kind, block)
            } else {
                String::new()
            }
        }
        _ => {
            let fallback = block
                .property("title")
                .map(text::plain)
                .unwrap_or_default();
            html::element(
                "div",
                &[
                    ("class", "notion-capability-placeholder"),
                    ("data-capability", kind.name()),
                    ("data-block-id", &block.id),
                ],
                &html::element("pre", &[], &escape(&fallback)),
            )
        }
    }
}

/// Marker the client mounts a client-only renderer into.
fn hydration_placeholder(kind: CapabilityKind, block: &Block) -> String {
    html::element(
        "div",
        &[
            ("class", "notion-hydrate"),
            ("data-capability", kind.name()),
            ("data-block-id", &block.id),
        ],
        "",
    )
}

#[cfg(test)]
mod tests {
    use super::super::tests::render_root;
    use crate::capability::{CapabilitySnapshot, CapabilityTable, Loaders};
    use crate::config::test_parse_config;
    use crate::core::{RenderMode, RenderTarget};
    use crate::record::fixtures::{parse, wrap};
    use serde_json::{Value, json};

    fn page_with(children: Value) -> Value {
        let mut blocks = json!({
            "p": wrap(json!({
                "id": "p",
                "type": "page",
                "parent_table": "space",
                "properties": {"title": [["Page"]]},
                "content": children.as_object().unwrap().keys().cloned().collect::<Vec<_>>()
            }))
        });
        for (id, value) in children.as_object().unwrap() {
            let mut value = value.clone();
            value["id"] = json!(id);
            blocks[id] = wrap(value);
        }
        json!({ "block": blocks })
    }

    #[test]
    fn test_lists_grouped() {
        let config = test_parse_config("");
        let record = parse(&page_with(json!({
            "a": {"type": "bulleted_list", "properties": {"title": [["one"]]}},
            "b": {"type": "bulleted_list", "properties": {"title": [["two"]]}},
            "c": {"type": "numbered_list", "properties": {"title": [["three"]]}},
            "d": {"type": "text", "properties": {"title": [["end"]]}}
        })));
        let html = render_root(&config, &record, &CapabilitySnapshot::default(), RenderMode::PRODUCTION);

        assert!(html.contains(
            "<ul class=\"notion-list notion-list-disc\"><li>one</li><li>two</li></ul>\
             <ol class=\"notion-list notion-list-numbered\"><li>three</li></ol>\
             <div class=\"notion-text\">end</div>"
        ));
    }

    #[test]
    fn test_image_server_pass_leaves_hydration_marker() {
        let config = test_parse_config("");
        let record = parse(&page_with(json!({
            "i": {"type": "image", "properties": {"source": [["/images/cat.png"]]}},
            "f": {"type": "pdf", "properties": {"source": [["https://example.com/a.pdf"]]}}
        })));
        let html = render_root(&config, &record, &CapabilitySnapshot::default(), RenderMode::PRODUCTION);

        assert!(html.contains("https://www.notion.so/image/"));
        assert!(html.contains("<div class=\"notion-hydrate\" data-capability=\"modal\" data-block-id=\"i\"></div>"));
        assert!(html.contains("data-capability=\"pdf\""));
        assert!(!html.contains("application/pdf"));
    }

    #[tokio::test]
    async fn test_browser_pass_renders_client_only() {
        let config = test_parse_config("[build]\ntarget = \"browser\"");
        let table = CapabilityTable::resolve(Loaders::from_config(&config.build));
        let record = parse(&page_with(json!({
            "i": {"type": "image", "properties": {"source": [["/images/cat.png"]]}},
            "f": {"type": "pdf", "properties": {"source": [["https://example.com/a.pdf"]]}}
        })));
        table
            .prepare(&crate::capability::required_capabilities(&record), RenderTarget::Browser)
            .await;

        let mode = RenderMode::from_config(&config.build);
        let html = render_root(&config, &record, &table.snapshot(), mode);
        assert!(html.contains("application/pdf"));
        assert!(html.contains("data-app-element=\".notion-viewport\""));
        assert!(!html.contains("notion-hydrate"));
    }

    #[test]
    fn test_tweet_always_available() {
        let config = test_parse_config("");
        let table = CapabilityTable::resolve(Loaders::default());
        let record = parse(&page_with(json!({
            "t": {"type": "tweet", "properties": {"source": [["https://twitter.com/a/status/42"]]}}
        })));
        let html = render_root(&config, &record, &table.snapshot(), RenderMode::PRODUCTION);
        assert!(html.contains("https://twitter.com/i/status/42"));
    }

    #[test]
    fn test_child_page_link() {
        let config = test_parse_config("");
        let record = parse(&page_with(json!({
            "4c1a2b3c-d4e5-4f60-8a9b-0c1d2e3f4a5b": {"type": "page", "properties": {"title": [["Sub Page"]]}}
        })));
        let html = render_root(&config, &record, &CapabilitySnapshot::default(), RenderMode::PRODUCTION);
        assert!(html.contains("href=\"/sub-page-4c1a2b3cd4e54f608a9b0c1d2e3f4a5b\""));
    }
}
