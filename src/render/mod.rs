//! Block-to-HTML rendering engine.
//!
//! Renders the block tree of one record. Core block types (text, headings,
//! lists, images, links) are handled here; heavier types are dispatched to
//! the capability snapshot, with a placeholder for anything not Ready.
//!
//! # Output
//!
//! ```text
//! <div class="notion notion-app">
//!   <div class="notion-frame">
//!     [cover]
//!     <main class="notion-page">
//!       [icon] [title] [properties]
//!       <div class="notion-page-content">
//!         <article>…blocks…</article>
//!         [<aside>toc, page aside</aside>]
//!       </div>
//!     </main>
//!     [footer]
//!   </div>
//! </div>
//! ```
//!
//! Bracketed parts only appear with `full_page`.

mod blocks;
pub mod text;
mod toc;

pub use toc::{render_toc, should_show, table_of_contents};

use crate::capability::{CapabilitySnapshot, PropertyContext, PropertyFormatters};
use crate::config::SiteSectionConfig;
use crate::core::{RenderMode, RenderTarget, UrlMappers};
use crate::page::{LayoutVariant, MIN_TABLE_OF_CONTENTS_ITEMS};
use crate::record::{Block, PageRecord};
use crate::utils::html::{self, escape};

/// Nesting limit for block trees.
const MAX_DEPTH: usize = 32;

/// Engine settings. One instance serves both layout variants.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Render cover, icon, title and properties around the content.
    pub full_page: bool,
    pub preview_images: bool,
    pub show_collection_view_dropdown: bool,
    pub show_table_of_contents: bool,
    pub min_table_of_contents_items: usize,
    pub target: RenderTarget,
    pub default_page_icon: Option<String>,
    pub default_page_cover: Option<String>,
    pub default_page_cover_position: f64,
    /// HTML placed in the aside after the table of contents.
    pub page_aside: Option<String>,
    /// HTML placed after the page.
    pub footer: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            full_page: true,
            preview_images: false,
            show_collection_view_dropdown: false,
            show_table_of_contents: false,
            min_table_of_contents_items: MIN_TABLE_OF_CONTENTS_ITEMS,
            target: RenderTarget::Server,
            default_page_icon: None,
            default_page_cover: None,
            default_page_cover_position: 0.5,
            page_aside: None,
            footer: None,
        }
    }
}

impl RendererConfig {
    pub fn new(
        site: &SiteSectionConfig,
        variant: LayoutVariant,
        mode: RenderMode,
        record: &PageRecord,
    ) -> Self {
        Self {
            full_page: !mode.lite,
            preview_images: record.has_preview_images(),
            show_collection_view_dropdown: false,
            show_table_of_contents: variant.is_post(),
            min_table_of_contents_items: MIN_TABLE_OF_CONTENTS_ITEMS,
            target: mode.target,
            default_page_icon: site.page.icon.clone(),
            default_page_cover: site.page.cover.clone(),
            default_page_cover_position: site.page.cover_position,
            page_aside: None,
            footer: None,
        }
    }
}

/// Everything a block renderer may look at.
pub struct RenderContext<'a> {
    pub record: &'a PageRecord,
    pub mappers: &'a UrlMappers<'a>,
    pub formatters: &'a PropertyFormatters,
    pub capabilities: &'a CapabilitySnapshot,
    pub config: &'a RendererConfig,
}

/// Render `page` and its content.
pub fn render_page(cx: &RenderContext<'_>, page: &Block) -> String {
    let config = cx.config;
    let toc = table_of_contents(cx.record, page);
    let show_toc = should_show(config, &toc);

    let content = if page.kind.starts_with("collection_view") {
        blocks::render_block(cx, page, 0)
    } else {
        blocks::render_children(cx, page, 0)
    };

    let mut aside = String::new();
    if show_toc {
        aside.push_str(&html::element(
            "div",
            &[("class", "notion-aside-table-of-contents")],
            &format!(
                "<div class=\"notion-aside-table-of-contents-header\">Table of Contents</div>{}",
                render_toc(&toc)
            ),
        ));
    }
    if let Some(extra) = &config.page_aside {
        aside.push_str(extra);
    }

    let mut body = html::element(
        "article",
        &[("class", "notion-page-content-inner")],
        &content,
    );
    if !aside.is_empty() {
        body.push_str(&html::element("aside", &[("class", "notion-aside")], &aside));
    }
    let content_class = if aside.is_empty() {
        "notion-page-content"
    } else {
        "notion-page-content notion-page-content-has-aside"
    };

    let mut main = String::new();
    let mut cover = String::new();
    if config.full_page {
        cover = page_cover(cx, page);
        main.push_str(&page_icon(cx, page));
        main.push_str(&html::element(
            "h1",
            &[("class", "notion-title")],
            &escape(&cx.record.block_title(page)),
        ));
        main.push_str(&page_properties(cx, page));
    }
    main.push_str(&html::element("div", &[("class", content_class)], &body));

    let mut main_class = String::from("notion-page");
    if config.full_page {
        main_class.push_str(" notion-full-page");
    }
    if !cover.is_empty() {
        main_class.push_str(" notion-page-has-cover");
    }

    let mut frame = cover;
    frame.push_str(&html::element("main", &[("class", &main_class)], &main));
    if let Some(footer) = &config.footer {
        frame.push_str(footer);
    }

    html::element(
        "div",
        &[("class", "notion notion-app")],
        &html::element("div", &[("class", "notion-frame")], &frame),
    )
}

/// Header properties of a collection row page.
fn page_properties(cx: &RenderContext<'_>, page: &Block) -> String {
    let entries = cx.record.header_properties(page);
    if entries.is_empty() {
        return String::new();
    }

    let mut rows = String::new();
    for entry in entries {
        let value = cx.formatters.format(&PropertyContext::new(entry, true));
        if value.is_empty() {
            continue;
        }
        let name = html::element(
            "div",
            &[("class", "notion-collection-column-title")],
            &escape(&entry.schema.name),
        );
        let value = html::element("div", &[("class", "notion-collection-row-value")], &value);
        rows.push_str(&html::element(
            "div",
            &[("class", "notion-collection-row-property")],
            &format!("{name}{value}"),
        ));
    }

    html::element(
        "div",
        &[("class", "notion-collection-row")],
        &html::element("div", &[("class", "notion-collection-row-body")], &rows),
    )
}

fn page_cover(cx: &RenderContext<'_>, page: &Block) -> String {
    let source = page
        .page_cover()
        .map(str::to_owned)
        .or_else(|| cx.config.default_page_cover.clone());
    let Some(src) = source.and_then(|s| cx.mappers.images.map(&s, page)) else {
        return String::new();
    };

    let position = page
        .format
        .page_cover_position
        .unwrap_or(cx.config.default_page_cover_position);
    let style = format!("object-position: center {}%", (1.0 - position) * 100.0);
    html::element(
        "img",
        &[
            ("class", "notion-page-cover"),
            ("src", &src),
            ("alt", "cover"),
            ("style", &style),
        ],
        "",
    )
}

fn page_icon(cx: &RenderContext<'_>, page: &Block) -> String {
    let icon = page
        .format
        .page_icon
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| cx.config.default_page_icon.clone());
    let Some(icon) = icon else {
        return String::new();
    };

    // Emoji icons are text; everything else is an image reference.
    if icon.starts_with("http") || icon.starts_with('/') || icon.starts_with("data:") {
        let src = cx.mappers.images.map(&icon, page).unwrap_or(icon);
        html::element(
            "img",
            &[("class", "notion-page-icon"), ("src", &src), ("alt", "icon")],
            "",
        )
    } else {
        html::element(
            "span",
            &[("class", "notion-page-icon"), ("role", "img")],
            &escape(&icon),
        )
    }
}

/// Anchor id of a heading: the block id without dashes.
pub fn anchor_id(id: &str) -> String {
    id.replace('-', "")
}
