//! Table of contents.

use crate::record::{Block, PageRecord};
use crate::utils::html::{self, escape};

use super::{RendererConfig, anchor_id};

/// One heading of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    /// 0 for `header`, 1 for `sub_header`, 2 for `sub_sub_header`.
    pub indent: usize,
}

/// Headings of `page` in document order.
///
/// Child pages are not descended into; other containers (toggles,
/// columns) are.
pub fn table_of_contents(record: &PageRecord, page: &Block) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    collect(record, page, &mut entries, 0);

    // Start at the shallowest level actually used.
    if let Some(base) = entries.iter().map(|e| e.indent).min() {
        for entry in &mut entries {
            entry.indent -= base;
        }
    }
    entries
}

fn collect(record: &PageRecord, parent: &Block, out: &mut Vec<TocEntry>, depth: usize) {
    if depth > super::MAX_DEPTH {
        return;
    }
    for block in parent.content.iter().filter_map(|id| record.block(id)) {
        let indent = match block.kind.as_str() {
            "header" => Some(0),
            "sub_header" => Some(1),
            "sub_sub_header" => Some(2),
            _ => None,
        };
        match indent {
            Some(indent) => out.push(TocEntry {
                id: anchor_id(&block.id),
                text: record.block_title(block),
                indent,
            }),
            None if !block.is_page() => collect(record, block, out, depth + 1),
            None => {}
        }
    }
}

/// Whether the table of contents is shown for these entries.
#[inline]
pub fn should_show(config: &RendererConfig, entries: &[TocEntry]) -> bool {
    config.show_table_of_contents && entries.len() >= config.min_table_of_contents_items
}

pub fn render_toc(entries: &[TocEntry]) -> String {
    let mut links = String::new();
    for entry in entries {
        let class = format!("notion-table-of-contents-item notion-toc-indent-{}", entry.indent);
        links.push_str(&html::element(
            "a",
            &[("class", &class), ("href", &format!("#{}", entry.id))],
            &escape(&entry.text),
        ));
    }
    html::element("nav", &[("class", "notion-table-of-contents")], &links)
}
