//! Diagnostic export for development builds.
//!
//! The composer hands every page it renders to a [`DebugHook`] when the
//! build is a dev build. Nothing downstream depends on what a hook does.

use serde::Serialize;

use crate::core::PageId;
use crate::debug;
use crate::page::PageMetadata;
use crate::record::{Block, PageRecord};

/// What a hook gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct DebugInfo<'a> {
    pub page_id: &'a PageId,
    pub root_page_id: Option<&'a PageId>,
    pub block: &'a Block,
    pub record: &'a PageRecord,
    pub metadata: &'a PageMetadata,
}

pub trait DebugHook: Send + Sync {
    /// Inspect a page. Returned HTML is appended to the document body.
    fn inspect(&self, info: &DebugInfo<'_>) -> Option<String>;
}

/// Logs a summary of the page under `--verbose`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDebugHook;

impl DebugHook for LogDebugHook {
    fn inspect(&self, info: &DebugInfo<'_>) -> Option<String> {
        debug!(
            "page";
            "{} title={:?} root={} blocks={} type={}",
            info.page_id,
            info.metadata.title,
            info.root_page_id.map(PageId::as_str).unwrap_or("-"),
            info.record.len(),
            info.block.kind
        );
        None
    }
}

/// Exposes the page id, root block and record map on
/// `window.__NOTION_PAGE__` for browser devtools.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalDebugHook;

#[derive(Serialize)]
struct Exported<'a> {
    page_id: &'a PageId,
    root_page_id: Option<&'a PageId>,
    title: &'a str,
    block: &'a Block,
    record: &'a PageRecord,
}

impl DebugHook for GlobalDebugHook {
    fn inspect(&self, info: &DebugInfo<'_>) -> Option<String> {
        let exported = Exported {
            page_id: info.page_id,
            root_page_id: info.root_page_id,
            title: &info.metadata.title,
            block: info.block,
            record: info.record,
        };
        let json = serde_json::to_string(&exported).ok()?;
        // `</script>` inside a string would end the element.
        let json = json.replace("</", "<\\/");
        Some(format!("<script>window.__NOTION_PAGE__ = {json};</script>"))
    }
}
