//! A single Notion block.

use serde::{Deserialize, Serialize};

use super::JsonMap;
use crate::utils::date::DateTimeUtc;

/// One structural unit of a page: the page itself, a paragraph, a code
/// block, an embedded collection, ...
///
/// Only the fields the renderer looks at are typed. Everything else in
/// `properties` and `format` stays raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub parent_id: String,
    pub parent_table: String,
    pub last_edited_time: Option<Timestamp>,
    /// Raw rich-text property values keyed by property id (`title`, ...).
    pub properties: JsonMap,
    pub format: BlockFormat,
    /// Child block ids in document order.
    pub content: Vec<String>,
    /// Backing collection for `collection_view` / `collection_view_page`.
    pub collection_id: Option<String>,
}

impl Block {
    /// Whether this block is a page (root pages and collection rows alike).
    #[inline]
    pub fn is_page(&self) -> bool {
        self.kind == "page"
    }

    /// Cover image of a page block, if one is set.
    pub fn page_cover(&self) -> Option<&str> {
        if !self.is_page() {
            return None;
        }
        self.format.page_cover.as_deref().filter(|s| !s.is_empty())
    }

    /// Raw value of one property.
    #[inline]
    pub fn property(&self, id: &str) -> Option<&serde_json::Value> {
        self.properties.get(id)
    }

    /// Last-edited timestamp as a calendar date.
    pub fn last_edited(&self) -> Option<DateTimeUtc> {
        self.last_edited_time.as_ref().and_then(Timestamp::to_datetime)
    }
}

/// Display hints attached to a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockFormat {
    pub page_cover: Option<String>,
    pub page_icon: Option<String>,
    pub page_cover_position: Option<f64>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Timestamp as Notion sends it: epoch milliseconds, or an ISO string from
/// hand-written fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTimeUtc> {
        match self {
            Self::Millis(ms) => DateTimeUtc::from_unix_millis(*ms),
            Self::Text(s) => DateTimeUtc::parse(s),
        }
    }
}
