//! Notion record maps.
//!
//! A record map is what a Notion client returns for one page: every block
//! reachable from the page plus the collections those blocks belong to.
//!
//! ```text
//! {
//!   "block":            { "<uuid>": { "role": "reader", "value": Block } },
//!   "collection":       { "<uuid>": { "value": Collection } },
//!   "collection_query": { "<collection>": { "<view>": { "blockIds": [...] } } },
//!   "preview_images":   { ... }
//! }
//! ```
//!
//! The first block in document order is the page being rendered.

mod block;
mod collection;
pub mod text;

pub use block::Block;
#[cfg(test)]
pub use block::Timestamp;
pub use collection::{Collection, PropertySchema};

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::PageId;

/// A JSON object map with insertion order preserved.
pub type JsonMap = serde_json::Map<String, Value>;

/// Errors raised while reading a record map.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed record map")]
    Json(#[from] serde_json::Error),
}

impl RecordError {
    /// The input ended early: the record is still being written.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Json(e) if e.is_eof())
    }

    /// No record exists for the requested page.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Io(_, e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[derive(Deserialize)]
struct Entry {
    value: Option<Value>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawRecordMap {
    block: JsonMap,
    collection: JsonMap,
    collection_query: JsonMap,
    preview_images: Option<JsonMap>,
}

/// Parsed, read-only record map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageRecord {
    blocks: Vec<Block>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
    collections: FxHashMap<String, Collection>,
    /// Row ids per collection, merged across views.
    rows: FxHashMap<String, Vec<String>>,
    preview_images: bool,
    /// The first block entry parsed, so `blocks[0]` is the page itself.
    #[serde(skip)]
    has_root: bool,
}

impl PageRecord {
    /// Parse a record map from JSON text.
    pub fn from_json(content: &str) -> Result<Self, RecordError> {
        let raw: RawRecordMap = serde_json::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    /// Read and parse a record map file.
    pub fn from_path(path: &Path) -> Result<Self, RecordError> {
        let content =
            fs::read_to_string(path).map_err(|err| RecordError::Io(path.to_path_buf(), err))?;
        Self::from_json(&content)
    }

    fn from_raw(raw: RawRecordMap) -> Self {
        let mut record = Self {
            preview_images: raw.preview_images.is_some_and(|m| !m.is_empty()),
            ..Self::default()
        };

        // Entries without a value are blocks the reader had no access to.
        for (position, (key, entry)) in raw.block.into_iter().enumerate() {
            let Some(value) = entry_value(entry) else {
                continue;
            };
            let Ok(mut block) = serde_json::from_value::<Block>(value) else {
                continue;
            };
            if position == 0 {
                record.has_root = true;
            }
            if block.id.is_empty() {
                block.id = key;
            }
            let id = index_key(&block.id);
            record.index.insert(id, record.blocks.len());
            record.blocks.push(block);
        }

        for (key, entry) in raw.collection {
            let Some(value) = entry_value(entry) else {
                continue;
            };
            if let Ok(mut collection) = Collection::from_value(value) {
                if collection.id.is_empty() {
                    collection.id = key;
                }
                record
                    .collections
                    .insert(index_key(&collection.id), collection);
            }
        }

        for (collection_id, views) in raw.collection_query {
            let mut ids: Vec<String> = Vec::new();
            for view in views.as_object().into_iter().flat_map(|v| v.values()) {
                for id in query_block_ids(view) {
                    if !ids.iter().any(|seen| seen == id) {
                        ids.push(id.to_string());
                    }
                }
            }
            record.rows.insert(index_key(&collection_id), ids);
        }

        record
    }

    /// The page being rendered: first block in document order.
    pub fn root(&self) -> Option<&Block> {
        if self.has_root { self.blocks.first() } else { None }
    }

    /// Look up a block by id in either spelling.
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.index.get(&index_key(id)).map(|&i| &self.blocks[i])
    }

    /// All blocks in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.get(&index_key(id))
    }

    /// Row blocks of a collection that are present in this record.
    pub fn collection_rows(&self, collection_id: &str) -> Vec<&Block> {
        self.rows
            .get(&index_key(collection_id))
            .map(|ids| ids.iter().filter_map(|id| self.block(id)).collect())
            .unwrap_or_default()
    }

    /// Whether the record carries LQIP preview images.
    pub fn has_preview_images(&self) -> bool {
        self.preview_images
    }

    /// Collection a page block is a row of.
    pub fn parent_collection(&self, block: &Block) -> Option<&Collection> {
        if block.parent_table != "collection" {
            return None;
        }
        self.collection(&block.parent_id)
    }

    /// Human-readable title of a block.
    ///
    /// Collection views take the collection's name.
    pub fn block_title(&self, block: &Block) -> String {
        if block.kind.starts_with("collection_view")
            && let Some(collection) = block
                .collection_id
                .as_deref()
                .and_then(|id| self.collection(id))
        {
            return collection.name.clone();
        }

        block
            .property("title")
            .map(text::plain)
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    /// Value of a named page property, as text.
    ///
    /// The name is matched case-insensitively against the parent collection
    /// schema. Empty values count as absent.
    pub fn page_property(&self, name: &str, block: &Block) -> Option<String> {
        let collection = self.parent_collection(block)?;
        let (id, schema) = collection.property_named(name)?;

        let value = match schema.kind.as_str() {
            "last_edited_time" => block.last_edited().map(|dt| dt.to_rfc3339()),
            _ => {
                let data = block.property(id)?;
                match schema.kind.as_str() {
                    "date" => text::date_start(data).map(str::to_string),
                    "file" | "url" => text::first_link(data)
                        .map(str::to_string)
                        .or_else(|| Some(text::plain(data))),
                    _ => Some(text::plain(data)),
                }
            }
        }?;

        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Properties shown in a page header, in schema order.
    ///
    /// The title column is skipped; it is rendered as the page heading.
    pub fn header_properties<'a>(&'a self, block: &'a Block) -> Vec<PropertyEntry<'a>> {
        let Some(collection) = self.parent_collection(block) else {
            return Vec::new();
        };

        collection
            .schema
            .iter()
            .filter(|(_, schema)| schema.kind != "title")
            .filter_map(|(id, schema)| {
                let data = block.property(id);
                // Computed timestamps have no stored value.
                if data.is_none() && schema.kind != "last_edited_time" {
                    return None;
                }
                Some(PropertyEntry {
                    id,
                    schema,
                    data,
                    block,
                })
            })
            .collect()
    }
}

/// Record map files under `dir`, keyed by the page id in their file name.
///
/// Files whose stem is not a page id are skipped. Sorted by path.
pub fn collect_record_files(dir: &Path) -> Vec<(PageId, PathBuf)> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                return None;
            }
            let id = PageId::parse(path.file_stem()?.to_str()?)?;
            Some((id, path))
        })
        .collect();
    files.sort_by(|a, b| a.1.cmp(&b.1));
    files
}

/// One property of a page, ready for formatting.
#[derive(Debug, Clone, Copy)]
pub struct PropertyEntry<'a> {
    pub id: &'a str,
    pub schema: &'a PropertySchema,
    pub data: Option<&'a Value>,
    pub block: &'a Block,
}

/// Unwrap `{ "value": ... }`, also tolerating the doubly wrapped shape of
/// newer Notion responses.
fn entry_value(entry: Value) -> Option<Value> {
    let value = serde_json::from_value::<Entry>(entry).ok()?.value?;
    match value.get("value") {
        Some(inner) if inner.get("id").is_some() => Some(inner.clone()),
        _ => Some(value),
    }
}

fn query_block_ids(view: &Value) -> impl Iterator<Item = &str> {
    let direct = view.get("blockIds");
    let grouped = view
        .get("collection_group_results")
        .and_then(|g| g.get("blockIds"));
    [direct, grouped]
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_str)
}

/// Normalize an id for map lookups: compact page id when it parses,
/// otherwise the key as given.
fn index_key(id: &str) -> String {
    PageId::parse(id)
        .map(String::from)
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Record map builders shared by tests across the crate.

    use serde_json::{Value, json};

    pub const ROOT_ID: &str = "067dd719-a912-471e-a9a3-ac10710e7fdf";
    pub const POST_ID: &str = "4c1a2b3c-d4e5-4f60-8a9b-0c1d2e3f4a5b";
    pub const COLLECTION_ID: &str = "9f8e7d6c-5b4a-4392-8170-6f5e4d3c2b1a";

    pub fn wrap(value: Value) -> Value {
        json!({ "role": "reader", "value": value })
    }

    /// A blog post: page row of a collection with author/published/edited
    /// columns, three headers and a code block.
    pub fn post_record() -> Value {
        json!({
            "block": {
                POST_ID: wrap(json!({
                    "id": POST_ID,
                    "type": "page",
                    "parent_id": COLLECTION_ID,
                    "parent_table": "collection",
                    "last_edited_time": 1_678_838_400_000_i64,
                    "properties": {
                        "title": [["Talking to your landlord"]],
                        "auth": [["Jane Doe"]],
                        "pubd": [["‣", [["d", {"type": "date", "start_date": "2023-01-20"}]]]],
                        "desc": [["How to ask for repairs"]]
                    },
                    "format": {"page_cover": "/images/page-cover/woodcuts_1.jpg"},
                    "content": ["h1", "h2", "h3", "c1"]
                })),
                "h1": wrap(json!({"id": "h1", "type": "header", "properties": {"title": [["Before"]]}})),
                "h2": wrap(json!({"id": "h2", "type": "sub_header", "properties": {"title": [["During"]]}})),
                "h3": wrap(json!({"id": "h3", "type": "sub_header", "properties": {"title": [["After"]]}})),
                "c1": wrap(json!({
                    "id": "c1",
                    "type": "code",
                    "properties": {"title": [["fn main() {}"]], "language": [["Rust"]]}
                }))
            },
            "collection": {
                COLLECTION_ID: {"value": {
                    "id": COLLECTION_ID,
                    "name": [["Posts"]],
                    "schema": {
                        "title": {"name": "Name", "type": "title"},
                        "auth": {"name": "Author", "type": "text"},
                        "pubd": {"name": "Published", "type": "date"},
                        "edit": {"name": "Updated", "type": "last_edited_time"},
                        "desc": {"name": "Description", "type": "text"}
                    }
                }}
            }
        })
    }

    /// A landing page: top-level page with plain text.
    pub fn landing_record() -> Value {
        json!({
            "block": {
                ROOT_ID: wrap(json!({
                    "id": ROOT_ID,
                    "type": "page",
                    "parent_id": "space",
                    "parent_table": "space",
                    "properties": {"title": [["Talking Points"]]},
                    "content": ["t1"]
                })),
                "t1": wrap(json!({"id": "t1", "type": "text", "properties": {"title": [["Welcome"]]}}))
            }
        })
    }

    pub fn parse(value: &Value) -> super::PageRecord {
        super::PageRecord::from_json(&value.to_string()).unwrap()
    }
}
