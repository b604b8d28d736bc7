//! Page-level decisions: layout variant and share metadata.

mod meta;
mod variant;

pub use meta::{PageMetadata, extract_metadata};
pub use variant::{LayoutVariant, MIN_TABLE_OF_CONTENTS_ITEMS, classify};
