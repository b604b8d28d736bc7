//! Block renderers behind the capability table.

mod code;
mod collection;
mod equation;
mod modal;
mod pdf;
mod tweet;

pub use code::CodeBlock;
pub use collection::CollectionView;
pub use equation::EquationBlock;
pub use modal::ModalOverlay;
pub use pdf::PdfViewer;
pub use tweet::TweetEmbed;

use crate::record::{Block, text};

/// Link or text of a block's `source` property.
fn source_url(block: &Block) -> Option<String> {
    let value = block.property("source")?;
    let url = text::first_link(value)
        .map(str::to_owned)
        .unwrap_or_else(|| text::plain(value));
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_owned())
}
