//! Search engine and share-card output.

mod head;
mod image;

pub use head::PageHead;
pub use image::ImageUrlMapper;
