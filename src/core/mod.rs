//! Core types shared across the codebase.

mod id;
mod mode;
mod state;
mod url;

pub use id::PageId;
pub use mode::{RenderMode, RenderTarget};
pub use state::{is_serving, is_shutdown, register_server, set_serving, setup_shutdown_handler};
pub use url::{PageRequest, PageUrlMapper, UrlMappers};
