//! Optional rich-content renderers.
//!
//! The generic engine renders text, headings and lists itself. Everything
//! heavier (highlighted code, embedded databases, equations, PDFs, image
//! zoom, tweets) is a *capability*: a renderer that is loaded on demand and
//! looked up by kind.
//!
//! # Module Structure
//!
//! ```text
//! capability/
//! ├── kind.rs        # CapabilityKind, block type → kind
//! ├── state.rs       # LoadState, BlockComponent
//! ├── table.rs       # CapabilityTable: resolve, prepare, snapshot
//! ├── loader.rs      # CapabilityLoader trait, default loaders
//! ├── grammar.rs     # Syntax grammars for the code renderer
//! ├── component/     # The renderers themselves
//! └── property.rs    # Page property formatter chain
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! NotRequested ──prepare()──► Loading ──► Ready(component)
//!                                     └──► Failed(reason)
//! ```
//!
//! Client-only kinds (`pdf`, `modal`) stay `NotRequested` through a server
//! pass; the engine leaves a hydration placeholder in their place.

mod component;
mod error;
pub mod grammar;
mod kind;
mod loader;
pub mod property;
mod state;
mod table;

pub use error::CapabilityError;
pub use kind::CapabilityKind;
pub use loader::Loaders;
pub use property::{PropertyContext, PropertyFormatters};
pub use state::{BlockComponent, LoadState};
pub use table::{CapabilitySnapshot, CapabilityTable, PrepareReport, required_capabilities};
