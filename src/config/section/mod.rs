//! Configuration section definitions.
//!
//! Each module corresponds to a section in `site.toml`:
//!
//! | Module  | TOML Section | Purpose                                  |
//! |---------|--------------|------------------------------------------|
//! | `build` | `[build]`    | Record/output paths, target, grammars    |
//! | `serve` | `[serve]`    | Page server                              |
//! | `site`  | `[site]`     | Site identity, page defaults, landing    |

pub mod build;
mod serve;
pub mod site;

pub use build::BuildSectionConfig;
#[cfg(test)]
pub use build::DEFAULT_GRAMMARS;
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
