//! `[site.landing]` configuration.
//!
//! Hero copy shown above the content of landing pages.

use macros::Config;
use serde::{Deserialize, Serialize};

/// Landing page hero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "site.landing")]
pub struct LandingConfig {
    /// Hero headline. The hero is skipped when empty.
    #[config(inline_doc)]
    pub headline: String,

    /// Paragraphs under the headline.
    pub paragraphs: Vec<String>,

    /// Placeholder text of the hero search box.
    #[config(inline_doc)]
    pub search_placeholder: String,
}

impl LandingConfig {
    #[inline]
    pub fn has_hero(&self) -> bool {
        !self.headline.trim().is_empty()
    }
}
