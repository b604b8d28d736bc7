//! `[site.page]` configuration.
//!
//! Fallback cover and icon for pages that don't set their own.

use macros::Config;
use serde::{Deserialize, Serialize};

/// Page-level fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "site.page")]
pub struct PageDefaultsConfig {
    /// Cover image used when a page has neither "Social Image" nor a cover.
    pub cover: Option<String>,

    /// Icon used when a page has none.
    pub icon: Option<String>,

    /// Vertical cover position, 0.0 (top) to 1.0 (bottom).
    #[config(inline_doc)]
    pub cover_position: f64,
}

impl Default for PageDefaultsConfig {
    fn default() -> Self {
        Self {
            cover: None,
            icon: None,
            cover_position: 0.5,
        }
    }
}

impl PageDefaultsConfig {
    /// Whether `url` is one of the configured fallbacks.
    ///
    /// Fallbacks are site assets and must not be proxied like Notion uploads.
    pub fn is_default_asset(&self, url: &str) -> bool {
        self.cover.as_deref() == Some(url) || self.icon.as_deref() == Some(url)
    }

    pub fn validate(&self, diag: &mut crate::config::ConfigDiagnostics) {
        if !(0.0..=1.0).contains(&self.cover_position) {
            diag.error_with_hint(
                Self::FIELDS.cover_position,
                format!("{} is out of range", self.cover_position),
                "use a value between 0.0 and 1.0",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_page_defaults() {
        let config = test_parse_config("");
        assert!(config.site.page.cover.is_none());
        assert_eq!(config.site.page.cover_position, 0.5);
    }

    #[test]
    fn test_is_default_asset() {
        let config = test_parse_config("[site.page]\ncover = \"/cover.jpg\"\nicon = \"/icon.png\"");
        assert!(config.site.page.is_default_asset("/cover.jpg"));
        assert!(config.site.page.is_default_asset("/icon.png"));
        assert!(!config.site.page.is_default_asset("/other.jpg"));
    }

    #[test]
    fn test_cover_position_range() {
        let config = test_parse_config("[site.page]\ncover_position = 1.5");
        let mut diag = ConfigDiagnostics::new();
        config.site.page.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
