//! `[site]` section configuration.
//!
//! Site identity, page fallbacks and the landing hero.
//!
//! # Example
//!
//! ```toml
//! [site.info]
//! name = "Talking Points"
//! domain = "talkingpoints.example"
//! root_page_id = "067dd719a912471ea9a3ac10710e7fdf"
//! description = "How to answer life's toughest questions"
//! author = "Jane Doe"
//! twitter = "talkingpoints"
//!
//! [site.page]
//! cover = "/images/default-cover.jpg"
//! icon = "/favicon.png"
//! cover_position = 0.5
//!
//! [site.landing]
//! headline = "Talking Points for Life"
//! paragraphs = ["How to answer life's toughest questions."]
//!
//! [site.header]
//! styles = ["/styles/notion.css"]
//!
//! [site]
//! search = true
//! include_page_id = true
//!
//! [site.url_overrides]
//! about = "0be6efce9daf42688f65c76b89f8eb27"
//! ```

mod header;
mod info;
mod landing;
mod page;

pub use header::HeaderConfig;
pub use info::SiteInfoConfig;
pub use landing::LandingConfig;
pub use page::PageDefaultsConfig;

use macros::Config;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::core::PageId;

/// Site section configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "site")]
pub struct SiteSectionConfig {
    /// Enable the search box and the `/api/search` endpoint.
    #[config(inline_doc)]
    pub search: bool,

    /// Append the page id to URL slugs.
    #[config(inline_doc)]
    pub include_page_id: bool,

    /// Site identity.
    #[config(sub)]
    pub info: SiteInfoConfig,

    /// Fallback cover and icon.
    #[config(sub)]
    pub page: PageDefaultsConfig,

    /// Landing page hero.
    #[config(sub)]
    pub landing: LandingConfig,

    /// Extra `<head>` content.
    #[config(sub)]
    pub header: HeaderConfig,

    /// Fixed URL paths for pages, path → page id.
    #[config(skip)]
    pub url_overrides: FxHashMap<String, String>,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            search: false,
            include_page_id: true,
            info: SiteInfoConfig::default(),
            page: PageDefaultsConfig::default(),
            landing: LandingConfig::default(),
            header: HeaderConfig::default(),
            url_overrides: FxHashMap::default(),
        }
    }
}

impl SiteSectionConfig {
    /// Inverse of `url_overrides`: page id → path.
    pub fn override_paths(&self) -> FxHashMap<PageId, String> {
        self.url_overrides
            .iter()
            .filter_map(|(path, id)| {
                PageId::parse(id).map(|id| (id, path.trim_matches('/').to_owned()))
            })
            .collect()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        self.info.validate(diag);
        self.page.validate(diag);

        for (path, id) in &self.url_overrides {
            if PageId::parse(id).is_none() {
                diag.error(
                    crate::config::FieldPath::new("site.url_overrides"),
                    format!("`{path}` maps to `{id}`, which is not a notion page id"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_site_defaults() {
        let config = test_parse_config("");
        assert!(!config.site.search);
        assert!(config.site.include_page_id);
        assert!(config.site.url_overrides.is_empty());
    }

    #[test]
    fn test_url_overrides_inverse() {
        let config = test_parse_config(
            "[site.url_overrides]\nabout = \"0be6efce-9daf-4268-8f65-c76b89f8eb27\"\n\"/contact/\" = \"bad\"",
        );
        let paths = config.site.override_paths();
        assert_eq!(paths.len(), 1);
        let id = PageId::parse("0be6efce9daf42688f65c76b89f8eb27").unwrap();
        assert_eq!(paths.get(&id).map(String::as_str), Some("about"));

        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
