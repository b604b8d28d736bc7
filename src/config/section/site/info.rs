//! `[site.info]` configuration.
//!
//! Describes the deployed site: where it lives, what it is called and
//! which Notion page is its root.

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::core::PageId;

/// Site identity used for titles, canonical URLs and share cards.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "site.info")]
pub struct SiteInfoConfig {
    /// Site name, also the fallback page title.
    #[config(inline_doc)]
    pub name: String,

    /// Bare domain the site is deployed on (e.g., "example.com").
    #[config(inline_doc)]
    pub domain: String,

    /// Notion id of the page served at `/`.
    #[config(inline_doc)]
    pub root_page_id: String,

    /// Fallback description for pages without a "Description" property.
    #[config(inline_doc)]
    pub description: String,

    /// Author name.
    #[config(inline_doc)]
    pub author: String,

    /// Language code (e.g., "en", "zh-Hans").
    #[config(default = "en", inline_doc)]
    pub language: String,

    /// Twitter handle without the `@`, used for twitter:site/creator.
    #[config(inline_doc)]
    pub twitter: Option<String>,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            domain: String::new(),
            root_page_id: String::new(),
            description: String::new(),
            author: String::new(),
            language: "en".into(),
            twitter: None,
        }
    }
}

impl SiteInfoConfig {
    /// Parsed root page id.
    pub fn root_page_id(&self) -> Option<PageId> {
        PageId::parse(&self.root_page_id)
    }

    /// Validate site identity.
    ///
    /// # Checks
    /// - `name` is set
    /// - `domain` is a bare host, no scheme or path
    /// - `root_page_id` is a Notion id
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.name,
                "site name is empty",
                "it is used as the fallback page title",
            );
        }

        if self.domain.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.domain,
                "domain is not configured",
                format!("set {}, e.g.: \"example.com\"", Self::FIELDS.domain),
            );
        } else {
            match url::Url::parse(&format!("https://{}", self.domain)) {
                Ok(parsed)
                    if !self.domain.contains("://")
                        && parsed.path() == "/"
                        && !self.domain.ends_with('/') => {}
                Ok(_) => diag.error_with_hint(
                    Self::FIELDS.domain,
                    format!("`{}` is not a bare domain", self.domain),
                    "drop the scheme and path, e.g.: \"example.com\"",
                ),
                Err(e) => diag.error(Self::FIELDS.domain, format!("invalid domain: {e}")),
            }
        }

        if self.root_page_id().is_none() {
            diag.error_with_hint(
                Self::FIELDS.root_page_id,
                format!("`{}` is not a notion page id", self.root_page_id),
                "copy the 32 character id from the page URL",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_info_parse() {
        let config = test_parse_config("twitter = \"talkingpoints\"");
        assert_eq!(config.site.info.name, "Test");
        assert_eq!(config.site.info.language, "en");
        assert_eq!(config.site.info.twitter.as_deref(), Some("talkingpoints"));
        assert!(config.site.info.root_page_id().is_some());
    }

    #[test]
    fn test_info_valid() {
        let config = test_parse_config("");
        let mut diag = ConfigDiagnostics::new();
        config.site.info.validate(&mut diag);
        assert!(diag.is_empty(), "{:?}", diag.errors());
    }

    #[test]
    fn test_domain_with_scheme_rejected() {
        let mut config = test_parse_config("");
        config.site.info.domain = "https://example.com".into();
        let mut diag = ConfigDiagnostics::new();
        config.site.info.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_domain_with_path_rejected() {
        let mut config = test_parse_config("");
        config.site.info.domain = "example.com/blog".into();
        let mut diag = ConfigDiagnostics::new();
        config.site.info.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_bad_root_page_id() {
        let mut config = test_parse_config("");
        config.site.info.root_page_id = "home".into();
        config.site.info.name = String::new();
        let mut diag = ConfigDiagnostics::new();
        config.site.info.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
