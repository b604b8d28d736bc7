//! Share and SEO metadata of a page.
//!
//! Every field has a fallback, so extraction never fails:
//!
//! | Field              | Source, in order                                        |
//! |--------------------|---------------------------------------------------------|
//! | `title`            | block title → `site.info.name`                          |
//! | `description`      | "Description" property → `site.info.description`        |
//! | `social_image_url` | "Social Image" property → page cover → `site.page.cover` |
//! | `canonical_url`    | canonical mapper, omitted in dev builds                 |

use serde::Serialize;

use crate::config::SiteSectionConfig;
use crate::core::{PageId, RenderMode, UrlMappers};
use crate::record::PageRecord;

/// Metadata surfaced in `<head>` for sharing and search engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// Never empty.
    pub title: String,
    pub description: String,
    pub social_image_url: Option<String>,
    pub canonical_url: Option<String>,
}

/// Extract metadata for the root page of `record`.
pub fn extract_metadata(
    site: &SiteSectionConfig,
    record: &PageRecord,
    page_id: &PageId,
    mappers: &UrlMappers<'_>,
    mode: RenderMode,
) -> PageMetadata {
    let root = record.root();

    let title = root
        .map(|block| record.block_title(block))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| site.info.name.clone());

    let description = root
        .and_then(|block| record.page_property("Description", block))
        .unwrap_or_else(|| site.info.description.clone());

    let social_image_url = root.and_then(|block| {
        let source = record
            .page_property("Social Image", block)
            .or_else(|| block.page_cover().map(str::to_owned))
            .or_else(|| site.page.cover.clone())?;
        mappers.images.map(&source, block)
    });

    let canonical_url = (!mode.dev).then(|| mappers.canonical.map(page_id));

    PageMetadata {
        title,
        description,
        social_image_url,
        canonical_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::record::fixtures::*;
    use serde_json::json;

    fn post_id() -> PageId {
        PageId::parse(POST_ID).unwrap()
    }

    #[test]
    fn test_post_metadata() {
        let config = test_parse_config("");
        let record = parse(&post_record());
        let mappers = UrlMappers::new(&config.site, &record, false);
        let meta = extract_metadata(&config.site, &record, &post_id(), &mappers, RenderMode::PRODUCTION);

        assert_eq!(meta.title, "Talking to your landlord");
        assert_eq!(meta.description, "How to ask for repairs");
        assert!(
            meta.social_image_url
                .as_deref()
                .unwrap()
                .contains("woodcuts_1.jpg")
        );
        assert_eq!(
            meta.canonical_url.as_deref(),
            Some("https://example.com/talking-to-your-landlord-4c1a2b3cd4e54f608a9b0c1d2e3f4a5b")
        );
    }

    #[test]
    fn test_empty_title_falls_back_to_site_name() {
        let config = test_parse_config("");
        let mut value = landing_record();
        value["block"][ROOT_ID]["value"]["properties"]["title"] = json!([["   "]]);
        let record = parse(&value);
        let mappers = UrlMappers::new(&config.site, &record, false);
        let id = PageId::parse(ROOT_ID).unwrap();

        let meta = extract_metadata(&config.site, &record, &id, &mappers, RenderMode::PRODUCTION);
        assert_eq!(meta.title, "Test");
        assert_eq!(meta.description, "Test");
        assert_eq!(meta.canonical_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_dev_build_has_no_canonical_url() {
        let config = test_parse_config("");
        let record = parse(&post_record());
        let mappers = UrlMappers::new(&config.site, &record, false);
        let meta = extract_metadata(&config.site, &record, &post_id(), &mappers, RenderMode::DEVELOPMENT);
        assert!(meta.canonical_url.is_none());
    }

    #[test]
    fn test_social_image_fallback_chain() {
        let config = test_parse_config("[site.page]\ncover = \"/default-cover.jpg\"");
        let record = parse(&landing_record());
        let mappers = UrlMappers::new(&config.site, &record, false);
        let id = PageId::parse(ROOT_ID).unwrap();

        let meta = extract_metadata(&config.site, &record, &id, &mappers, RenderMode::PRODUCTION);
        assert_eq!(meta.social_image_url.as_deref(), Some("/default-cover.jpg"));

        let bare = test_parse_config("");
        let mappers = UrlMappers::new(&bare.site, &record, false);
        let meta = extract_metadata(&bare.site, &record, &id, &mappers, RenderMode::PRODUCTION);
        assert!(meta.social_image_url.is_none());
    }

    #[test]
    fn test_social_image_property_wins() {
        let config = test_parse_config("");
        let mut value = post_record();
        value["collection"][COLLECTION_ID]["value"]["schema"]["soci"] =
            json!({"name": "Social Image", "type": "file"});
        value["block"][POST_ID]["value"]["properties"]["soci"] =
            json!([["share.png", [["a", "https://images.unsplash.com/share.png"]]]]);
        let record = parse(&value);
        let mappers = UrlMappers::new(&config.site, &record, false);

        let meta = extract_metadata(&config.site, &record, &post_id(), &mappers, RenderMode::PRODUCTION);
        assert_eq!(
            meta.social_image_url.as_deref(),
            Some("https://images.unsplash.com/share.png")
        );
    }
}
