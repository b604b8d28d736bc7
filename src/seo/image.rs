//! Image URL mapping.
//!
//! Notion stores uploads as bare S3 keys or site-relative paths. They are
//! only reachable through Notion's image proxy, which needs the owning
//! block to check permissions:
//!
//! ```text
//! /images/page-cover/woodcuts_1.jpg
//!   → https://www.notion.so/image/https%3A%2F%2Fwww.notion.so%2Fimages%2F...?table=block&id=<block>&cache=v2
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::section::site::PageDefaultsConfig;
use crate::record::Block;

const NOTION_ORIGIN: &str = "https://www.notion.so";

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Maps image references in a record to fetchable URLs.
#[derive(Debug, Clone, Copy)]
pub struct ImageUrlMapper<'a> {
    defaults: &'a PageDefaultsConfig,
}

impl<'a> ImageUrlMapper<'a> {
    pub fn new(defaults: &'a PageDefaultsConfig) -> Self {
        Self { defaults }
    }

    /// Fetchable URL for `url`, which belongs to `block`.
    ///
    /// Returns `None` for empty input.
    pub fn map(&self, url: &str, block: &Block) -> Option<String> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        if self.defaults.is_default_asset(url) {
            return Some(url.to_owned());
        }
        Some(map_notion_image(url, block))
    }
}

/// Notion's default image mapping.
pub fn map_notion_image(url: &str, block: &Block) -> String {
    if url.starts_with("data:") || url.starts_with("https://images.unsplash.com") {
        return url.to_owned();
    }

    if let Ok(parsed) = url::Url::parse(url)
        && is_signed_s3(&parsed)
    {
        return url.to_owned();
    }

    let absolute = if url.starts_with("/images") {
        format!("{NOTION_ORIGIN}{url}")
    } else {
        url.to_owned()
    };

    let proxied = if absolute.starts_with("/image") {
        format!("{NOTION_ORIGIN}{absolute}")
    } else {
        format!(
            "{NOTION_ORIGIN}/image/{}",
            utf8_percent_encode(&absolute, COMPONENT)
        )
    };

    let Ok(mut proxy) = url::Url::parse(&proxied) else {
        return proxied;
    };

    let table = match block.parent_table.as_str() {
        "space" | "collection" | "team" | "" => "block",
        other => other,
    };
    proxy
        .query_pairs_mut()
        .append_pair("table", table)
        .append_pair("id", &block.id)
        .append_pair("cache", "v2");

    proxy.into()
}

/// Pre-signed upload URL, usable as is.
fn is_signed_s3(url: &url::Url) -> bool {
    let on_s3 = url.host_str().is_some_and(|h| h.ends_with(".amazonaws.com"))
        && url.path().starts_with("/secure.notion-static.com");
    if !on_s3 {
        return false;
    }

    let has = |key: &str| url.query_pairs().any(|(k, _)| k == key);
    has("X-Amz-Credential") && has("X-Amz-Signature") && has("X-Amz-Algorithm")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn block(parent_table: &str) -> Block {
        Block {
            id: "4c1a2b3c-d4e5-4f60-8a9b-0c1d2e3f4a5b".into(),
            kind: "page".into(),
            parent_table: parent_table.into(),
            ..Block::default()
        }
    }

    #[test]
    fn test_passthrough() {
        let b = block("collection");
        for url in [
            "data:image/png;base64,AAAA",
            "https://images.unsplash.com/photo-1?w=800",
            "https://s3.us-west-2.amazonaws.com/secure.notion-static.com/x.png?X-Amz-Algorithm=a&X-Amz-Credential=b&X-Amz-Signature=c",
        ] {
            assert_eq!(map_notion_image(url, &b), url);
        }
    }

    #[test]
    fn test_unsigned_s3_is_proxied() {
        let b = block("collection");
        let url = "https://s3.us-west-2.amazonaws.com/secure.notion-static.com/x.png";
        assert!(map_notion_image(url, &b).starts_with("https://www.notion.so/image/https%3A%2F%2Fs3"));
    }

    #[test]
    fn test_notion_relative_image() {
        let mapped = map_notion_image("/images/page-cover/woodcuts_1.jpg", &block("collection"));
        assert_eq!(
            mapped,
            "https://www.notion.so/image/https%3A%2F%2Fwww.notion.so%2Fimages%2Fpage-cover%2Fwoodcuts_1.jpg?table=block&id=4c1a2b3c-d4e5-4f60-8a9b-0c1d2e3f4a5b&cache=v2"
        );
    }

    #[test]
    fn test_table_kept_for_other_parents() {
        let mapped = map_notion_image("https://example.com/a.png", &block("block"));
        assert!(mapped.contains("table=block"));
        let mapped = map_notion_image("https://example.com/a.png", &block("comment"));
        assert!(mapped.contains("table=comment"));
    }

    #[test]
    fn test_defaults_pass_through() {
        let config = test_parse_config("[site.page]\ncover = \"/cover.jpg\"");
        let mapper = ImageUrlMapper::new(&config.site.page);
        let b = block("space");
        assert_eq!(mapper.map("/cover.jpg", &b).as_deref(), Some("/cover.jpg"));
        assert!(mapper.map("  ", &b).is_none());
        assert!(mapper.map("/other.jpg", &b).unwrap().starts_with(NOTION_ORIGIN));
    }
}
