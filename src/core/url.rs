//! Mapping between Notion page ids and site URLs.
//!
//! | Mapper               | Root page            | Other pages                        |
//! |----------------------|----------------------|------------------------------------|
//! | `PageUrlMapper`      | `/`                  | `/<slug>-<id>`, `?lite=true` kept  |
//! | `CanonicalUrlMapper` | `https://<domain>`   | `https://<domain>/<slug>-<id>`     |
//!
//! Pages without a title map to their bare id. Paths listed in
//! `[site.url_overrides]` win over generated slugs.

use std::borrow::Cow;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use rustc_hash::FxHashMap;

use super::PageId;
use crate::config::SiteSectionConfig;
use crate::record::PageRecord;
use crate::seo::ImageUrlMapper;

/// Characters kept in slugs: ASCII alphanumerics, `-`, CJK ideographs,
/// hiragana, katakana and CJK punctuation.
static SLUG_STRIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\-\x{4e00}-\x{9fff}\x{3041}-\x{3096}\x{30a1}-\x{30fc}\x{3000}-\x{303f}]")
        .expect("valid regex")
});

static DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Turn a page title into a URL slug.
///
/// ```ignore
/// assert_eq!(normalize_title("Talking to your landlord"), "talking-to-your-landlord");
/// ```
pub fn normalize_title(title: &str) -> String {
    let dashed = title.trim().replace(' ', "-");
    let kept = SLUG_STRIP.replace_all(&dashed, "");
    let collapsed = DASH_RUN.replace_all(&kept, "-");
    collapsed.trim_matches('-').to_lowercase()
}

// ============================================================================
// slugs
// ============================================================================

/// Canonical path segment of each page in one record.
#[derive(Debug, Clone)]
pub struct PageSlugs<'a> {
    record: &'a PageRecord,
    root: Option<PageId>,
    include_page_id: bool,
    overrides: FxHashMap<PageId, String>,
}

impl<'a> PageSlugs<'a> {
    pub fn new(site: &SiteSectionConfig, record: &'a PageRecord) -> Self {
        Self {
            record,
            root: site.info.root_page_id(),
            include_page_id: site.include_page_id,
            overrides: site.override_paths(),
        }
    }

    #[inline]
    pub fn is_root(&self, id: &PageId) -> bool {
        self.root.as_ref() == Some(id)
    }

    /// Path segment for a page, without leading slash.
    pub fn canonical_page_id(&self, id: &PageId) -> String {
        if let Some(path) = self.overrides.get(id) {
            return path.clone();
        }

        let title = self
            .record
            .block(id.as_str())
            .map(|block| self.record.block_title(block))
            .unwrap_or_default();

        slug_for(&title, id, self.include_page_id)
    }
}

/// `<slug>-<id>`, `<slug>`, or the bare id when the title has no slug.
pub fn slug_for(title: &str, id: &PageId, include_page_id: bool) -> String {
    let slug = normalize_title(title);
    if slug.is_empty() {
        id.to_string()
    } else if include_page_id {
        format!("{slug}-{id}")
    } else {
        slug
    }
}

// ============================================================================
// mappers
// ============================================================================

/// Site-relative page links.
#[derive(Debug, Clone)]
pub struct PageUrlMapper<'a> {
    slugs: PageSlugs<'a>,
    lite: bool,
}

impl<'a> PageUrlMapper<'a> {
    pub fn new(site: &SiteSectionConfig, record: &'a PageRecord, lite: bool) -> Self {
        Self {
            slugs: PageSlugs::new(site, record),
            lite,
        }
    }

    pub fn map(&self, id: &PageId) -> String {
        let path = if self.slugs.is_root(id) {
            "/".to_owned()
        } else {
            format!("/{}", self.slugs.canonical_page_id(id))
        };

        if self.lite {
            format!("{path}?lite=true")
        } else {
            path
        }
    }

    /// Link for a raw block id. Ids that don't parse are linked verbatim.
    pub fn map_raw(&self, id: &str) -> String {
        match PageId::parse(id) {
            Some(id) => self.map(&id),
            None => format!("/{id}"),
        }
    }
}

/// Absolute canonical URLs on the production domain.
#[derive(Debug, Clone)]
pub struct CanonicalUrlMapper<'a> {
    slugs: PageSlugs<'a>,
    domain: String,
}

impl<'a> CanonicalUrlMapper<'a> {
    pub fn new(site: &SiteSectionConfig, record: &'a PageRecord) -> Self {
        Self {
            slugs: PageSlugs::new(site, record),
            domain: site.info.domain.trim().trim_end_matches('/').to_owned(),
        }
    }

    pub fn map(&self, id: &PageId) -> String {
        if self.slugs.is_root(id) {
            format!("https://{}", self.domain)
        } else {
            format!("https://{}/{}", self.domain, self.slugs.canonical_page_id(id))
        }
    }
}

/// The three URL mappers a render needs.
#[derive(Debug, Clone)]
pub struct UrlMappers<'a> {
    pub pages: PageUrlMapper<'a>,
    pub canonical: CanonicalUrlMapper<'a>,
    pub images: ImageUrlMapper<'a>,
}

impl<'a> UrlMappers<'a> {
    pub fn new(site: &'a SiteSectionConfig, record: &'a PageRecord, lite: bool) -> Self {
        Self {
            pages: PageUrlMapper::new(site, record, lite),
            canonical: CanonicalUrlMapper::new(site, record),
            images: ImageUrlMapper::new(&site.page),
        }
    }
}

// ============================================================================
// requests
// ============================================================================

/// A decoded request target: path plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Decoded path, always starting with `/`.
    pub path: String,
    query: Vec<(String, String)>,
}

impl PageRequest {
    /// Parse a raw request target such as `/hello-067d...?lite=true`.
    pub fn parse(raw: &str) -> Self {
        static BASE: LazyLock<url::Url> =
            LazyLock::new(|| url::Url::parse("http://localhost/").expect("valid base url"));

        let Ok(url) = BASE.join(raw) else {
            return Self {
                path: "/".to_owned(),
                query: Vec::new(),
            };
        };

        let path = percent_decode_str(url.path())
            .decode_utf8()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| url.path().to_owned());
        let query = url.query_pairs().into_owned().collect();

        Self { path, query }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `?lite=true` was requested.
    pub fn is_lite(&self) -> bool {
        self.param("lite") == Some("true")
    }

    /// Page a request path points at: root, an override path, or any path
    /// that ends with a page id.
    pub fn page_id(&self, site: &SiteSectionConfig) -> Option<PageId> {
        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            return site.info.root_page_id();
        }

        if let Some(id) = site
            .url_overrides
            .iter()
            .find(|(path, _)| path.trim_matches('/') == trimmed)
            .and_then(|(_, id)| PageId::parse(id))
        {
            return Some(id);
        }

        PageId::parse(trimmed)
    }
}
