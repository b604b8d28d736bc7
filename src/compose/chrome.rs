//! Page chrome around the rendered blocks.

use crate::config::SiteSectionConfig;
use crate::core::{PageId, UrlMappers};
use crate::page::{LayoutVariant, PageMetadata};
use crate::record::{Block, PageRecord};
use crate::utils::html::{self, escape};

/// Endpoint the search box queries.
pub const SEARCH_ENDPOINT: &str = "/api/search";

/// Top bar: breadcrumb back to the root page, plus search when enabled.
pub fn header(
    site: &SiteSectionConfig,
    record: &PageRecord,
    root: &Block,
    page_id: &PageId,
    mappers: &UrlMappers<'_>,
    search: bool,
) -> String {
    let home = html::element(
        "a",
        &[("class", "breadcrumb"), ("href", &mappers.pages.map_raw(&site.info.root_page_id))],
        &escape(&site.info.name),
    );

    let mut crumbs = home;
    if site.info.root_page_id().as_ref() != Some(page_id) {
        let icon = root
            .format
            .page_icon
            .as_deref()
            .filter(|i| !i.is_empty() && !i.starts_with("http") && !i.starts_with('/'))
            .map(|i| format!("{} ", escape(i)))
            .unwrap_or_default();
        crumbs.push_str("<span class=\"spacer\">/</span>");
        crumbs.push_str(&html::element(
            "span",
            &[("class", "breadcrumb active")],
            &format!("{icon}{}", escape(&record.block_title(root))),
        ));
    }

    let mut nav = html::element("div", &[("class", "breadcrumbs")], &crumbs);
    if search {
        nav.push_str(&html::element(
            "a",
            &[
                ("class", "breadcrumb button notion-search-button"),
                ("href", "#search"),
                ("data-search-endpoint", SEARCH_ENDPOINT),
            ],
            "Search",
        ));
    }

    html::element(
        "header",
        &[("class", "notion-header")],
        &html::element("div", &[("class", "notion-nav-header")], &nav),
    )
}

/// Landing hero: headline, paragraphs and the search box.
pub fn hero(site: &SiteSectionConfig, search: bool) -> String {
    let landing = &site.landing;
    if !landing.has_hero() {
        return String::new();
    }

    let mut body = html::element("h1", &[("class", "landing-headline")], &escape(&landing.headline));
    for paragraph in &landing.paragraphs {
        body.push_str(&html::element("p", &[("class", "landing-paragraph")], &escape(paragraph)));
    }
    body.push_str(&search_box(&landing.search_placeholder, search));

    html::element("section", &[("class", "landing-header")], &body)
}

fn search_box(placeholder: &str, search: bool) -> String {
    let placeholder = if placeholder.is_empty() {
        "Search"
    } else {
        placeholder
    };

    let mut input_attrs = vec![
        ("class", "landing-search-input"),
        ("type", "search"),
        ("name", "q"),
        ("placeholder", placeholder),
        ("aria-label", "Search"),
    ];
    if !search {
        input_attrs.push(("disabled", "disabled"));
    }
    let input = html::element("input", &input_attrs, "");
    let button = html::element(
        "button",
        &[("class", "landing-search-button"), ("type", "submit"), ("aria-label", "Search")],
        &html::element("img", &[("src", "/search1.svg"), ("alt", "")], ""),
    );

    if search {
        html::element(
            "form",
            &[
                ("class", "landing-search"),
                ("action", SEARCH_ENDPOINT),
                ("method", "get"),
                ("role", "search"),
            ],
            &format!("{input}{button}"),
        )
    } else {
        html::element("div", &[("class", "landing-search")], &format!("{input}{button}"))
    }
}

/// Aside panel after the table of contents.
///
/// Posts get share links, other pages the site's social links.
pub fn page_aside(
    site: &SiteSectionConfig,
    variant: LayoutVariant,
    metadata: &PageMetadata,
) -> Option<String> {
    let handle = site
        .info
        .twitter
        .as_deref()
        .map(|h| h.trim_start_matches('@'))
        .filter(|h| !h.is_empty());

    let links = match variant {
        LayoutVariant::Post => {
            let url = metadata.canonical_url.as_deref()?;
            let mut share = url::Url::parse("https://twitter.com/intent/tweet").ok()?;
            share
                .query_pairs_mut()
                .append_pair("url", url)
                .append_pair("text", &metadata.title);
            if let Some(handle) = handle {
                share.query_pairs_mut().append_pair("via", handle);
            }
            html::element(
                "a",
                &[("class", "page-action"), ("href", share.as_str()), ("title", "Share on Twitter")],
                "Share",
            )
        }
        LayoutVariant::Landing => {
            let handle = handle?;
            html::element(
                "a",
                &[
                    ("class", "page-social"),
                    ("href", &format!("https://twitter.com/{handle}")),
                    ("title", &format!("Twitter @{handle}")),
                ],
                &format!("@{}", escape(handle)),
            )
        }
    };

    Some(html::element("div", &[("class", "notion-page-aside")], &links))
}

pub fn footer(site: &SiteSectionConfig) -> String {
    let owner = if site.info.author.is_empty() {
        &site.info.name
    } else {
        &site.info.author
    };

    let mut body = html::element(
        "div",
        &[("class", "footer-copyright")],
        &format!("Copyright {}", escape(owner)),
    );
    if let Some(handle) = site.info.twitter.as_deref().filter(|h| !h.is_empty()) {
        let handle = handle.trim_start_matches('@');
        body.push_str(&html::element(
            "a",
            &[
                ("class", "footer-social"),
                ("href", &format!("https://twitter.com/{handle}")),
                ("title", &format!("Twitter @{handle}")),
            ],
            "Twitter",
        ));
    }

    html::element("footer", &[("class", "footer")], &body)
}
