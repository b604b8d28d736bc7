//! Page composition.
//!
//! Turns the state of a page request into a complete HTML document:
//!
//! | Input                                    | Output                      |
//! |------------------------------------------|-----------------------------|
//! | record still pending                     | `RenderedPage::Loading`     |
//! | load error, no site, no root block       | `RenderedPage::NotFound`    |
//! | record with a root block                 | `RenderedPage::Page`        |
//!
//! A page document is, in order: head tags, header, the layout variant's
//! body (landing hero or nothing, then the rendered blocks), then footer
//! and aside. Lite mode drops header, hero, footer and aside.

mod chrome;
mod debug;

pub use chrome::SEARCH_ENDPOINT;
pub use debug::{DebugHook, DebugInfo, GlobalDebugHook, LogDebugHook};

use crate::capability::{CapabilitySnapshot, PropertyFormatters};
use crate::config::SiteSectionConfig;
use crate::core::{PageId, RenderMode, UrlMappers};
use crate::embed::{LoadingPage, NotFoundPage};
use crate::page::{LayoutVariant, PageMetadata, classify, extract_metadata};
use crate::record::PageRecord;
use crate::render::{RenderContext, RendererConfig, render_page};
use crate::search::SearchProvider;
use crate::seo::PageHead;
use crate::utils::html::{self, escape};

/// Where the record of the requested page stands.
#[derive(Debug, Clone, Copy)]
pub enum RecordState<'a> {
    /// Not available yet; try again shortly.
    Pending,
    /// Could not be loaded.
    Failed(&'a str),
    Loaded(&'a PageRecord),
}

/// Everything `compose` needs for one page.
pub struct ComposeInput<'a> {
    pub site: Option<&'a SiteSectionConfig>,
    /// Requested page. Defaults to the root block's id.
    pub page_id: Option<PageId>,
    pub record: RecordState<'a>,
    pub mode: RenderMode,
    pub capabilities: &'a CapabilitySnapshot,
    pub formatters: &'a PropertyFormatters,
    /// Set only when site search is enabled.
    pub search: Option<&'a dyn SearchProvider>,
    pub debug_hook: Option<&'a dyn DebugHook>,
}

/// Composer output.
#[derive(Debug, Clone)]
pub enum RenderedPage {
    Loading {
        html: String,
    },
    NotFound {
        site_name: Option<String>,
        page_id: Option<PageId>,
        error: Option<String>,
        html: String,
    },
    Page {
        page_id: PageId,
        metadata: PageMetadata,
        variant: LayoutVariant,
        html: String,
    },
}

impl RenderedPage {
    pub fn html(&self) -> &str {
        match self {
            Self::Loading { html } | Self::NotFound { html, .. } | Self::Page { html, .. } => html,
        }
    }

    pub fn into_html(self) -> String {
        match self {
            Self::Loading { html } | Self::NotFound { html, .. } | Self::Page { html, .. } => html,
        }
    }

    /// HTTP status the page is served with.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Loading { .. } => 503,
            Self::NotFound { .. } => 404,
            Self::Page { .. } => 200,
        }
    }
}

/// Signature of the metadata extractor.
pub type MetadataExtractor =
    dyn Fn(&SiteSectionConfig, &PageRecord, &PageId, &UrlMappers<'_>, RenderMode) -> PageMetadata;

/// Compose a page.
pub fn compose(input: ComposeInput<'_>) -> RenderedPage {
    compose_with(input, &extract_metadata)
}

/// Compose a page with a custom metadata extractor.
pub fn compose_with(input: ComposeInput<'_>, extract: &MetadataExtractor) -> RenderedPage {
    let site = input.site;
    let lang = site.map_or("en", |s| s.info.language.as_str());

    let record = match input.record {
        RecordState::Pending => {
            let title = site.map_or("Loading", |s| s.info.name.as_str());
            return RenderedPage::Loading {
                html: LoadingPage { title, lang }.render(),
            };
        }
        RecordState::Failed(error) => {
            return not_found(site, input.page_id, Some(error.to_owned()));
        }
        RecordState::Loaded(record) => record,
    };

    let (Some(site), Some(root)) = (site, record.root()) else {
        return not_found(site, input.page_id, None);
    };
    let Some(page_id) = input.page_id.clone().or_else(|| PageId::parse(&root.id)) else {
        return not_found(
            Some(site),
            None,
            Some(format!("root block `{}` has no page id", root.id)),
        );
    };

    let mode = input.mode;
    let mappers = UrlMappers::new(site, record, mode.lite);
    let metadata = extract(site, record, &page_id, &mappers, mode);
    let variant = classify(root).variant();
    let root_page_id = site.info.root_page_id();
    let search = input.search.is_some();

    let debug_html = if mode.dev {
        input.debug_hook.and_then(|hook| {
            hook.inspect(&DebugInfo {
                page_id: &page_id,
                root_page_id: root_page_id.as_ref(),
                block: root,
                record,
                metadata: &metadata,
            })
        })
    } else {
        None
    };

    let mut renderer = RendererConfig::new(site, variant, mode, record);
    if !mode.lite {
        renderer.page_aside = chrome::page_aside(site, variant, &metadata);
        renderer.footer = Some(chrome::footer(site));
    }
    let cx = RenderContext {
        record,
        mappers: &mappers,
        formatters: input.formatters,
        capabilities: input.capabilities,
        config: &renderer,
    };

    let icon = root
        .format
        .page_icon
        .as_deref()
        .filter(|i| i.starts_with("http") || i.starts_with('/'))
        .and_then(|i| mappers.images.map(i, root));
    let head = PageHead::new(site, &metadata).with_icon(icon).render();

    let mut body = String::new();
    if !mode.lite {
        body.push_str(&chrome::header(site, record, root, &page_id, &mappers, search));
    }
    let mut main = String::new();
    if variant.is_landing() && !mode.lite {
        main.push_str(&chrome::hero(site, search));
    }
    main.push_str(&render_page(&cx, root));
    body.push_str(&html::element("div", &[("class", variant.class())], &main));
    if let Some(debug_html) = debug_html {
        body.push_str(&debug_html);
    }

    let mut body_class = String::from("notion-body");
    if root_page_id.as_ref() == Some(&page_id) {
        body_class.push_str(" index-page");
    }
    if mode.lite {
        body_class.push_str(" notion-lite");
    }

    let mut body_attrs = vec![("class", body_class.as_str())];
    if let Some(selector) = input.capabilities.app_element() {
        body_attrs.push(("data-app-element", selector));
    }
    let viewport = html::element("div", &[("class", "notion-viewport")], &body);

    let html = format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{head}</head>\n{}\n</html>\n",
        escape(lang),
        html::element("body", &body_attrs, &viewport),
    );

    RenderedPage::Page {
        page_id,
        metadata,
        variant,
        html,
    }
}

fn not_found(
    site: Option<&SiteSectionConfig>,
    page_id: Option<PageId>,
    error: Option<String>,
) -> RenderedPage {
    let site_name = site.map(|s| s.info.name.clone());
    let html = NotFoundPage {
        site_name: site_name.as_deref(),
        lang: site.map_or("en", |s| s.info.language.as_str()),
        page_id: page_id.as_ref().map(PageId::as_str),
        error: error.as_deref(),
    }
    .render();

    RenderedPage::NotFound {
        site_name,
        page_id,
        error,
        html,
    }
}
