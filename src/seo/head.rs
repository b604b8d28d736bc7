//! `<head>` tags for a rendered page.
//!
//! Emitted in a fixed order: charset and viewport, robots, site-level
//! Open Graph and Twitter tags, then the page's title, description, image
//! and canonical URL, and finally icon and stylesheets.

use std::fmt::Write;

use crate::config::SiteSectionConfig;
use crate::page::PageMetadata;
use crate::utils::html::{element, escape};

/// Head content of one page.
pub struct PageHead<'a> {
    site: &'a SiteSectionConfig,
    meta: &'a PageMetadata,
    icon: Option<String>,
}

impl<'a> PageHead<'a> {
    pub fn new(site: &'a SiteSectionConfig, meta: &'a PageMetadata) -> Self {
        Self {
            site,
            meta,
            icon: site.page.icon.clone(),
        }
    }

    /// Use a page's own icon instead of the site default.
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        if icon.is_some() {
            self.icon = icon;
        }
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(2048);
        let meta = self.meta;
        let info = &self.site.info;

        push(&mut out, element("meta", &[("charset", "utf-8")], ""));
        push(
            &mut out,
            element(
                "meta",
                &[
                    ("name", "viewport"),
                    ("content", "width=device-width, initial-scale=1, shrink-to-fit=no"),
                ],
                "",
            ),
        );
        push(&mut out, named("robots", "index,follow"));
        push(&mut out, property("og:type", "website"));

        if !info.name.is_empty() {
            push(&mut out, property("og:site_name", &info.name));
        }
        if let Some(handle) = info.twitter.as_deref().filter(|h| !h.is_empty()) {
            let handle = format!("@{}", handle.trim_start_matches('@'));
            push(&mut out, named("twitter:site", &handle));
            push(&mut out, named("twitter:creator", &handle));
        }

        if !meta.description.is_empty() {
            push(&mut out, named("description", &meta.description));
            push(&mut out, property("og:description", &meta.description));
            push(&mut out, named("twitter:description", &meta.description));
        }

        match &meta.social_image_url {
            Some(image) => {
                push(&mut out, named("twitter:card", "summary_large_image"));
                push(&mut out, named("twitter:image", image));
                push(&mut out, property("og:image", image));
            }
            None => push(&mut out, named("twitter:card", "summary")),
        }

        if let Some(url) = &meta.canonical_url {
            push(&mut out, element("link", &[("rel", "canonical"), ("href", url)], ""));
            push(&mut out, property("og:url", url));
            push(&mut out, named("twitter:url", url));
        }

        if let Some(icon) = &self.icon {
            push(&mut out, element("link", &[("rel", "icon"), ("href", icon)], ""));
        }

        push(&mut out, property("og:title", &meta.title));
        push(&mut out, named("twitter:title", &meta.title));
        let _ = writeln!(out, "<title>{}</title>", escape(&meta.title));

        for style in &self.site.header.styles {
            push(&mut out, element("link", &[("rel", "stylesheet"), ("href", style)], ""));
        }
        // Trusted input from the site owner.
        for raw in &self.site.header.elements {
            out.push_str(raw);
            out.push('\n');
        }

        out
    }
}

#[inline]
fn push(out: &mut String, tag: String) {
    out.push_str(&tag);
    out.push('\n');
}

fn named(name: &str, content: &str) -> String {
    element("meta", &[("name", name), ("content", content)], "")
}

fn property(property: &str, content: &str) -> String {
    element("meta", &[("property", property), ("content", content)], "")
}
