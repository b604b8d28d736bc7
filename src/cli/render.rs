//! Render a single page.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::cli::common::Session;
use crate::compose::RenderedPage;
use crate::config::SiteConfig;
use crate::core::PageRequest;
use crate::log;

/// Render `page` (an id, a uuid, a slug or a site path) to `to` or stdout.
pub fn render_page(config: Arc<SiteConfig>, page: &str, to: Option<&Path>) -> Result<()> {
    let session = Session::new(config)?;
    let target = if page.starts_with('/') {
        page.to_owned()
    } else {
        format!("/{page}")
    };
    let page_id = session.resolve(&PageRequest::parse(&target));

    let rendered = session.render(page_id, false);
    match &rendered {
        RenderedPage::Page { .. } => {}
        RenderedPage::Loading { .. } => bail!("record for `{page}` is still being written"),
        RenderedPage::NotFound {
            site_name,
            page_id,
            error,
            ..
        } => {
            let site = site_name.as_deref().unwrap_or("the site");
            match (page_id, error) {
                (_, Some(error)) => bail!("`{page}`: {error}"),
                (Some(id), None) => bail!("page {id} not found in {site}"),
                (None, None) => bail!("`{page}` does not name a page of {site}"),
            }
        }
    }

    match to {
        Some(path) => {
            std::fs::write(path, rendered.html())
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("render"; "{}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.html().as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::common::tests::test_site;
    use tempfile::TempDir;

    #[test]
    fn test_render_to_file() {
        let dir = TempDir::new().unwrap();
        let config = test_site(dir.path(), "");
        let out = dir.path().join("post.html");

        render_page(
            Arc::clone(&config),
            "4c1a2b3c-d4e5-4f60-8a9b-0c1d2e3f4a5b",
            Some(&out),
        )
        .unwrap();
        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("Talking to your landlord"));

        let err = render_page(config, "0be6efce9daf42688f65c76b89f8eb27", None).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
