use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::cli::common::Session;
use crate::compose::RenderedPage;
use crate::config::SiteConfig;
use crate::core::{PageId, PageUrlMapper, is_shutdown};
use crate::logger::{PageProgress, Tick};
use crate::record::{PageRecord, collect_record_files};
use crate::debug;

/// Outcome of rendering every record.
#[derive(Debug, Default)]
pub struct BuildStats {
    pub rendered: usize,
    /// Records still being written.
    pub pending: usize,
    pub failed: Vec<(PathBuf, String)>,
}

/// Create the output directory.
pub(super) fn init_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory `{}`", output.display()))
}

pub(super) fn collect_records(config: &SiteConfig) -> Vec<(PageId, PathBuf)> {
    collect_record_files(&config.build.records)
}

/// Render every record in parallel and write the pages.
pub(super) fn render_all(session: &Session, files: &[(PageId, PathBuf)], quiet: bool) -> BuildStats {
    let progress = PageProgress::new(files.len(), !quiet);
    let failed = Mutex::new(Vec::new());

    files.par_iter().for_each(|(id, path)| {
        if is_shutdown() {
            return;
        }

        let tick = match render_one(session, id, path) {
            Ok(true) => Tick::Rendered,
            Ok(false) => Tick::Pending,
            Err(e) => {
                failed.lock().push((path.clone(), format!("{e:#}")));
                Tick::Failed
            }
        };
        progress.tick(tick);
    });

    let mut failed = failed.into_inner();
    failed.sort();
    let stats = BuildStats {
        rendered: progress.rendered(),
        pending: progress.pending(),
        failed,
    };
    progress.finish();
    stats
}

/// Render and write one record. `Ok(false)` when it is still being written.
fn render_one(session: &Session, id: &PageId, path: &Path) -> Result<bool> {
    let record = match PageRecord::from_path(path) {
        Ok(record) => record,
        Err(e) if e.is_truncated() => {
            debug!("build"; "{} is still being written", path.display());
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let config = session.config();
    let url = PageUrlMapper::new(&config.site, &record, false).map(id);

    match session.render_record(id, &record, false) {
        RenderedPage::Page {
            page_id,
            metadata,
            variant,
            html,
        } => {
            debug!("build"; "{} {} `{}` -> {}", variant.class(), page_id, metadata.title, url);
            write_page(&output_path(&config.build.output, &url), &html)?;
            Ok(true)
        }
        RenderedPage::Loading { .. } => Ok(false),
        RenderedPage::NotFound { error, .. } => Err(anyhow::anyhow!(
            "{}",
            error.unwrap_or_else(|| "record has no root block".to_owned())
        )),
    }
}

/// The generic not-found page, for hosts that serve `404.html`.
pub(super) fn write_not_found(session: &Session) -> Result<()> {
    let html = session.render(None, false).into_html();
    write_page(&session.config().build.output.join("404.html"), &html)
}

/// File a page URL is written to: `/` is `index.html`, `/slug` is
/// `slug/index.html`.
pub fn output_path(output: &Path, url: &str) -> PathBuf {
    let path = url.split('?').next().unwrap_or_default().trim_matches('/');
    if path.is_empty() {
        output.join("index.html")
    } else {
        output.join(path).join("index.html")
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("failed to write `{}`", path.display()))
}
