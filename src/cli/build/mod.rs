//! Static site build.
//!
//! Build pipeline phases:
//! - **Init** - Create the output directory, load every renderer
//! - **Collect** - Gather `<page-id>.json` record maps
//! - **Render** - Parallel render, one `index.html` per page URL
//! - **Finalize** - `404.html`, failure report, logging

mod pipeline;

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::cli::common::Session;
use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural::plural_count;

pub use pipeline::{BuildStats, output_path};

/// Render every record map into the output directory.
pub fn build_site(config: Arc<SiteConfig>, quiet: bool) -> Result<BuildStats> {
    pipeline::init_output(&config)?;
    let session = Session::new(Arc::clone(&config))?;
    for (kind, error) in &session.warm_up().failed {
        log!("build"; "{} renderer unavailable: {}", kind, error);
    }

    let files = pipeline::collect_records(&config);
    if files.is_empty() {
        log!("build"; "no record maps in {}", config.build.records.display());
    }

    let stats = pipeline::render_all(&session, &files, quiet);

    pipeline::write_not_found(&session)?;

    if !quiet {
        log!(
            "build";
            "{} written to {}",
            plural_count(stats.rendered, "page"),
            config.build.output.display()
        );
        if stats.pending > 0 {
            log!("build"; "{} still being written, skipped", plural_count(stats.pending, "record"));
        }
    }

    if !stats.failed.is_empty() {
        for (path, error) in &stats.failed {
            log!("error"; "{}: {}", path.display(), error);
        }
        bail!("{} failed to render", plural_count(stats.failed.len(), "page"));
    }

    Ok(stats)
}
