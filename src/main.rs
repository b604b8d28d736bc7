//! notion-page - render Notion record maps into static, shareable HTML pages.

mod capability;
mod cli;
mod compose;
mod config;
mod core;
mod embed;
mod logger;
mod page;
mod record;
mod render;
mod search;
mod seo;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let config = Arc::new(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Init { name, dry } => cli::init::new_site(&config, name.is_some(), *dry),
        Commands::Render { page, to, .. } => cli::render::render_page(config, page, to.as_deref()),
        Commands::Build { .. } => cli::build::build_site(config, false).map(|_| ()),
        Commands::Serve { .. } => cli::serve::serve_site(config),
    }
}
