//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::RenderTarget;

/// Notion page renderer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Record map directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub records: Option<PathBuf>,

    /// Config file path (default: site.toml)
    #[arg(short = 'C', long, default_value = "site.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a site directory with a commented config
    #[command(visible_alias = "i")]
    Init {
        /// Site directory name/path (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,

        /// Print the config instead of writing files
        #[arg(long)]
        dry: bool,
    },

    /// Render a single page to stdout or a file
    #[command(visible_alias = "r")]
    Render {
        /// Page id, dashed uuid, or slug ending with an id
        page: String,

        /// Write HTML here instead of stdout
        #[arg(long = "to", value_hint = clap::ValueHint::FilePath)]
        to: Option<PathBuf>,

        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Render every record map into the output directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve pages straight from the record maps
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Shared render arguments for Render, Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Development build: no canonical URLs, debug hook enabled
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub dev: Option<bool>,

    /// Render without header, footer, aside and hero
    #[arg(short, long)]
    pub lite: bool,

    /// Where the rendered page runs
    #[arg(short, long, value_enum)]
    pub target: Option<RenderTarget>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    /// Render arguments of the current command, if it renders.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Render { build_args, .. }
            | Commands::Build { build_args }
            | Commands::Serve { build_args, .. } => Some(build_args),
            Commands::Init { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["notion-page", "serve", "-p", "8080", "--dev"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { .. }));
        let args = cli.build_args().unwrap();
        assert_eq!(args.dev, Some(true));
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, Some(8080)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_render_with_target() {
        let cli = Cli::try_parse_from([
            "notion-page",
            "-C",
            "other.toml",
            "render",
            "hello-067dd719a912471ea9a3ac10710e7fdf",
            "--target",
            "browser",
            "--lite",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        let args = cli.build_args().unwrap();
        assert_eq!(args.target, Some(RenderTarget::Browser));
        assert!(args.lite);
    }

    #[test]
    fn test_init_has_no_build_args() {
        let cli = Cli::try_parse_from(["notion-page", "init", "mysite"]).unwrap();
        assert!(cli.is_init());
        assert!(cli.build_args().is_none());
    }
}
