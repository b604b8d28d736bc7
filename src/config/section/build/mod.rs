//! `[build]` section configuration.
//!
//! Where record maps come from, where pages go, and how the capability
//! table is prepared.
//!
//! # Example
//!
//! ```toml
//! [build]
//! records = "records"             # Record map JSON files (<page-id>.json)
//! output = "public"               # Output directory for generated HTML
//! dev = false                     # Dev build: no canonical URLs, debug hook enabled
//! target = "server"               # server | browser
//! lite = false                    # Render every page without chrome
//! grammars = ["rust", "python"]   # Syntax grammars the code renderer loads
//! grammar_dir = "grammars"        # Extra grammar definitions (<name>.toml)
//! app_element = ".notion-viewport"
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ConfigDiagnostics;
use crate::core::RenderTarget;

/// Grammars loaded by default, in load order.
pub const DEFAULT_GRAMMARS: &[&str] = &[
    "markup-templating",
    "markup",
    "bash",
    "c",
    "cpp",
    "csharp",
    "docker",
    "java",
    "js-templates",
    "coffeescript",
    "diff",
    "git",
    "go",
    "graphql",
    "handlebars",
    "less",
    "makefile",
    "markdown",
    "objectivec",
    "ocaml",
    "python",
    "reason",
    "rust",
    "sass",
    "scss",
    "solidity",
    "sql",
    "stylus",
    "swift",
    "wasm",
    "yaml",
];

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build")]
pub struct BuildSectionConfig {
    /// Directory of record map files, one `<page-id>.json` per page.
    #[config(default = "records", inline_doc)]
    pub records: PathBuf,

    /// Build output directory.
    #[config(default = "public", inline_doc)]
    pub output: PathBuf,

    /// Development build. Canonical URLs are omitted and the debug hook runs.
    #[config(inline_doc)]
    pub dev: bool,

    /// Where the rendered page runs: "server" or "browser".
    #[config(default = "server", inline_doc)]
    pub target: RenderTarget,

    /// Render every page in lite mode.
    #[config(inline_doc)]
    pub lite: bool,

    /// Grammar names the code renderer loads.
    pub grammars: Vec<String>,

    /// Directory with extra grammar definitions.
    pub grammar_dir: Option<PathBuf>,

    /// Selector of the element modal overlays are mounted next to.
    #[config(default = ".notion-viewport", inline_doc)]
    pub app_element: String,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            records: "records".into(),
            output: "public".into(),
            dev: false,
            target: RenderTarget::Server,
            lite: false,
            grammars: DEFAULT_GRAMMARS.iter().map(|s| (*s).to_owned()).collect(),
            grammar_dir: None,
            app_element: ".notion-viewport".into(),
        }
    }
}

impl BuildSectionConfig {
    /// Resolve relative paths against the site root.
    pub fn normalize(&mut self, root: &Path) {
        self.records = root.join(&self.records);
        self.output = root.join(&self.output);
        if let Some(dir) = self.grammar_dir.take() {
            self.grammar_dir = Some(root.join(dir));
        }
    }

    /// Record map file for a page.
    pub fn record_path(&self, id: &crate::core::PageId) -> PathBuf {
        self.records.join(format!("{id}.json"))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.records.is_dir() {
            diag.error_with_hint(
                Self::FIELDS.records,
                format!("directory `{}` does not exist", self.records.display()),
                "create it or point `records` at your record maps",
            );
        }

        if let Some(dir) = &self.grammar_dir
            && !dir.is_dir()
        {
            diag.error(
                Self::FIELDS.grammar_dir,
                format!("directory `{}` does not exist", dir.display()),
            );
        }

        if self.app_element.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.app_element,
                "app element selector is empty",
                "modal overlays need an element to attach to",
            );
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for name in &self.grammars {
            if !seen.insert(name.as_str()) {
                diag.warn(
                    Self::FIELDS.grammars,
                    format!("grammar `{name}` is listed twice"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.records, PathBuf::from("records"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.target, RenderTarget::Server);
        assert_eq!(config.build.grammars.len(), 31);
        assert_eq!(config.build.grammars[0], "markup-templating");
        assert_eq!(config.build.app_element, ".notion-viewport");
        assert!(!config.build.dev);
    }

    #[test]
    fn test_build_override() {
        let config = test_parse_config(
            "[build]\ndev = true\ntarget = \"browser\"\ngrammars = [\"rust\"]\nlite = true",
        );
        assert!(config.build.dev);
        assert!(config.build.lite);
        assert_eq!(config.build.target, RenderTarget::Browser);
        assert_eq!(config.build.grammars, vec!["rust"]);
    }

    #[test]
    fn test_normalize_and_record_path() {
        let mut config = test_parse_config("[build]\ngrammar_dir = \"grammars\"");
        config.build.normalize(Path::new("/site"));
        assert_eq!(config.build.records, PathBuf::from("/site/records"));
        assert_eq!(config.build.grammar_dir, Some(PathBuf::from("/site/grammars")));

        let id = crate::core::PageId::parse("067dd719a912471ea9a3ac10710e7fdf").unwrap();
        assert_eq!(
            config.build.record_path(&id),
            PathBuf::from("/site/records/067dd719a912471ea9a3ac10710e7fdf.json")
        );
    }

    #[test]
    fn test_validate_missing_records_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.build.normalize(dir.path());
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert_eq!(diag.len(), 1);

        std::fs::create_dir(dir.path().join("records")).unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_duplicate_grammar_is_warning() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("records")).unwrap();
        let mut config = test_parse_config("[build]\ngrammars = [\"rust\", \"rust\"]");
        config.build.normalize(dir.path());
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}
