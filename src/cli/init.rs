//! `init`: lay out a new site.
//!
//! ```text
//! <root>/
//! ├── site.toml     # commented defaults
//! ├── records/      # <page-id>.json record maps
//! ├── grammars/     # <name>.toml syntax grammars
//! └── .gitignore    # ignores the output directory
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::config::SiteConfig;
use crate::log;

const SITE_DIRS: &[&str] = &["records", "grammars"];

const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Create a site at the config root. `--dry` prints the config instead.
///
/// With a name the root must not exist yet. Without one, the current
/// directory may hold nothing but dotfiles (a fresh `.git` is fine).
pub fn new_site(config: &SiteConfig, has_name: bool, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{}", config_template());
        return Ok(());
    }

    let root = config.get_root();
    check_target(root, has_name)?;

    for dir in SITE_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create `{}`", path.display()))?;
    }

    let config_path = root.join(
        config
            .config_path
            .file_name()
            .map_or_else(|| Path::new("site.toml"), Path::new),
    );
    fs::write(&config_path, config_template())
        .with_context(|| format!("failed to write `{}`", config_path.display()))?;

    let pattern = ignore_pattern(root, &config.build.output);
    for name in IGNORE_FILES {
        add_ignore_entry(&root.join(name), &pattern)?;
    }

    log!("init"; "site initialized in {}", root.display());
    Ok(())
}

fn config_template() -> String {
    format!(
        "# notion-page configuration (v{})\n\n{}",
        env!("CARGO_PKG_VERSION"),
        SiteConfig::template()
    )
}

fn check_target(root: &Path, new_dir: bool) -> Result<()> {
    if new_dir {
        if root.exists() {
            bail!("`{}` already exists, pick another name", root.display());
        }
        return Ok(());
    }

    if !root.exists() {
        return Ok(());
    }
    let entries = fs::read_dir(root)
        .with_context(|| format!("failed to read `{}`", root.display()))?;
    for entry in entries {
        let name = entry?.file_name();
        if !name.to_string_lossy().starts_with('.') {
            bail!(
                "`{}` is not empty, use `notion-page init <name>` for a new directory",
                root.display()
            );
        }
    }
    Ok(())
}

/// Root-anchored ignore line for the output directory.
fn ignore_pattern(root: &Path, output: &Path) -> String {
    let relative = output.strip_prefix(root).unwrap_or(output);
    let relative: PathBuf = if relative.is_absolute() {
        relative.file_name().map(PathBuf::from).unwrap_or_default()
    } else {
        relative.to_path_buf()
    };
    format!("/{}", relative.to_string_lossy().trim_matches('/'))
}

/// Append `pattern` unless the file already lists it.
fn add_ignore_entry(path: &Path, pattern: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).with_context(|| format!("failed to read `{}`", path.display())),
    };
    if existing.lines().any(|line| line.trim() == pattern) {
        return Ok(());
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(pattern);
    content.push('\n');
    fs::write(path, content).with_context(|| format!("failed to write `{}`", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_at(root: &Path) -> SiteConfig {
        SiteConfig {
            config_path: root.join("site.toml"),
            root: root.to_path_buf(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_new_site_then_load() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("mysite");
        let config = site_at(&root);

        new_site(&config, true, false).unwrap();
        assert!(root.join("records").is_dir());
        assert!(root.join("grammars").is_dir());

        let content = fs::read_to_string(root.join("site.toml")).unwrap();
        assert!(content.starts_with("# notion-page configuration"));
        assert!(SiteConfig::from_str(&content).is_ok());
        assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "/public\n");

        let err = new_site(&config, true, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_current_dir_allows_dotfiles_only() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".gitignore"), "target").unwrap();

        new_site(&site_at(temp.path()), false, false).unwrap();
        let ignore = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(ignore, "target\n/public\n");

        let err = new_site(&site_at(temp.path()), false, false).unwrap_err();
        assert!(err.to_string().contains("is not empty"));
    }

    #[test]
    fn test_ignore_entry_not_duplicated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".ignore");
        fs::write(&path, "/public\n").unwrap();

        add_ignore_entry(&path, "/public").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "/public\n");
    }

    #[test]
    fn test_ignore_pattern_relative_to_root() {
        let root = Path::new("/srv/site");
        assert_eq!(ignore_pattern(root, Path::new("/srv/site/dist/html")), "/dist/html");
        assert_eq!(ignore_pattern(root, Path::new("public")), "/public");
        assert_eq!(ignore_pattern(root, Path::new("/tmp/out")), "/out");
    }
}
