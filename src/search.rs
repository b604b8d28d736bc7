//! Page search.
//!
//! [`PageIndex`] holds the title and path of every record in the records
//! directory. It answers title searches for `/api/search` and resolves
//! slug-only request paths when page ids are left out of URLs.

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::SiteSectionConfig;
use crate::core::{PageId, PageUrlMapper};
use crate::record::{PageRecord, collect_record_files};
use crate::{debug, log};

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: PageId,
    pub title: String,
    pub url: String,
}

/// Answers search queries from the page.
pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> Vec<SearchResult>;
}

#[derive(Debug, Clone)]
struct IndexEntry {
    id: PageId,
    title: String,
    title_lower: String,
    /// Site path without the leading `/`.
    path: String,
}

/// Title and path of every known page.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    entries: Vec<IndexEntry>,
}

impl PageIndex {
    /// Index every record map under `dir`.
    ///
    /// Records that fail to parse are skipped with a log line.
    pub fn build(site: &SiteSectionConfig, dir: &Path) -> Self {
        let files = collect_record_files(dir);
        let records: Vec<_> = files
            .par_iter()
            .filter_map(|(id, path)| match PageRecord::from_path(path) {
                Ok(record) => Some((id.clone(), record)),
                Err(err) => {
                    log!("search"; "skipping {}: {}", path.display(), err);
                    None
                }
            })
            .collect();

        let index = Self::from_records(site, records.iter().map(|(id, record)| (id, record)));
        debug!("search"; "indexed {} of {} records", index.len(), files.len());
        index
    }

    pub fn from_records<'a>(
        site: &SiteSectionConfig,
        records: impl IntoIterator<Item = (&'a PageId, &'a PageRecord)>,
    ) -> Self {
        let entries = records
            .into_iter()
            .filter_map(|(id, record)| {
                let root = record.root()?;
                let title = record.block_title(root);
                let path = PageUrlMapper::new(site, record, false)
                    .map(id)
                    .trim_start_matches('/')
                    .to_owned();
                Some(IndexEntry {
                    id: id.clone(),
                    title_lower: title.to_lowercase(),
                    title,
                    path,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Page served at `path`, matched against the generated paths.
    pub fn resolve_path(&self, path: &str) -> Option<&PageId> {
        let path = path.trim_matches('/');
        self.entries
            .iter()
            .find(|e| !e.path.is_empty() && e.path == path)
            .map(|e| &e.id)
    }
}

impl SearchProvider for PageIndex {
    /// Case-insensitive title match. Prefix matches rank first.
    fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<_> = self
            .entries
            .iter()
            .filter_map(|e| e.title_lower.find(&query).map(|pos| (pos != 0, e)))
            .collect();
        hits.sort_by_key(|(not_prefix, _)| *not_prefix);

        hits.into_iter()
            .take(limit)
            .map(|(_, e)| SearchResult {
                id: e.id.clone(),
                title: e.title.clone(),
                url: format!("/{}", e.path),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::record::fixtures::*;
    use tempfile::TempDir;

    fn write_records(dir: &Path) {
        std::fs::write(dir.join(format!("{POST_ID}.json")), post_record().to_string()).unwrap();
        std::fs::write(dir.join(format!("{ROOT_ID}.json")), landing_record().to_string()).unwrap();
        std::fs::write(dir.join("4c1a2b3cd4e54f608a9b0c1d2e3f4a5c.json"), "{\"block\": ").unwrap();
    }

    #[test]
    fn test_build_skips_bad_records() {
        let dir = TempDir::new().unwrap();
        write_records(dir.path());
        let config = test_parse_config("");
        let index = PageIndex::build(&config.site, dir.path());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_search_ranks_prefix_first() {
        let dir = TempDir::new().unwrap();
        write_records(dir.path());
        let config = test_parse_config("");
        let index = PageIndex::build(&config.site, dir.path());

        let hits = index.search("talking", 10);
        let titles: Vec<_> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Talking Points"));

        let hits = index.search("landlord", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].url,
            "/talking-to-your-landlord-4c1a2b3cd4e54f608a9b0c1d2e3f4a5b"
        );

        assert!(index.search("  ", 10).is_empty());
        assert_eq!(index.search("talking", 1).len(), 1);
    }

    #[test]
    fn test_resolve_slug_only_path() {
        let config = test_parse_config("[site]\ninclude_page_id = false");
        let record = parse(&post_record());
        let id = PageId::parse(POST_ID).unwrap();
        let index = PageIndex::from_records(&config.site, [(&id, &record)]);

        assert_eq!(index.resolve_path("/talking-to-your-landlord"), Some(&id));
        assert_eq!(index.resolve_path("/other"), None);
    }
}
