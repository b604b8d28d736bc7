//! Render session shared across CLI commands.
//!
//! A [`Session`] owns everything that outlives a single page: the
//! capability table, the property formatter chain, the page index and the
//! tokio runtime capability loads run on. Render, build and serve each
//! create one and render pages through it from any number of threads.

use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use tokio::runtime::Runtime;

use crate::capability::{
    CapabilityKind, CapabilitySnapshot, CapabilityTable, PrepareReport, PropertyFormatters,
    required_capabilities,
};
use crate::compose::{
    ComposeInput, DebugHook, GlobalDebugHook, LogDebugHook, RecordState, RenderedPage, compose,
};
use crate::config::SiteConfig;
use crate::core::{PageId, PageRequest, RenderMode};
use crate::record::PageRecord;
use crate::search::{PageIndex, SearchProvider};
use crate::utils::plural::plural_count;
use crate::{debug, log};

pub struct Session {
    config: Arc<SiteConfig>,
    mode: RenderMode,
    table: CapabilityTable,
    /// Refreshed after every prepare.
    snapshot: ArcSwap<CapabilitySnapshot>,
    formatters: PropertyFormatters,
    /// Built when search is on or page ids are left out of URLs.
    index: Option<PageIndex>,
    debug_hook: Box<dyn DebugHook>,
    runtime: Runtime,
}

impl Session {
    pub fn new(config: Arc<SiteConfig>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .context("failed to create tokio runtime")?;

        let mode = RenderMode::from_config(&config.build);
        let table = CapabilityTable::from_config(&config.build);
        let snapshot = ArcSwap::from_pointee(table.snapshot());

        let index = (config.site.search || !config.site.include_page_id)
            .then(|| PageIndex::build(&config.site, &config.build.records));

        let debug_hook: Box<dyn DebugHook> = if mode.target.is_server() {
            Box::new(LogDebugHook)
        } else {
            Box::new(GlobalDebugHook)
        };

        Ok(Self {
            config,
            mode,
            table,
            snapshot,
            formatters: PropertyFormatters::standard(),
            index,
            debug_hook,
            runtime,
        })
    }

    #[inline]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[inline]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn index(&self) -> Option<&PageIndex> {
        self.index.as_ref()
    }

    /// Search provider, only when site search is enabled.
    pub fn search(&self) -> Option<&dyn SearchProvider> {
        if self.config.site.search {
            self.index.as_ref().map(|i| i as &dyn SearchProvider)
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> Arc<CapabilitySnapshot> {
        self.snapshot.load_full()
    }

    /// Prepare every capability, so later pages render without waiting.
    pub fn warm_up(&self) -> PrepareReport {
        self.prepare_kinds(&CapabilityKind::ALL.into_iter().collect())
    }

    /// Prepare the capabilities `record` needs.
    pub fn prepare(&self, record: &PageRecord) -> PrepareReport {
        self.prepare_kinds(&required_capabilities(record))
    }

    fn prepare_kinds(
        &self,
        required: &std::collections::BTreeSet<CapabilityKind>,
    ) -> PrepareReport {
        let report = self
            .runtime
            .block_on(self.table.prepare(required, self.mode.target));

        // Recomputed if another thread stored in between, so the last
        // store always includes every slot settled before it.
        self.snapshot.rcu(|_| self.table.snapshot());
        if !report.loaded.is_empty() || !report.failed.is_empty() {
            debug!(
                "capability";
                "{} ready, {} failed",
                plural_count(report.loaded.len(), "capability"),
                report.failed.len()
            );
        }
        report
    }

    /// Page a request path points at.
    ///
    /// Root and override paths first, then any path ending with a page id,
    /// then the slug index.
    pub fn resolve(&self, request: &PageRequest) -> Option<PageId> {
        request.page_id(&self.config.site).or_else(|| {
            self.index
                .as_ref()
                .and_then(|index| index.resolve_path(&request.path))
                .cloned()
        })
    }

    /// Read and render the record of `page_id`.
    pub fn render(&self, page_id: Option<PageId>, lite: bool) -> RenderedPage {
        let empty = PageRecord::default();
        let Some(id) = page_id else {
            return self.compose(None, RecordState::Loaded(&empty), lite);
        };

        match PageRecord::from_path(&self.config.build.record_path(&id)) {
            Ok(record) => self.render_record(&id, &record, lite),
            Err(err) if err.is_truncated() => self.compose(Some(id), RecordState::Pending, lite),
            Err(err) if err.is_missing() => self.compose(Some(id), RecordState::Loaded(&empty), lite),
            Err(err) => {
                log!("render"; "{}: {}", id, err);
                let error = err.to_string();
                self.compose(Some(id), RecordState::Failed(&error), lite)
            }
        }
    }

    /// Render an already loaded record.
    pub fn render_record(&self, id: &PageId, record: &PageRecord, lite: bool) -> RenderedPage {
        self.prepare(record);
        self.compose(Some(id.clone()), RecordState::Loaded(record), lite)
    }

    fn compose(&self, page_id: Option<PageId>, record: RecordState<'_>, lite: bool) -> RenderedPage {
        let snapshot = self.snapshot();
        compose(ComposeInput {
            site: Some(&self.config.site),
            page_id,
            record,
            mode: self.mode.with_lite(lite),
            capabilities: &snapshot,
            formatters: &self.formatters,
            search: self.search(),
            debug_hook: Some(self.debug_hook.as_ref()),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::capability::LoadState;
    use crate::config::test_parse_config;
    use crate::record::fixtures::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Site rooted at `root` with the post and landing records written out.
    pub fn test_site(root: &Path, extra: &str) -> Arc<SiteConfig> {
        let records = root.join("records");
        std::fs::create_dir_all(&records).unwrap();
        let post = PageId::parse(POST_ID).unwrap();
        let landing = PageId::parse(ROOT_ID).unwrap();
        std::fs::write(records.join(format!("{post}.json")), post_record().to_string()).unwrap();
        std::fs::write(records.join(format!("{landing}.json")), landing_record().to_string())
            .unwrap();

        let mut config = test_parse_config(extra);
        config.root = root.to_path_buf();
        config.build.normalize(root);
        Arc::new(config)
    }

    #[test]
    fn test_render_post_prepares_code() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(test_site(dir.path(), "[build]\ngrammars = [\"rust\"]")).unwrap();
        assert!(!session.snapshot().state(CapabilityKind::Code).is_ready());

        let page = session.render(PageId::parse(POST_ID), false);
        assert!(matches!(page, RenderedPage::Page { .. }));
        assert!(session.snapshot().state(CapabilityKind::Code).is_ready());
        assert!(page.html().contains("language-rust"));
    }

    #[test]
    fn test_missing_and_pending_records() {
        let dir = TempDir::new().unwrap();
        let config = test_site(dir.path(), "");
        let pending = PageId::parse("1111aaaa2222bbbb3333cccc4444dddd").unwrap();
        std::fs::write(config.build.record_path(&pending), "{\"block\": {").unwrap();
        let session = Session::new(config).unwrap();

        let missing = session.render(PageId::parse("0be6efce9daf42688f65c76b89f8eb27"), false);
        assert_eq!(missing.status(), 404);
        assert!(missing.html().contains("publicly accessible"));

        assert_eq!(session.render(Some(pending), false).status(), 503);
        assert_eq!(session.render(None, false).status(), 404);
    }

    #[test]
    fn test_resolve_order() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(test_site(
            dir.path(),
            "[site]\ninclude_page_id = false\n[site.url_overrides]\nabout = \"4c1a2b3cd4e54f608a9b0c1d2e3f4a5b\"",
        ))
        .unwrap();
        let post = PageId::parse(POST_ID);

        assert_eq!(session.resolve(&PageRequest::parse("/")), PageId::parse(ROOT_ID));
        assert_eq!(session.resolve(&PageRequest::parse("/about")), post);
        // An overridden page is only reachable through its override.
        assert_eq!(session.resolve(&PageRequest::parse("/talking-to-your-landlord")), None);
        assert_eq!(
            session.resolve(&PageRequest::parse("/anything-4c1a2b3cd4e54f608a9b0c1d2e3f4a5b")),
            post
        );
        assert_eq!(session.resolve(&PageRequest::parse("/nowhere")), None);
    }

    #[test]
    fn test_resolve_slug_without_page_id() {
        let dir = TempDir::new().unwrap();
        let session =
            Session::new(test_site(dir.path(), "[site]\ninclude_page_id = false")).unwrap();

        assert_eq!(
            session.resolve(&PageRequest::parse("/talking-to-your-landlord")),
            PageId::parse(POST_ID)
        );
        assert_eq!(session.resolve(&PageRequest::parse("/talking-to-your")), None);
    }

    #[test]
    fn test_concurrent_renders_see_loaded_code() {
        use std::sync::Barrier;

        for _ in 0..20 {
            let dir = TempDir::new().unwrap();
            let session = Session::new(test_site(dir.path(), "[build]\ngrammars = [\"rust\"]")).unwrap();
            let record = parse(&post_record());
            let id = PageId::parse(POST_ID).unwrap();
            let barrier = Barrier::new(2);

            let render = || {
                barrier.wait();
                session.render_record(&id, &record, false).into_html()
            };
            std::thread::scope(|scope| {
                let first = scope.spawn(render);
                let second = scope.spawn(render);
                for html in [first.join().unwrap(), second.join().unwrap()] {
                    assert!(html.contains("language-rust"));
                    assert!(!html.contains("notion-capability-placeholder"));
                }
            });
        }
    }

    #[test]
    fn test_warm_up_defers_client_only() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(test_site(dir.path(), "[build]\ngrammars = []")).unwrap();
        let report = session.warm_up();

        assert!(report.deferred.contains(&CapabilityKind::Pdf));
        assert!(report.deferred.contains(&CapabilityKind::Modal));
        assert!(matches!(
            session.snapshot().state(CapabilityKind::Modal),
            LoadState::NotRequested
        ));
        assert!(session.snapshot().state(CapabilityKind::Equation).is_ready());
    }

    #[test]
    fn test_search_only_when_enabled() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(test_site(dir.path(), "")).unwrap();
        assert!(session.search().is_none());

        let dir = TempDir::new().unwrap();
        let session = Session::new(test_site(dir.path(), "[site]\nsearch = true")).unwrap();
        let hits = session.search().unwrap().search("landlord", 5);
        assert_eq!(hits.len(), 1);
    }
}
