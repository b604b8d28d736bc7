//! The capability table.
//!
//! One slot per [`CapabilityKind`]. The table is resolved once per process
//! and shared; [`CapabilityTable::prepare`] moves the slots a page needs
//! toward Ready, and renders read a [`CapabilitySnapshot`].

use std::collections::BTreeSet;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::watch;
use tokio::task::JoinSet;

use super::component::TweetEmbed;
use super::{BlockComponent, CapabilityKind, LoadState, Loaders};
use crate::config::BuildSectionConfig;
use crate::core::RenderTarget;
use crate::record::PageRecord;
use crate::{debug, log};

/// Capabilities the blocks of `record` render through.
pub fn required_capabilities(record: &PageRecord) -> BTreeSet<CapabilityKind> {
    record
        .blocks()
        .filter_map(|block| CapabilityKind::for_block_type(&block.kind))
        .collect()
}

/// What one `prepare` call did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrepareReport {
    pub loaded: Vec<CapabilityKind>,
    pub failed: Vec<(CapabilityKind, String)>,
    /// Client-only capabilities left for the browser.
    pub deferred: Vec<CapabilityKind>,
}

/// One capability's state, observable by every `prepare` waiting on it.
type Slot = Arc<watch::Sender<LoadState>>;

pub struct CapabilityTable {
    slots: FxHashMap<CapabilityKind, Slot>,
    loaders: Loaders,
}

impl CapabilityTable {
    /// Fresh table over `loaders`. Inline capabilities start Ready, the
    /// rest `NotRequested`.
    pub fn resolve(loaders: Loaders) -> Self {
        let slots = CapabilityKind::ALL
            .into_iter()
            .map(|kind| {
                let state = if kind.is_inline() {
                    LoadState::Ready(Arc::new(TweetEmbed) as Arc<dyn BlockComponent>)
                } else {
                    LoadState::NotRequested
                };
                let (tx, _rx) = watch::channel(state);
                (kind, Arc::new(tx))
            })
            .collect();

        Self { slots, loaders }
    }

    /// Table with the default loaders of a build configuration.
    pub fn from_config(build: &BuildSectionConfig) -> Self {
        Self::resolve(Loaders::from_config(build))
    }

    pub fn state(&self, kind: CapabilityKind) -> LoadState {
        self.slot(kind).borrow().clone()
    }

    /// Current state of every slot.
    pub fn snapshot(&self) -> CapabilitySnapshot {
        CapabilitySnapshot {
            states: self
                .slots
                .iter()
                .map(|(kind, slot)| (*kind, slot.borrow().clone()))
                .collect(),
            app_element: self.loaders.mounts().get(),
        }
    }

    /// Load every required capability that hasn't been requested yet.
    ///
    /// Loads run concurrently and are awaited. A kind another caller is
    /// already loading is waited for, so on return no required slot is
    /// still `Loading`. Client-only kinds are skipped on a server pass, and
    /// a failure only marks its own slot. Only the caller that started a
    /// load reports it.
    pub async fn prepare(
        &self,
        required: &BTreeSet<CapabilityKind>,
        target: RenderTarget,
    ) -> PrepareReport {
        let mut report = PrepareReport::default();
        let mut tasks = JoinSet::new();
        let mut started = Vec::new();
        let mut in_flight = Vec::new();

        for &kind in required {
            if target.is_server() && kind.is_client_only() {
                report.deferred.push(kind);
                continue;
            }
            let Some(loader) = self.loaders.get(kind) else {
                continue;
            };

            let slot = self.slot(kind);
            let claimed = slot.send_if_modified(|state| {
                if matches!(state, LoadState::NotRequested) {
                    *state = LoadState::Loading;
                    true
                } else {
                    false
                }
            });
            if !claimed {
                if matches!(*slot.borrow(), LoadState::Loading) {
                    in_flight.push(slot.subscribe());
                }
                continue;
            }

            debug!("capability"; "loading {}", kind);
            let load = loader.load();
            let slot = Arc::clone(slot);
            started.push(kind);
            tasks.spawn(async move {
                let result = load.await;
                slot.send_replace(match &result {
                    Ok(component) => LoadState::Ready(Arc::clone(component)),
                    Err(err) => LoadState::Failed(err.to_string()),
                });
                (kind, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let Ok((kind, result)) = joined else {
                continue;
            };
            match result {
                Ok(_) => report.loaded.push(kind),
                Err(err) => {
                    log!("capability"; "{} unavailable: {}", kind, err);
                    report.failed.push((kind, err.to_string()));
                }
            }
        }

        // Tasks that panicked never settled their slot.
        for kind in started {
            let aborted = self.slot(kind).send_if_modified(|state| {
                if matches!(state, LoadState::Loading) {
                    *state = LoadState::Failed("loader aborted".to_owned());
                    true
                } else {
                    false
                }
            });
            if aborted {
                log!("capability"; "{} loader aborted", kind);
                report.failed.push((kind, "loader aborted".to_owned()));
            }
        }

        for mut rx in in_flight {
            // The sender lives in the table, so this only ends on a settle.
            let _ = rx.wait_for(|state| !matches!(state, LoadState::Loading)).await;
        }

        report
    }

    fn slot(&self, kind: CapabilityKind) -> &Slot {
        // Every kind gets a slot in `resolve`.
        &self.slots[&kind]
    }
}

/// Point-in-time copy of the table, read by one render.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySnapshot {
    states: FxHashMap<CapabilityKind, LoadState>,
    app_element: Option<String>,
}

impl CapabilitySnapshot {
    pub fn state(&self, kind: CapabilityKind) -> &LoadState {
        static NOT_REQUESTED: LoadState = LoadState::NotRequested;
        self.states.get(&kind).unwrap_or(&NOT_REQUESTED)
    }

    pub fn component(&self, kind: CapabilityKind) -> Option<&Arc<dyn BlockComponent>> {
        self.state(kind).component()
    }

    /// Overlay mount element, once the modal has registered it.
    pub fn app_element(&self) -> Option<&str> {
        self.app_element.as_deref()
    }
}
