//! Loaders: how each lazy capability becomes Ready.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::component::{CodeBlock, CollectionView, EquationBlock, ModalOverlay, PdfViewer};
use super::grammar::{self, DirGrammars, GrammarSource};
use super::{BlockComponent, CapabilityError, CapabilityKind};
use crate::config::BuildSectionConfig;

/// Future resolved by a loader.
pub type LoadFuture =
    Pin<Box<dyn Future<Output = Result<Arc<dyn BlockComponent>, CapabilityError>> + Send>>;

/// Produces the component of one capability.
///
/// Called at most once per table slot.
pub trait CapabilityLoader: Send + Sync {
    fn load(&self) -> LoadFuture;
}

/// Overlay mount element, set by the modal loader before it resolves.
#[derive(Debug, Clone, Default)]
pub struct MountRegistry(Arc<Mutex<Option<String>>>);

impl MountRegistry {
    pub fn register(&self, selector: &str) {
        *self.0.lock() = Some(selector.to_owned());
    }

    pub fn get(&self) -> Option<String> {
        self.0.lock().clone()
    }
}

/// Loader for each lazy capability kind.
#[derive(Clone, Default)]
pub struct Loaders {
    entries: FxHashMap<CapabilityKind, Arc<dyn CapabilityLoader>>,
    mounts: MountRegistry,
}

impl Loaders {
    /// Default loaders for a build configuration.
    pub fn from_config(build: &BuildSectionConfig) -> Self {
        let mounts = MountRegistry::default();
        let source: Arc<dyn GrammarSource> = Arc::new(DirGrammars::new(build.grammar_dir.clone()));

        Self {
            entries: FxHashMap::default(),
            mounts: mounts.clone(),
        }
        .with(
            CapabilityKind::Code,
            CodeLoader {
                grammars: build.grammars.clone(),
                source,
            },
        )
        .with(
            CapabilityKind::Collection,
            ReadyLoader(|| Arc::new(CollectionView) as Arc<dyn BlockComponent>),
        )
        .with(
            CapabilityKind::Equation,
            ReadyLoader(|| Arc::new(EquationBlock) as Arc<dyn BlockComponent>),
        )
        .with(
            CapabilityKind::Pdf,
            ReadyLoader(|| Arc::new(PdfViewer) as Arc<dyn BlockComponent>),
        )
        .with(
            CapabilityKind::Modal,
            ModalLoader {
                app_element: build.app_element.clone(),
                mounts,
            },
        )
    }

    /// Replace the loader of one kind.
    pub fn with(mut self, kind: CapabilityKind, loader: impl CapabilityLoader + 'static) -> Self {
        self.entries.insert(kind, Arc::new(loader));
        self
    }

    pub fn get(&self, kind: CapabilityKind) -> Option<&Arc<dyn CapabilityLoader>> {
        self.entries.get(&kind)
    }

    pub fn mounts(&self) -> &MountRegistry {
        &self.mounts
    }
}

/// Loads the configured grammars, then yields the code renderer.
pub struct CodeLoader {
    pub grammars: Vec<String>,
    pub source: Arc<dyn GrammarSource>,
}

impl CapabilityLoader for CodeLoader {
    fn load(&self) -> LoadFuture {
        let names = self.grammars.clone();
        let source = Arc::clone(&self.source);
        Box::pin(async move {
            let grammars = grammar::load_grammars(&names, source).await;
            Ok(Arc::new(CodeBlock::new(grammars)) as Arc<dyn BlockComponent>)
        })
    }
}

/// Registers the overlay mount element, then yields the modal overlay.
pub struct ModalLoader {
    pub app_element: String,
    pub mounts: MountRegistry,
}

impl CapabilityLoader for ModalLoader {
    fn load(&self) -> LoadFuture {
        let app_element = self.app_element.clone();
        let mounts = self.mounts.clone();
        Box::pin(async move {
            mounts.register(&app_element);
            Ok(Arc::new(ModalOverlay::new(app_element)) as Arc<dyn BlockComponent>)
        })
    }
}

/// A loader with nothing to fetch.
pub struct ReadyLoader<F>(pub F);

impl<F> CapabilityLoader for ReadyLoader<F>
where
    F: Fn() -> Arc<dyn BlockComponent> + Send + Sync,
{
    fn load(&self) -> LoadFuture {
        let component = (self.0)();
        Box::pin(async move { Ok(component) })
    }
}
