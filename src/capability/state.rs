//! Slot state of one capability.

use std::fmt;
use std::sync::Arc;

use crate::record::Block;
use crate::render::RenderContext;

/// A loaded block renderer.
pub trait BlockComponent: Send + Sync {
    /// Render `block` to HTML.
    fn render(&self, block: &Block, cx: &RenderContext<'_>) -> String;
}

/// Where a capability is in its load lifecycle.
#[derive(Clone, Default)]
pub enum LoadState {
    #[default]
    NotRequested,
    Loading,
    Ready(Arc<dyn BlockComponent>),
    Failed(String),
}

impl LoadState {
    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The component, only once Ready.
    pub fn component(&self) -> Option<&Arc<dyn BlockComponent>> {
        match self {
            Self::Ready(component) => Some(component),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotRequested => "not requested",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Debug for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "Failed({reason:?})"),
            other => f.write_str(other.name()),
        }
    }
}
