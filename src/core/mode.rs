//! Render mode: where the page runs and which build it is.

use serde::{Deserialize, Serialize};

use crate::config::BuildSectionConfig;

/// Where rendered output is executed.
///
/// A `Server` pass produces static HTML. Client-only renderers are left as
/// hydration placeholders and never loaded.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    #[default]
    Server,
    Browser,
}

impl RenderTarget {
    #[inline]
    pub const fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }
}

/// Render mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderMode {
    /// Development build: no canonical URLs, debug hook runs.
    pub dev: bool,

    /// Suppress page chrome (header, footer, aside, hero).
    pub lite: bool,

    pub target: RenderTarget,
}

impl RenderMode {
    /// Production server rendering.
    #[cfg(test)]
    pub const PRODUCTION: Self = Self {
        dev: false,
        lite: false,
        target: RenderTarget::Server,
    };

    /// Development server rendering.
    #[cfg(test)]
    pub const DEVELOPMENT: Self = Self {
        dev: true,
        lite: false,
        target: RenderTarget::Server,
    };

    pub fn from_config(build: &BuildSectionConfig) -> Self {
        Self {
            dev: build.dev,
            lite: build.lite,
            target: build.target,
        }
    }

    /// Same mode, lite forced on when `lite` is set.
    #[inline]
    pub const fn with_lite(self, lite: bool) -> Self {
        Self {
            lite: self.lite || lite,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_from_config() {
        let config = test_parse_config("[build]\ndev = true\ntarget = \"browser\"");
        let mode = RenderMode::from_config(&config.build);
        assert!(mode.dev);
        assert!(!mode.lite);
        assert_eq!(mode.target, RenderTarget::Browser);
    }

    #[test]
    fn test_with_lite_never_clears() {
        let mode = RenderMode::PRODUCTION.with_lite(true);
        assert!(mode.lite);
        assert!(mode.with_lite(false).lite);
    }
}
