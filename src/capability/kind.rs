//! Capability kinds and the block types that need them.

use std::fmt;

/// An optional renderer, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityKind {
    Code,
    Collection,
    Equation,
    Pdf,
    Modal,
    Tweet,
}

impl CapabilityKind {
    pub const ALL: [Self; 6] = [
        Self::Code,
        Self::Collection,
        Self::Equation,
        Self::Pdf,
        Self::Modal,
        Self::Tweet,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Collection => "collection",
            Self::Equation => "equation",
            Self::Pdf => "pdf",
            Self::Modal => "modal",
            Self::Tweet => "tweet",
        }
    }

    /// Depends on browser runtime objects; never loaded in a server pass.
    #[inline]
    pub const fn is_client_only(self) -> bool {
        matches!(self, Self::Pdf | Self::Modal)
    }

    /// Always available, no loader.
    #[inline]
    pub const fn is_inline(self) -> bool {
        matches!(self, Self::Tweet)
    }

    /// Capability a block type renders through.
    ///
    /// Images need the modal for their zoom overlay.
    pub fn for_block_type(kind: &str) -> Option<Self> {
        match kind {
            "code" => Some(Self::Code),
            "collection_view" | "collection_view_page" => Some(Self::Collection),
            "equation" => Some(Self::Equation),
            "pdf" => Some(Self::Pdf),
            "image" => Some(Self::Modal),
            "tweet" => Some(Self::Tweet),
            _ => None,
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_block_type() {
        assert_eq!(CapabilityKind::for_block_type("code"), Some(CapabilityKind::Code));
        assert_eq!(
            CapabilityKind::for_block_type("collection_view_page"),
            Some(CapabilityKind::Collection)
        );
        assert_eq!(CapabilityKind::for_block_type("image"), Some(CapabilityKind::Modal));
        assert_eq!(CapabilityKind::for_block_type("text"), None);
    }

    #[test]
    fn test_client_only() {
        let client: Vec<_> = CapabilityKind::ALL
            .into_iter()
            .filter(|k| k.is_client_only())
            .collect();
        assert_eq!(client, vec![CapabilityKind::Pdf, CapabilityKind::Modal]);
        assert!(CapabilityKind::Tweet.is_inline());
        assert!(!CapabilityKind::Code.is_inline());
    }
}
