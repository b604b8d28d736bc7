//! Page layout classification.

use crate::record::Block;

/// Minimum header count before a table of contents is worth showing.
pub const MIN_TABLE_OF_CONTENTS_ITEMS: usize = 3;

/// Page layout variant.
///
/// Decides which body the composer emits around the rendered blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutVariant {
    /// Top-level page: hero, search box, then the page content.
    #[default]
    Landing,
    /// Row of a collection (a blog post): content with a table of contents.
    Post,
}

impl LayoutVariant {
    #[inline]
    pub fn is_post(&self) -> bool {
        matches!(self, Self::Post)
    }

    #[inline]
    pub fn is_landing(&self) -> bool {
        matches!(self, Self::Landing)
    }

    /// CSS class of the body wrapper.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Landing => "layout-landing",
            Self::Post => "layout-post",
        }
    }
}

/// Result of classifying a root block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub is_blog_post: bool,
}

impl Classification {
    pub fn variant(&self) -> LayoutVariant {
        if self.is_blog_post {
            LayoutVariant::Post
        } else {
            LayoutVariant::Landing
        }
    }
}

/// Classify a root block: a page whose parent is a collection is a post.
pub fn classify(block: &Block) -> Classification {
    Classification {
        is_blog_post: block.kind == "page" && block.parent_table == "collection",
    }
}
