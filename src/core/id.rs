//! Notion page ids.
//!
//! Notion uses the same 128-bit id in two spellings: dashed uuid
//! (`067dd719-a912-471e-a9a3-ac10710e7fdf`) in record maps, compact hex
//! (`067dd719a912471ea9a3ac10710e7fdf`) in URLs. `PageId` always stores
//! the compact, lowercase form.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static COMPACT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)([a-fA-F0-9]{32})(?-u:\b)").expect("valid regex"));

static UUID_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?-u:\b)([a-fA-F0-9]{8})-([a-fA-F0-9]{4})-([a-fA-F0-9]{4})-([a-fA-F0-9]{4})-([a-fA-F0-9]{12})(?-u:\b)",
    )
        .expect("valid regex")
});

/// Compact, lowercase Notion id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageId(String);

impl PageId {
    /// Find a page id anywhere in `input`.
    ///
    /// Accepts a bare id, a dashed uuid, or a slug ending with an id such as
    /// `hello-world-067dd719a912471ea9a3ac10710e7fdf`.
    pub fn parse(input: &str) -> Option<Self> {
        if let Some(caps) = COMPACT_ID.captures(input) {
            return Some(Self(caps[1].to_ascii_lowercase()));
        }

        UUID_ID.captures(input).map(|caps| {
            let joined: String = (1..=5).map(|i| &caps[i]).collect();
            Self(joined.to_ascii_lowercase())
        })
    }

    /// Compact form, used in URLs and file names.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PageId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("`{value}` is not a notion page id"))
    }
}

impl From<PageId> for String {
    fn from(id: PageId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPACT: &str = "067dd719a912471ea9a3ac10710e7fdf";
    const UUID: &str = "067dd719-a912-471e-a9a3-ac10710e7fdf";

    #[test]
    fn test_parse_compact() {
        assert_eq!(PageId::parse(COMPACT).unwrap().as_str(), COMPACT);
    }

    #[test]
    fn test_parse_uuid() {
        assert_eq!(PageId::parse(UUID).unwrap().as_str(), COMPACT);
    }

    #[test]
    fn test_parse_uppercase() {
        let id = PageId::parse(&COMPACT.to_ascii_uppercase()).unwrap();
        assert_eq!(id.as_str(), COMPACT);
    }

    #[test]
    fn test_parse_slug() {
        let id = PageId::parse(&format!("hello-world-{COMPACT}")).unwrap();
        assert_eq!(id.as_str(), COMPACT);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PageId::parse("hello-world").is_none());
        assert!(PageId::parse("067dd719a912471e").is_none());
        assert!(PageId::parse("").is_none());
    }

    #[test]
    fn test_parse_id_inside_path() {
        let id = PageId::parse(&format!("/blog/hello-{COMPACT}?lite=true")).unwrap();
        assert_eq!(id.as_str(), COMPACT);
        let id = PageId::parse(&format!("/p/{UUID}/")).unwrap();
        assert_eq!(id.as_str(), COMPACT);
    }

    #[test]
    fn test_parse_needs_word_boundary() {
        assert!(PageId::parse(&format!("x{COMPACT}")).is_none());
        assert!(PageId::parse(&format!("{COMPACT}0")).is_none());
        assert!(PageId::parse(&format!("_{UUID}")).is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let id: PageId = serde_json::from_str(&format!("\"{UUID}\"")).unwrap();
        assert_eq!(id.as_str(), COMPACT);
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{COMPACT}\""));
        assert!(serde_json::from_str::<PageId>("\"nope\"").is_err());
    }
}
