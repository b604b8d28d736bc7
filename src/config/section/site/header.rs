//! `[site.header]` configuration.

use macros::Config;
use serde::{Deserialize, Serialize};

/// Extra `<head>` content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "site.header")]
pub struct HeaderConfig {
    /// Stylesheet URLs, linked in order.
    pub styles: Vec<String>,

    /// Raw HTML elements appended to head.
    pub elements: Vec<String>,
}
