//! Capability load errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("unknown grammar `{0}`")]
    UnknownGrammar(String),

    #[error("IO error when reading grammar `{0}`")]
    GrammarIo(PathBuf, #[source] std::io::Error),

    #[error("invalid grammar definition `{0}`")]
    GrammarToml(PathBuf, #[source] toml::de::Error),
}
