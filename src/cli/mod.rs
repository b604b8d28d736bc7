//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
pub mod init;
pub mod render;
pub mod serve;

pub use args::{BuildArgs, Cli, Commands};
