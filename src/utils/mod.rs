//! Utility modules shared by the renderer and the CLI.

pub mod date;
pub mod html;
pub mod mime;
pub mod plural;
