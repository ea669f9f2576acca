//! Tooling & Integration Layer
//!
//! The `persona-forge` command-line surface and its output formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, OutputFormat};
