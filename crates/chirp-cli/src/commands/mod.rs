//! Subcommand implementations.

pub mod timeline;
pub mod token;
