//! Subcommand implementations.

pub mod completion;
pub mod formats;
pub mod plan;
