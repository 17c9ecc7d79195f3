//! Subcommand implementations.

pub mod build;
pub mod hash;
pub mod package;
