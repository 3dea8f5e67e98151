//! Content loaders for reading battle data from files.
//!
//! This module provides loaders that convert RON/TOML files into battle-core
//! values. Buffs and configuration deserialize straight into battle-core types;
//! fighters go through a [`FighterTemplate`] that references catalog buffs.

pub mod buffs;
pub mod config;
pub mod roster;

pub use buffs::BuffCatalog;
pub use config::ConfigLoader;
pub use roster::{FighterTemplate, Roster, RosterLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
