//! Data-driven battle content and loaders.
//!
//! This crate houses static battle content and provides loaders for RON/TOML data files:
//! - Buff catalogs (data-driven via RON)
//! - Fighter rosters referencing catalog buffs (data-driven via RON)
//! - Battle rules (data-driven via TOML)
//!
//! All loaders use battle-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{BuffCatalog, ConfigLoader, FighterTemplate, Roster, RosterLoader};
