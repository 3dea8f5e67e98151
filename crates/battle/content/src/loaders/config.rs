//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load battle rules from a TOML file.
    ///
    /// Missing keys keep their defaults; probabilities are clamped to `[0, 1]`.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse battle rules from TOML text.
    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;

        let chance = config.critical_hit_chance;
        Ok(config.with_critical_hit_chance(chance))
    }
}
