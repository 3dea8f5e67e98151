//! Buff catalog loader.

use std::path::Path;

use battle_core::Buff;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Named buffs available to rosters, keyed by slot.
///
/// RON format: `(buffs: [ ... ])`, one entry per [`Buff`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffCatalog {
    buffs: Vec<Buff>,
}

impl BuffCatalog {
    /// Load and validate a buff catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), buffs = catalog.len(), "buff catalog loaded");
        Ok(catalog)
    }

    /// Parse and validate a buff catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Self> {
        let catalog: BuffCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse buff catalog RON: {}", e))?;
        Self::from_buffs(catalog.buffs)
    }

    /// Build a catalog, rejecting invalid buffs and duplicate slots.
    pub fn from_buffs(buffs: Vec<Buff>) -> LoadResult<Self> {
        for (index, buff) in buffs.iter().enumerate() {
            buff.validate()
                .map_err(|e| anyhow::anyhow!("Invalid buff #{} in catalog: {}", index, e))?;

            if buffs[..index].iter().any(|b| b.slot() == buff.slot()) {
                anyhow::bail!("Duplicate buff slot '{}' in catalog", buff.slot());
            }
        }

        Ok(Self { buffs })
    }

    /// The catalog buff in the given slot.
    pub fn get(&self, slot: &str) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.slot() == slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.buffs.iter().map(Buff::slot)
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Activation, Party, Rounds};

    const CATALOG: &str = r#"(
        buffs: [
            (
                slot: "troll-blood",
                activation: "ROUND_END",
                rounds: Finite(4),
                messages: (effect_succeeds: "{target} regenerate {amount} health."),
                owner: (regeneration: 3),
            ),
            (
                slot: "bees",
                activation: "OFFENSE",
                rounds: Infinite,
                opponent: (minion_damage: Some((min: 1, max: 2))),
                minion_count: 2,
            ),
        ],
    )"#;

    #[test]
    fn parses_buffs_with_defaults() {
        let catalog = BuffCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.slots().collect::<Vec<_>>(), ["troll-blood", "bees"]);

        let blood = catalog.get("troll-blood").unwrap();
        assert_eq!(blood.activation(), Activation::ROUND_END);
        assert_eq!(blood.rounds(), Rounds::Finite(4));
        assert_eq!(blood.effects(Party::Owner).regeneration, 3);
        assert_eq!(blood.effects(Party::Owner).attack_multiplier, 1.0);
        assert!(!blood.has_started());

        let bees = catalog.get("bees").unwrap();
        assert_eq!(bees.minion_count(), 2);
        assert!(bees.rounds().is_infinite());
    }

    #[test]
    fn zero_round_buff_is_rejected() {
        let err = BuffCatalog::parse(r#"(buffs: [(slot: "x", activation: "OFFENSE", rounds: Finite(0))])"#)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid buff #0"));
    }

    #[test]
    fn duplicate_slots_are_rejected() {
        let entry = r#"(slot: "x", activation: "OFFENSE", rounds: Finite(1))"#;
        let err = BuffCatalog::parse(&format!("(buffs: [{entry}, {entry}])")).unwrap_err();
        assert!(err.to_string().contains("Duplicate buff slot 'x'"));
    }
}
