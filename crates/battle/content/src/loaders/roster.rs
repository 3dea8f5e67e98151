//! Fighter roster loader.
//!
//! Loads fighters from RON files. Starting buffs are referenced by catalog
//! slot and resolved against a [`BuffCatalog`].

use std::path::Path;

use battle_core::{Combatant, Fighter};
use serde::{Deserialize, Serialize};

use crate::loaders::{BuffCatalog, LoadResult, read_file};

/// Fighter definition as written in roster files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterTemplate {
    /// Roster key, e.g. `"cave-troll"`.
    pub id: String,
    /// Display name used in narration.
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub max_health: u32,
    /// Starting health; full health when omitted.
    #[serde(default)]
    pub health: Option<u32>,
    pub attack: f64,
    pub defense: f64,
    /// Catalog slots of the buffs the fighter starts with.
    #[serde(default)]
    pub buffs: Vec<String>,
}

fn default_level() -> u32 {
    1
}

impl FighterTemplate {
    /// Build a fighter, resolving starting buffs from the catalog.
    pub fn instantiate(&self, catalog: &BuffCatalog) -> LoadResult<Combatant> {
        let mut fighter = Combatant::new(
            self.name.clone(),
            self.level,
            self.max_health,
            self.attack,
            self.defense,
        );
        if let Some(health) = self.health {
            fighter = fighter.with_health(health);
        }

        for slot in &self.buffs {
            let buff = catalog.get(slot).ok_or_else(|| {
                anyhow::anyhow!(
                    "Failed to resolve buff '{}' for fighter '{}': not in catalog",
                    slot,
                    self.id
                )
            })?;
            fighter = fighter
                .with_buff(buff.clone())
                .map_err(|e| anyhow::anyhow!("Fighter '{}': {}", self.id, e))?;
        }

        Ok(fighter)
    }
}

/// Loaded fighters, keyed by roster id in file order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    fighters: Vec<(String, Combatant)>,
}

impl Roster {
    /// A fresh copy of the fighter with the given id.
    pub fn spawn(&self, id: &str) -> Option<Combatant> {
        self.get(id).cloned()
    }

    pub fn get(&self, id: &str) -> Option<&Combatant> {
        self.fighters
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, fighter)| fighter)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fighters.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }
}

/// Loader for fighter rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `Vec<FighterTemplate>`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file
    /// * `catalog` - Catalog resolving the templates' starting buffs
    pub fn load(path: &Path, catalog: &BuffCatalog) -> LoadResult<Roster> {
        let content = read_file(path)?;
        let roster = Self::parse(&content, catalog)?;
        tracing::debug!(path = %path.display(), fighters = roster.len(), "roster loaded");
        Ok(roster)
    }

    /// Parse a roster from RON text.
    pub fn parse(content: &str, catalog: &BuffCatalog) -> LoadResult<Roster> {
        let templates: Vec<FighterTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut fighters: Vec<(String, Combatant)> = Vec::with_capacity(templates.len());
        for template in templates {
            if fighters.iter().any(|(id, _)| *id == template.id) {
                anyhow::bail!("Duplicate fighter id '{}' in roster", template.id);
            }
            let fighter = template.instantiate(catalog)?;
            if !fighter.is_alive() {
                anyhow::bail!("Fighter '{}' starts with no health", template.id);
            }
            fighters.push((template.id, fighter));
        }

        Ok(Roster { fighters })
    }
}
