//! Saved battles.
//!
//! A session file holds the battle's resume blob together with the state of
//! its seeded random source, so every invocation continues exactly where the
//! previous one stopped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use battle_content::{BuffCatalog, ConfigLoader, Roster, RosterLoader};
use battle_core::{Battle, BattleConfig, Combatant, PcgSource};
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;

pub type ArenaBattle = Battle<Combatant, PcgSource>;

/// Loaded content directory.
pub struct Content {
    pub roster: Roster,
    pub config: BattleConfig,
}

impl Content {
    /// Load `buffs.ron`, `fighters.ron` and `battle.toml` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let catalog = BuffCatalog::load(&dir.join("buffs.ron"))?;
        let roster = RosterLoader::load(&dir.join("fighters.ron"), &catalog)?;
        let config = ConfigLoader::load(&dir.join("battle.toml"))?;
        tracing::info!(
            fighters = roster.len(),
            buffs = catalog.len(),
            "content loaded from {}",
            dir.display()
        );
        Ok(Self { roster, config })
    }
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    rng: PcgSource,
    battle: Vec<u8>,
}

/// A battle bound to its session file.
pub struct Session {
    path: PathBuf,
    battle: ArenaBattle,
    resumed: bool,
}

impl Session {
    /// Resume the configured session, or start a new battle if none is saved.
    pub fn open(config: &ArenaConfig, content: &Content) -> Result<Self> {
        let path = session_path(&config.resolved_save_dir(), &config.session);
        if path.exists() {
            return Self::load(path);
        }
        Self::start(path, config, content)
    }

    fn start(path: PathBuf, config: &ArenaConfig, content: &Content) -> Result<Self> {
        let spawn = |id: &str| {
            content
                .roster
                .spawn(id)
                .with_context(|| format!("Unknown fighter '{}' in roster", id))
        };
        let player = spawn(&config.player)?;
        let monster = spawn(&config.monster)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut battle =
            Battle::with_config(player, monster, PcgSource::new(seed), content.config.clone())?;
        if config.no_crit {
            battle.disable_critical_hit();
        }

        tracing::info!(
            player = %config.player,
            monster = %config.monster,
            seed,
            "new battle"
        );
        Ok(Self {
            path,
            battle,
            resumed: false,
        })
    }

    fn load(path: PathBuf) -> Result<Self> {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read session {}", path.display()))?;
        let file: SessionFile = bincode::deserialize(&bytes)
            .with_context(|| format!("Corrupt session file {}", path.display()))?;
        let battle = Battle::deserialize(&file.battle, file.rng)?;

        tracing::info!(rounds = battle.rounds_fought(), "session resumed");
        Ok(Self {
            path,
            battle,
            resumed: true,
        })
    }

    /// Write the battle and its random source back to the session file.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create save directory {}", dir.display()))?;
        }

        let file = SessionFile {
            rng: *self.battle.random_source(),
            battle: self.battle.serialize()?,
        };
        let bytes = bincode::serialize(&file).context("Failed to encode session")?;
        std::fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write session {}", self.path.display()))?;

        tracing::debug!("Session saved: {}", self.path.display());
        Ok(())
    }

    pub fn battle(&self) -> &ArenaBattle {
        &self.battle
    }

    pub fn battle_mut(&mut self) -> &mut ArenaBattle {
        &mut self.battle
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn session_path(save_dir: &Path, session: &str) -> PathBuf {
    save_dir.join(format!("{session}.battle"))
}
