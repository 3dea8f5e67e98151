//! The capability the engine requires from a combat participant.
//!
//! The engine never owns fighter persistence: it only needs health, raw
//! attack and defense, and the fighter's [`BuffList`]. [`Combatant`] is the
//! provided implementation used by content loaders and tests.

use crate::buff::{Buff, BuffError, BuffList};

/// Minimal interface of a combat participant.
///
/// Health is clamped to `[0, max_health]` by every provided mutator except
/// [`overheal`](Fighter::overheal).
pub trait Fighter {
    fn name(&self) -> &str;

    fn level(&self) -> u32;

    fn max_health(&self) -> u32;

    fn health(&self) -> u32;

    /// Store a health value verbatim. Callers go through the clamping helpers.
    fn store_health(&mut self, health: u32);

    /// Raw attack value, before buff multipliers.
    fn attack(&self) -> f64;

    /// Raw defense value, before buff multipliers.
    fn defense(&self) -> f64;

    fn buffs(&self) -> &BuffList;

    fn buffs_mut(&mut self) -> &mut BuffList;

    fn is_alive(&self) -> bool {
        self.health() > 0
    }

    /// Missing health up to the maximum.
    fn health_deficit(&self) -> u32 {
        self.max_health().saturating_sub(self.health())
    }

    fn set_health(&mut self, amount: u32) {
        let max = self.max_health();
        self.store_health(amount.min(max));
    }

    fn damage(&mut self, amount: u32) {
        let health = self.health().saturating_sub(amount);
        self.store_health(health);
    }

    /// Heal up to the maximum. An already overhealed fighter keeps its surplus.
    fn heal(&mut self, amount: u32) {
        let health = self.health();
        let healed = health.saturating_add(amount).min(self.max_health());
        self.store_health(healed.max(health));
    }

    /// Heal without the maximum-health clamp.
    fn overheal(&mut self, amount: u32) {
        let health = self.health().saturating_add(amount);
        self.store_health(health);
    }

    /// Signed adjustment: negative damages, positive heals.
    fn adjust_health(&mut self, delta: i32) {
        if delta < 0 {
            self.damage(delta.unsigned_abs());
        } else {
            self.heal(delta.unsigned_abs());
        }
    }
}

/// A plain, serializable fighter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    name: String,
    level: u32,
    max_health: u32,
    health: u32,
    attack: f64,
    defense: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    buffs: BuffList,
}

impl Combatant {
    /// Creates a fighter at full health with no buffs.
    pub fn new(name: impl Into<String>, level: u32, max_health: u32, attack: f64, defense: f64) -> Self {
        Self {
            name: name.into(),
            level,
            max_health,
            health: max_health,
            attack,
            defense,
            buffs: BuffList::new(),
        }
    }

    /// Sets current health (builder pattern), clamped to the maximum.
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.set_health(health);
        self
    }

    /// Attaches a buff (builder pattern).
    pub fn with_buff(mut self, buff: Buff) -> Result<Self, BuffError> {
        self.buffs.attach(buff)?;
        Ok(self)
    }
}

impl Fighter for Combatant {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn max_health(&self) -> u32 {
        self.max_health
    }

    fn health(&self) -> u32 {
        self.health
    }

    fn store_health(&mut self, health: u32) {
        self.health = health;
    }

    fn attack(&self) -> f64 {
        self.attack
    }

    fn defense(&self) -> f64 {
        self.defense
    }

    fn buffs(&self) -> &BuffList {
        &self.buffs
    }

    fn buffs_mut(&mut self) -> &mut BuffList {
        &mut self.buffs
    }
}

/// One of the two fixed fighter slots of a battle.
///
/// The player is the side that initiates every round.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Player,
    Monster,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Monster];

    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Monster,
            Self::Monster => Self::Player,
        }
    }
}

/// The two fighters of a battle, addressed by [`Side`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pairing<F> {
    pub player: F,
    pub monster: F,
}

impl<F: Fighter> Pairing<F> {
    pub fn new(player: F, monster: F) -> Self {
        Self { player, monster }
    }

    pub fn get(&self, side: Side) -> &F {
        match side {
            Side::Player => &self.player,
            Side::Monster => &self.monster,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut F {
        match side {
            Side::Player => &mut self.player,
            Side::Monster => &mut self.monster,
        }
    }

    /// First side (player before monster) whose fighter is down.
    pub fn first_down(&self) -> Option<Side> {
        Side::BOTH.into_iter().find(|&side| !self.get(side).is_alive())
    }
}
