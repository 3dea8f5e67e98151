//! Deterministic turn-based combat between two fighters.
//!
//! `battle-core` resolves fights between a player and a monster round by
//! round. Each round produces an ordered log of [`BattleEvent`]s; every health
//! change is carried by an event that is applied exactly once, and any event
//! can be rendered into narration from either fighter's point of view.
//!
//! Fighters are anything implementing [`Fighter`]. Timed modifiers live in a
//! per-fighter [`BuffList`], and all randomness is drawn from a caller-supplied
//! [`RandomSource`] so a seeded source replays a battle exactly.
//!
//! All state mutation flows through [`Battle`]; a battle can be suspended with
//! [`Battle::serialize`] and resumed with [`Battle::deserialize`].
pub mod battle;
pub mod buff;
pub mod config;
pub mod error;
pub mod event;
pub mod fighter;
pub mod rng;

pub use battle::{Battle, BattleError};
pub use buff::{
    Activation, Buff, BuffBuilder, BuffEffects, BuffError, BuffList, BuffMessages, MinionDamage,
    Party, Rounds, Stat,
};
pub use config::BattleConfig;
pub use error::{CombatError, ErrorClass};
pub use event::{BattleEvent, CriticalTier, EventError, EventKind, Narrator};
pub use fighter::{Combatant, Fighter, Pairing, Side};
#[cfg(feature = "std")]
pub use rng::EntropySource;
pub use rng::{FixedSource, PcgSource, RandomSource};
