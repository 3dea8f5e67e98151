//! Error types for battle orchestration.

use crate::buff::BuffError;
use crate::error::{CombatError, ErrorClass};
use crate::event::EventError;
use crate::fighter::Side;

/// Errors surfaced while constructing, driving or resuming a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("battle is not over yet")]
    BattleNotOver,

    #[error("battle is already over")]
    BattleIsOver,

    #[error("{side} fighter '{name}' must be alive to enter a battle")]
    FighterNotAlive { side: Side, name: String },

    #[error("buff failure: {0}")]
    Buff(#[from] BuffError),

    #[error("event failure: {0}")]
    Event(#[from] EventError),

    #[error("battle codec failure: {0}")]
    Codec(String),
}

impl CombatError for BattleError {
    fn class(&self) -> ErrorClass {
        use BattleError::*;
        match self {
            BattleNotOver | BattleIsOver => ErrorClass::Misuse,
            FighterNotAlive { .. } => ErrorClass::Construction,
            Buff(err) => err.class(),
            Event(err) => err.class(),
            Codec(_) => ErrorClass::Codec,
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            BattleNotOver => "BATTLE_NOT_OVER",
            BattleIsOver => "BATTLE_IS_OVER",
            FighterNotAlive { .. } => "BATTLE_FIGHTER_NOT_ALIVE",
            Buff(err) => err.error_code(),
            Event(err) => err.error_code(),
            Codec(_) => "BATTLE_CODEC",
        }
    }
}
