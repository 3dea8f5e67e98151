//! Battle events: atomic, narratable outcomes of a round.
//!
//! Every outcome is one [`EventKind`] variant. The engine appends events to
//! the battle log and applies each one exactly once; rendering is separate
//! and may happen any number of times, before or after application.
//!
//! # Participants
//!
//! Events name fighters by [`Side`] rather than holding references, so the
//! log serializes without aliasing and resolves against the battle's
//! [`Pairing`] when applied.

mod narrate;

pub use narrate::{CriticalTier, Narrator};

use crate::error::{CombatError, ErrorClass};
use crate::fighter::{Fighter, Pairing, Side};

/// Errors raised by event application.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("{kind} event has already been applied")]
    AlreadyApplied { kind: &'static str },
}

impl CombatError for EventError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Misuse
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyApplied { .. } => "EVENT_ALREADY_APPLIED",
        }
    }
}

/// What happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// Main attack exchange of a sub-round. Positive amounts hit the
    /// defender, negative ones are a riposte against the attacker, zero is a
    /// miss.
    Damage { attacker: Side, amount: i32 },

    /// Damage bounced back onto `target`. Negative amounts heal.
    DamageReflection {
        target: Side,
        amount: i32,
        message: String,
    },

    /// Healing drawn from damage dealt.
    DamageLifetap {
        target: Side,
        amount: i32,
        message: String,
    },

    /// One minion strike. Negative amounts heal.
    MinionDamage {
        target: Side,
        amount: i32,
        message: String,
    },

    /// Regeneration (positive) or drain (negative), already clamped.
    Regeneration {
        target: Side,
        amount: i32,
        succeed_message: String,
        fail_message: String,
    },

    /// The attacker's attack value was multiplied by a critical hit.
    CriticalHit {
        attacker: Side,
        base_attack: f64,
        attack: f64,
    },

    /// `victim` has fallen.
    Death { victim: Side },

    /// Plain narration.
    Message { text: String },
}

impl EventKind {
    /// Static name of the variant.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Damage { .. } => "damage",
            Self::DamageReflection { .. } => "damage_reflection",
            Self::DamageLifetap { .. } => "damage_lifetap",
            Self::MinionDamage { .. } => "minion_damage",
            Self::Regeneration { .. } => "regeneration",
            Self::CriticalHit { .. } => "critical_hit",
            Self::Death { .. } => "death",
            Self::Message { .. } => "message",
        }
    }
}

/// An event plus its application latch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleEvent {
    kind: EventKind,
    applied: bool,
}

impl BattleEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            applied: false,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::new(EventKind::Message { text: text.into() })
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Mutates the fighters exactly once.
    ///
    /// A second call fails with [`EventError::AlreadyApplied`] and leaves the
    /// fighters untouched.
    pub fn apply<F: Fighter>(&mut self, pairing: &mut Pairing<F>) -> Result<(), EventError> {
        if self.applied {
            return Err(EventError::AlreadyApplied {
                kind: self.kind.name(),
            });
        }

        match &self.kind {
            EventKind::Damage { attacker, amount } => {
                let target = if *amount >= 0 {
                    attacker.opponent()
                } else {
                    *attacker
                };
                pairing.get_mut(target).damage(amount.unsigned_abs());
            }
            EventKind::DamageReflection { target, amount, .. }
            | EventKind::MinionDamage { target, amount, .. } => {
                pairing.get_mut(*target).adjust_health(amount.saturating_neg());
            }
            EventKind::DamageLifetap { target, amount, .. }
            | EventKind::Regeneration { target, amount, .. } => {
                pairing.get_mut(*target).adjust_health(*amount);
            }
            EventKind::CriticalHit { .. } | EventKind::Death { .. } | EventKind::Message { .. } => {}
        }

        self.applied = true;
        Ok(())
    }

    /// Renders the event for the given viewer. Pure and repeatable.
    pub fn decorate(&self, narrator: &Narrator<'_>) -> String {
        narrator.render(&self.kind)
    }
}
