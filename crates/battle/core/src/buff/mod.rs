//! Timed, slotted modifiers ("buffs") attached to a fighter.
//!
//! A [`Buff`] is an immutable-by-convention record: it describes when it fires
//! ([`Activation`]), how long it lasts ([`Rounds`]), what it narrates
//! ([`BuffMessages`]) and what it does to each party ([`BuffEffects`]).
//! The owning [`BuffList`] drives its lifecycle.
//!
//! # Parties
//!
//! Every numeric effect exists twice: once for the fighter that owns the buff
//! ([`Party::Owner`]) and once for that fighter's opponent
//! ([`Party::Opponent`]).

mod error;
mod list;

pub use error::BuffError;
pub use list::BuffList;

use bitflags::bitflags;

bitflags! {
    /// When a buff's effects fire during a round.
    ///
    /// The empty set ([`Activation::NONE`]) means the buff is attached but
    /// inert: it neither narrates nor contributes to aggregates.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Activation: u8 {
        const ROUND_START = 1 << 0;
        const ROUND_END   = 1 << 1;
        const OFFENSE     = 1 << 2;
        const DEFENSE     = 1 << 3;
        const WHILE_ROUND = Self::OFFENSE.bits() | Self::DEFENSE.bits();
        const ANY         = Self::ROUND_START.bits()
            | Self::ROUND_END.bits()
            | Self::OFFENSE.bits()
            | Self::DEFENSE.bits();
    }
}

impl Activation {
    /// Never active.
    pub const NONE: Self = Self::empty();
}

/// Remaining lifetime of a buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounds {
    /// Decremented once per completed round; expires at zero.
    Finite(u32),
    /// Lasts until the next game day, which never happens inside a battle.
    Infinite,
}

impl Rounds {
    /// Convert a legacy signed count where any negative value means infinite.
    pub fn from_count(count: i64) -> Self {
        if count < 0 {
            Self::Infinite
        } else {
            Self::Finite(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }
}

/// Which fighter a buff effect applies to, relative to the buff's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Party {
    Owner,
    Opponent,
}

/// Fighter statistic scaled by an aggregate multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Stat {
    Attack,
    Defense,
    Damage,
}

/// Inclusive damage range of a single minion strike. Negative values heal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinionDamage {
    pub min: i32,
    pub max: i32,
}

impl MinionDamage {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Numeric effects of a buff on one party. Every field defaults to neutral.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuffEffects {
    /// Health restored (positive) or drained (negative) per activated phase.
    pub regeneration: i32,
    /// Fraction of damage dealt returned as healing to the dealer.
    pub lifetap: f64,
    /// Fraction of damage received bounced back to the dealer.
    pub reflection: f64,
    /// Damage each minion inflicts on this party.
    pub minion_damage: Option<MinionDamage>,
    pub attack_multiplier: f64,
    pub defense_multiplier: f64,
    pub damage_multiplier: f64,
    pub invulnerable: bool,
}

impl BuffEffects {
    pub const NEUTRAL: Self = Self {
        regeneration: 0,
        lifetap: 0.0,
        reflection: 0.0,
        minion_damage: None,
        attack_multiplier: 1.0,
        defense_multiplier: 1.0,
        damage_multiplier: 1.0,
        invulnerable: false,
    };

    pub fn with_regeneration(mut self, amount: i32) -> Self {
        self.regeneration = amount;
        self
    }

    pub fn with_lifetap(mut self, fraction: f64) -> Self {
        self.lifetap = fraction;
        self
    }

    pub fn with_reflection(mut self, fraction: f64) -> Self {
        self.reflection = fraction;
        self
    }

    pub fn with_minion_damage(mut self, min: i32, max: i32) -> Self {
        self.minion_damage = Some(MinionDamage::new(min, max));
        self
    }

    pub fn with_attack(mut self, multiplier: f64) -> Self {
        self.attack_multiplier = multiplier;
        self
    }

    pub fn with_defense(mut self, multiplier: f64) -> Self {
        self.defense_multiplier = multiplier;
        self
    }

    pub fn with_damage(mut self, multiplier: f64) -> Self {
        self.damage_multiplier = multiplier;
        self
    }

    pub fn with_invulnerable(mut self, invulnerable: bool) -> Self {
        self.invulnerable = invulnerable;
        self
    }

    /// Multiplier for the given stat.
    pub fn multiplier(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Attack => self.attack_multiplier,
            Stat::Defense => self.defense_multiplier,
            Stat::Damage => self.damage_multiplier,
        }
    }

    fn validate(&self, slot: &str) -> Result<(), BuffError> {
        let invalid = |parameter| BuffError::InvalidParameter {
            slot: slot.to_owned(),
            parameter,
        };

        let fractions = [
            ("lifetap", self.lifetap),
            ("reflection", self.reflection),
            ("attack_multiplier", self.attack_multiplier),
            ("defense_multiplier", self.defense_multiplier),
            ("damage_multiplier", self.damage_multiplier),
        ];
        if let Some((name, _)) = fractions.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(*name));
        }
        if let Some(range) = self.minion_damage
            && range.min > range.max
        {
            return Err(invalid("minion_damage"));
        }
        Ok(())
    }
}

impl Default for BuffEffects {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Narration templates. Empty strings are never narrated.
///
/// `effect_succeeds`, `effect_fails` and `no_effect` accept `{target}`,
/// `{amount}` and `{damage}` placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuffMessages {
    pub start: String,
    pub round: String,
    pub end: String,
    pub effect_succeeds: String,
    pub effect_fails: String,
    pub no_effect: String,
}

impl BuffMessages {
    /// Message for an effect that resolved to zero: `no_effect`, falling back
    /// to `effect_fails`.
    pub fn zero_effect(&self) -> &str {
        if self.no_effect.is_empty() {
            &self.effect_fails
        } else {
            &self.no_effect
        }
    }
}

/// A single timed effect occupying one slot of a fighter's [`BuffList`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    slot: String,
    activation: Activation,
    rounds: Rounds,
    #[cfg_attr(feature = "serde", serde(default))]
    has_started: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    messages: BuffMessages,
    #[cfg_attr(feature = "serde", serde(default))]
    owner: BuffEffects,
    #[cfg_attr(feature = "serde", serde(default))]
    opponent: BuffEffects,
    #[cfg_attr(feature = "serde", serde(default))]
    minion_count: u32,
}

impl Buff {
    /// Start building a buff for the given slot.
    pub fn builder(slot: impl Into<String>) -> BuffBuilder {
        BuffBuilder::new(slot)
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn rounds(&self) -> Rounds {
        self.rounds
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn messages(&self) -> &BuffMessages {
        &self.messages
    }

    pub fn effects(&self, party: Party) -> &BuffEffects {
        match party {
            Party::Owner => &self.owner,
            Party::Opponent => &self.opponent,
        }
    }

    pub fn minion_count(&self) -> u32 {
        self.minion_count
    }

    /// True when the activation mask is empty.
    pub fn is_dormant(&self) -> bool {
        self.activation.is_empty()
    }

    /// True when the buff's effects fire in the given timing.
    pub fn fires_during(&self, timing: Activation) -> bool {
        self.activation.intersects(timing)
    }

    /// Checks the invariants enforced by the builder.
    ///
    /// Buffs deserialized from content files bypass the builder and must be
    /// validated before they are attached.
    pub fn validate(&self) -> Result<(), BuffError> {
        if self.slot.trim().is_empty() {
            return Err(BuffError::MissingField { field: "slot" });
        }
        if self.rounds == Rounds::Finite(0) {
            return Err(BuffError::ZeroRounds {
                slot: self.slot.clone(),
            });
        }
        self.owner.validate(&self.slot)?;
        self.opponent.validate(&self.slot)
    }

    /// Latch the buff as started. Returns true on the first call.
    pub(crate) fn mark_started(&mut self) -> bool {
        !core::mem::replace(&mut self.has_started, true)
    }

    /// Consume one round of a finite buff. Returns true when it has expired.
    pub(crate) fn tick(&mut self) -> Result<bool, BuffError> {
        match self.rounds {
            Rounds::Infinite => Ok(false),
            Rounds::Finite(0) => Err(BuffError::RoundsUnderflow {
                slot: self.slot.clone(),
            }),
            Rounds::Finite(n) => {
                self.rounds = Rounds::Finite(n - 1);
                Ok(n == 1)
            }
        }
    }
}

/// Builder for [`Buff`]. Slot and activation are required.
#[derive(Clone, Debug)]
pub struct BuffBuilder {
    slot: String,
    activation: Option<Activation>,
    rounds: Rounds,
    messages: BuffMessages,
    owner: BuffEffects,
    opponent: BuffEffects,
    minion_count: u32,
}

impl BuffBuilder {
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            activation: None,
            rounds: Rounds::Finite(1),
            messages: BuffMessages::default(),
            owner: BuffEffects::NEUTRAL,
            opponent: BuffEffects::NEUTRAL,
            minion_count: 0,
        }
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    pub fn rounds(mut self, rounds: u32) -> Self {
        self.rounds = Rounds::Finite(rounds);
        self
    }

    pub fn infinite(mut self) -> Self {
        self.rounds = Rounds::Infinite;
        self
    }

    pub fn start_message(mut self, text: impl Into<String>) -> Self {
        self.messages.start = text.into();
        self
    }

    pub fn round_message(mut self, text: impl Into<String>) -> Self {
        self.messages.round = text.into();
        self
    }

    pub fn end_message(mut self, text: impl Into<String>) -> Self {
        self.messages.end = text.into();
        self
    }

    pub fn effect_message(mut self, text: impl Into<String>) -> Self {
        self.messages.effect_succeeds = text.into();
        self
    }

    pub fn effect_fail_message(mut self, text: impl Into<String>) -> Self {
        self.messages.effect_fails = text.into();
        self
    }

    pub fn no_effect_message(mut self, text: impl Into<String>) -> Self {
        self.messages.no_effect = text.into();
        self
    }

    pub fn messages(mut self, messages: BuffMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Effects on the fighter that carries the buff.
    pub fn owner(mut self, effects: BuffEffects) -> Self {
        self.owner = effects;
        self
    }

    /// Effects on the carrier's opponent.
    pub fn opponent(mut self, effects: BuffEffects) -> Self {
        self.opponent = effects;
        self
    }

    pub fn minions(mut self, count: u32) -> Self {
        self.minion_count = count;
        self
    }

    pub fn build(self) -> Result<Buff, BuffError> {
        let activation = self
            .activation
            .ok_or(BuffError::MissingField { field: "activation" })?;

        let buff = Buff {
            slot: self.slot,
            activation,
            rounds: self.rounds,
            has_started: false,
            messages: self.messages,
            owner: self.owner,
            opponent: self.opponent,
            minion_count: self.minion_count,
        };
        buff.validate()?;
        Ok(buff)
    }
}
