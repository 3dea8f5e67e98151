//! Per-fighter buff stack.
//!
//! Buffs are kept in attachment order so every derived sequence (narration,
//! effect resolution) is stable across runs and across suspend/resume.

use crate::event::BattleEvent;

use super::{Activation, Buff, BuffError, Party, Stat};

/// All buffs attached to one fighter, at most one per slot.
///
/// The "active in battle" subset is every buff whose activation mask is not
/// [`Activation::NONE`]. Dormant buffs stay attached but are ignored by
/// aggregation, narration and expiry.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BuffList {
    buffs: Vec<Buff>,
}

impl BuffList {
    /// Creates an empty buff list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a buff to a free slot. The buff is validated first, so one
    /// deserialized without the builder cannot slip in.
    pub fn attach(&mut self, buff: Buff) -> Result<(), BuffError> {
        buff.validate()?;
        if self.has_slot(buff.slot()) {
            return Err(BuffError::SlotOccupied {
                slot: buff.slot().to_owned(),
            });
        }
        tracing::trace!(slot = buff.slot(), "buff attached");
        self.buffs.push(buff);
        Ok(())
    }

    /// Replaces whatever occupies the buff's slot, keeping its position.
    ///
    /// Returns the replaced buff, if any. An invalid buff leaves the list
    /// untouched.
    pub fn renew(&mut self, buff: Buff) -> Result<Option<Buff>, BuffError> {
        buff.validate()?;
        tracing::trace!(slot = buff.slot(), "buff renewed");
        match self.position(buff.slot()) {
            Some(index) => Ok(Some(core::mem::replace(&mut self.buffs[index], buff))),
            None => {
                self.buffs.push(buff);
                Ok(None)
            }
        }
    }

    /// Detaches the buff in the given slot.
    pub fn remove(&mut self, slot: &str) -> Option<Buff> {
        let index = self.position(slot)?;
        Some(self.buffs.remove(index))
    }

    pub fn has_slot(&self, slot: &str) -> bool {
        self.position(slot).is_some()
    }

    pub fn get(&self, slot: &str) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.slot() == slot)
    }

    /// All attached buffs in attachment order, dormant ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    /// Buffs taking part in the battle.
    pub fn active(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter().filter(|b| !b.is_dormant())
    }

    /// Active buffs whose effects fire during the given timing.
    pub fn firing(&self, timing: Activation) -> impl Iterator<Item = &Buff> {
        self.buffs.iter().filter(move |b| b.fires_during(timing))
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    /// Narrates the start of a round for every active buff.
    ///
    /// A buff's first activation yields its start message, later ones its
    /// round message. Empty messages are skipped.
    pub fn activate_for_round(&mut self) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        for buff in self.buffs.iter_mut().filter(|b| !b.is_dormant()) {
            let text = if buff.mark_started() {
                &buff.messages.start
            } else {
                &buff.messages.round
            };
            if !text.is_empty() {
                events.push(BattleEvent::message(text.clone()));
            }
        }
        events
    }

    /// Consumes one round of every active buff and detaches expired ones.
    ///
    /// Returns the end messages of expired buffs. Nothing is modified when a
    /// buff has no round left to consume.
    pub fn expire_one_round(&mut self) -> Result<Vec<BattleEvent>, BuffError> {
        if let Some(exhausted) = self
            .active()
            .find(|b| b.rounds() == super::Rounds::Finite(0))
        {
            return Err(BuffError::RoundsUnderflow {
                slot: exhausted.slot().to_owned(),
            });
        }

        let mut events = Vec::new();
        let mut kept = Vec::with_capacity(self.buffs.len());
        for mut buff in self.buffs.drain(..) {
            if buff.is_dormant() || !buff.tick()? {
                kept.push(buff);
                continue;
            }
            tracing::debug!(slot = buff.slot(), "buff expired");
            if !buff.messages.end.is_empty() {
                events.push(BattleEvent::message(buff.messages.end));
            }
        }
        self.buffs = kept;
        Ok(events)
    }

    /// Product of the given multiplier over all active buffs.
    pub fn multiplier(&self, party: Party, stat: Stat) -> f64 {
        self.active()
            .map(|b| b.effects(party).multiplier(stat))
            .product()
    }

    pub fn owner_attack_multiplier(&self) -> f64 {
        self.multiplier(Party::Owner, Stat::Attack)
    }

    pub fn owner_defense_multiplier(&self) -> f64 {
        self.multiplier(Party::Owner, Stat::Defense)
    }

    pub fn owner_damage_multiplier(&self) -> f64 {
        self.multiplier(Party::Owner, Stat::Damage)
    }

    pub fn opponent_attack_multiplier(&self) -> f64 {
        self.multiplier(Party::Opponent, Stat::Attack)
    }

    pub fn opponent_defense_multiplier(&self) -> f64 {
        self.multiplier(Party::Opponent, Stat::Defense)
    }

    pub fn opponent_damage_multiplier(&self) -> f64 {
        self.multiplier(Party::Opponent, Stat::Damage)
    }

    /// True if any active buff makes the given party invulnerable.
    pub fn invulnerable(&self, party: Party) -> bool {
        self.active().any(|b| b.effects(party).invulnerable)
    }

    pub fn owner_invulnerable(&self) -> bool {
        self.invulnerable(Party::Owner)
    }

    pub fn opponent_invulnerable(&self) -> bool {
        self.invulnerable(Party::Opponent)
    }

    fn position(&self, slot: &str) -> Option<usize> {
        self.buffs.iter().position(|b| b.slot() == slot)
    }
}
