//! Buff-driven effects: regeneration, minions, reflection and lifetap.
//!
//! Effect events are applied as soon as they are produced, so a later effect
//! in the same phase already sees the health left by an earlier one.

use crate::buff::{Buff, BuffEffects, BuffMessages, Party};
use crate::event::EventKind;
use crate::fighter::{Fighter, Side};
use crate::rng::RandomSource;

use super::round::Phase;
use super::{Battle, BattleError};

/// The fighter a buff's party-side effects land on.
const fn recipient(owner: Side, party: Party) -> Side {
    match party {
        Party::Owner => owner,
        Party::Opponent => owner.opponent(),
    }
}

/// Narration for an effect of the given amount, or `None` when a zero
/// result has nothing to say.
fn effect_message(messages: &BuffMessages, amount: i32) -> Option<String> {
    if amount != 0 {
        return Some(messages.effect_succeeds.clone());
    }
    let zero = messages.zero_effect();
    (!zero.is_empty()).then(|| zero.to_owned())
}

impl<F: Fighter, R: RandomSource> Battle<F, R> {
    /// Fires regeneration and then minions of every buff active in `phase`,
    /// player's buffs before the monster's.
    ///
    /// Stops at the first effect that leaves a fighter at zero health.
    pub(super) fn resolve_timed_effects(&mut self, phase: Phase) -> Result<(), BattleError> {
        let sources = self.firing_buffs(phase);
        for (owner, buff) in &sources {
            self.regenerate(*owner, buff)?;
            if self.is_over() {
                return Ok(());
            }
        }
        for (owner, buff) in &sources {
            self.release_minions(*owner, buff)?;
            if self.is_over() {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Snapshot of the buffs firing in `phase`, tagged with their owner.
    fn firing_buffs(&self, phase: Phase) -> Vec<(Side, Buff)> {
        let timing = phase.timing();
        Side::BOTH
            .into_iter()
            .flat_map(|side| {
                self.fighter(side)
                    .buffs()
                    .firing(timing)
                    .cloned()
                    .map(move |buff| (side, buff))
            })
            .collect()
    }

    /// Clamps a signed health change so it neither heals past the maximum nor
    /// drains below zero.
    fn clamp_change(&self, target: Side, amount: i32) -> i32 {
        let fighter = self.fighter(target);
        if amount >= 0 {
            let room = i32::try_from(fighter.health_deficit()).unwrap_or(i32::MAX);
            amount.min(room)
        } else {
            let drained = amount.unsigned_abs().min(fighter.health());
            0i32.saturating_sub_unsigned(drained)
        }
    }

    /// Zeroes a health loss aimed at an invulnerable fighter.
    fn absorb_loss(&self, target: Side, loss: i32) -> i32 {
        if loss > 0 && self.is_shielded(target) {
            0
        } else {
            loss
        }
    }

    fn regenerate(&mut self, owner: Side, buff: &Buff) -> Result<(), BattleError> {
        for party in [Party::Owner, Party::Opponent] {
            let requested = buff.effects(party).regeneration;
            if requested == 0 {
                continue;
            }
            let target = recipient(owner, party);
            let mut amount = self.clamp_change(target, requested);
            if amount < 0 && self.is_shielded(target) {
                amount = 0;
            }

            let messages = buff.messages();
            if amount == 0 && messages.zero_effect().is_empty() {
                continue;
            }
            self.record_kind(EventKind::Regeneration {
                target,
                amount,
                succeed_message: messages.effect_succeeds.clone(),
                fail_message: messages.zero_effect().to_owned(),
            })?;
            if self.is_over() {
                break;
            }
        }
        Ok(())
    }

    /// One strike per minion and configured range. The range aimed at the
    /// opponent strikes before the one aimed at the owner.
    fn release_minions(&mut self, owner: Side, buff: &Buff) -> Result<(), BattleError> {
        for _ in 0..buff.minion_count() {
            for party in [Party::Opponent, Party::Owner] {
                let Some(range) = buff.effects(party).minion_damage else {
                    continue;
                };
                let target = recipient(owner, party);
                let roll = self.rng.uniform(f64::from(range.min), f64::from(range.max));
                let amount = self.absorb_loss(target, roll.round() as i32);
                let message = effect_message(buff.messages(), amount)
                    .unwrap_or_else(|| buff.messages().effect_succeeds.clone());
                self.record_kind(EventKind::MinionDamage {
                    target,
                    amount,
                    message,
                })?;
                if self.is_over() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Follow-up effects of a main strike: reflection, then lifetap.
    pub(super) fn resolve_strike(&mut self, attacker: Side, amount: i32) -> Result<(), BattleError> {
        self.record_kind(EventKind::Damage { attacker, amount })?;
        if amount == 0 {
            return Ok(());
        }

        // A riposte turns the defender into the dealer.
        let dealer = if amount > 0 { attacker } else { attacker.opponent() };
        let dealt = f64::from(amount.unsigned_abs());
        self.reflect(dealer, dealt)?;
        self.lifetap(dealer, dealt)
    }

    /// Fractions of one effect field over the active buffs of two
    /// (side, party) sources, in order.
    fn fractions(
        &self,
        sources: [(Side, Party); 2],
        field: fn(&BuffEffects) -> f64,
    ) -> Vec<(f64, BuffMessages)> {
        sources
            .into_iter()
            .flat_map(|(side, party)| {
                self.fighter(side).buffs().active().filter_map(move |buff| {
                    let fraction = field(buff.effects(party));
                    (fraction != 0.0).then(|| (fraction, buff.messages().clone()))
                })
            })
            .collect()
    }

    /// Bounces a share of the damage back onto the dealer.
    fn reflect(&mut self, dealer: Side, dealt: f64) -> Result<(), BattleError> {
        let receiver = dealer.opponent();
        let sources = [(receiver, Party::Owner), (dealer, Party::Opponent)];
        for (fraction, messages) in self.fractions(sources, |e| e.reflection) {
            let amount = self.absorb_loss(dealer, (dealt * fraction).round() as i32);
            let Some(message) = effect_message(&messages, amount) else {
                continue;
            };
            self.record_kind(EventKind::DamageReflection {
                target: dealer,
                amount,
                message,
            })?;
        }
        Ok(())
    }

    /// Heals the dealer by a share of the damage, up to its missing health.
    fn lifetap(&mut self, dealer: Side, dealt: f64) -> Result<(), BattleError> {
        let receiver = dealer.opponent();
        let sources = [(dealer, Party::Owner), (receiver, Party::Opponent)];
        for (fraction, messages) in self.fractions(sources, |e| e.lifetap) {
            let requested = (dealt * fraction).round() as i32;
            let amount = self.clamp_change(dealer, requested);
            let Some(message) = effect_message(&messages, amount) else {
                continue;
            };
            self.record_kind(EventKind::DamageLifetap {
                target: dealer,
                amount,
                message,
            })?;
        }
        Ok(())
    }
}
