//! The main attack exchange: attack and defense rolls, criticals, riposte.

use tracing::{trace, warn};

use crate::buff::{Party, Stat};
use crate::event::EventKind;
use crate::fighter::{Fighter, Side};
use crate::rng::RandomSource;

use super::{Battle, BattleError};

// ============================================================================
// Exchange
// ============================================================================

/// Signed damage of one round, rolled once for both directions.
///
/// Positive values hit the defender of that direction, negative values are a
/// riposte against its attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Exchange {
    pub to_monster: i32,
    pub to_player: i32,
}

impl Exchange {
    pub(super) const MISS: Self = Self {
        to_monster: 0,
        to_player: 0,
    };

    /// Damage for the direction in which `attacker` strikes.
    pub(super) const fn dealt_by(self, attacker: Side) -> i32 {
        match attacker {
            Side::Player => self.to_monster,
            Side::Monster => self.to_player,
        }
    }

    const fn is_miss(self) -> bool {
        self.to_monster == 0 && self.to_player == 0
    }
}

// ============================================================================
// Rolling
// ============================================================================

impl<F: Fighter, R: RandomSource> Battle<F, R> {
    /// Fighter stat scaled by its own buffs and the opponent's.
    fn effective(&self, side: Side, stat: Stat) -> f64 {
        let own = self.fighter(side);
        let foe = self.fighter(side.opponent());
        let base = match stat {
            Stat::Attack => own.attack(),
            Stat::Defense => own.defense(),
            Stat::Damage => 1.0,
        };
        base * own.buffs().multiplier(Party::Owner, stat)
            * foe.buffs().multiplier(Party::Opponent, stat)
    }

    /// Whether damage dealt to `side` is absorbed.
    pub(super) fn is_shielded(&self, side: Side) -> bool {
        self.fighter(side).buffs().owner_invulnerable()
            || self.fighter(side.opponent()).buffs().opponent_invulnerable()
    }

    fn critical_hit_chance(&self) -> f64 {
        if self.critical_hits_enabled() {
            self.state.config.critical_hit_chance
        } else {
            0.0
        }
    }

    /// Rolls the round's exchange. A critical hit, if any, is recorded first.
    ///
    /// Only the player can land a critical hit, rolled once per round: the
    /// exchange covers both directions, so the monster's strike reuses it.
    /// The event records the raw attack against the boosted one, so buffs
    /// stacked under a crit narrate as a stronger move.
    ///
    /// A double miss is re-rolled until some damage happens or the configured
    /// reroll limit is reached.
    pub(super) fn roll_exchange(&mut self) -> Result<Exchange, BattleError> {
        let mut player_attack = self.effective(Side::Player, Stat::Attack);
        let monster_attack = self.effective(Side::Monster, Stat::Attack);
        let player_defense = self.effective(Side::Player, Stat::Defense);
        let monster_defense = self.effective(Side::Monster, Stat::Defense);

        let chance = self.critical_hit_chance();
        if chance > 0.0 && self.rng.bernoulli(chance) {
            let base_attack = self.player().attack();
            player_attack *= self.state.config.critical_hit_multiplier;
            self.record_kind(EventKind::CriticalHit {
                attacker: Side::Player,
                base_attack,
                attack: player_attack,
            })?;
        }

        let max_rerolls = self.state.config.max_exchange_rerolls;
        let mut rerolls = 0;
        let exchange = loop {
            let exchange = Exchange {
                to_monster: self.directed_damage(Side::Player, player_attack, monster_defense),
                to_player: self.directed_damage(Side::Monster, monster_attack, player_defense),
            };
            if !exchange.is_miss() {
                break exchange;
            }
            if rerolls >= max_rerolls {
                warn!(rerolls, "exchange reroll limit reached, both sides miss");
                break Exchange::MISS;
            }
            rerolls += 1;
        };

        trace!(
            to_monster = exchange.to_monster,
            to_player = exchange.to_player,
            rerolls,
            "exchange rolled"
        );
        Ok(self.shield(exchange))
    }

    /// Rounded damage for one direction, scaled by the side that ends up
    /// dealing it.
    fn directed_damage(&mut self, attacker: Side, attack: f64, defense: f64) -> i32 {
        let draws = self.state.config.max_normal_draws;
        let attack_roll = self.rng.bounded_normal_within(0.0, attack, draws);
        let defense_roll = self.rng.bounded_normal_within(0.0, defense, draws);

        let raw = attack_roll - defense_roll;
        let scaled = if raw < 0.0 {
            raw * self.state.config.riposte_factor
                * self.effective(attacker.opponent(), Stat::Damage)
        } else {
            raw * self.effective(attacker, Stat::Damage)
        };
        scaled.round() as i32
    }

    /// Zeroes every direction whose recipient is invulnerable.
    fn shield(&self, exchange: Exchange) -> Exchange {
        let absorb = |attacker: Side, amount: i32| {
            let recipient = if amount < 0 { attacker } else { attacker.opponent() };
            if amount != 0 && self.is_shielded(recipient) {
                0
            } else {
                amount
            }
        };
        Exchange {
            to_monster: absorb(Side::Player, exchange.to_monster),
            to_player: absorb(Side::Monster, exchange.to_player),
        }
    }
}
