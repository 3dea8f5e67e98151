//! One round of combat, phase by phase.

use tracing::debug;

use crate::buff::Activation;
use crate::event::EventKind;
use crate::fighter::{Fighter, Side};
use crate::rng::RandomSource;

use super::exchange::Exchange;
use super::{Battle, BattleError};

/// Phases of a round, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub(super) enum Phase {
    RoundStart,
    Offense,
    Defense,
    RoundEnd,
}

impl Phase {
    /// Buff timing whose effects fire during this phase.
    pub(super) const fn timing(self) -> Activation {
        match self {
            Self::RoundStart => Activation::ROUND_START,
            Self::Offense => Activation::OFFENSE,
            Self::Defense => Activation::DEFENSE,
            Self::RoundEnd => Activation::ROUND_END,
        }
    }

    /// The sub-round in which `attacker` strikes.
    const fn striking(attacker: Side) -> Self {
        match attacker {
            Side::Player => Self::Offense,
            Side::Monster => Self::Defense,
        }
    }
}

impl<F: Fighter, R: RandomSource> Battle<F, R> {
    /// Resolves a single round. The caller guarantees the battle is not over.
    pub(super) fn fight_one_round(&mut self) -> Result<(), BattleError> {
        let round = self.state.rounds_fought + 1;
        let _span = tracing::debug_span!("round", round).entered();
        let first_event = self.state.events.len();

        self.resolve_phases()?;
        if self.is_over() {
            self.record_deaths()?;
        }
        self.state.rounds_fought = round;

        debug!(
            events = self.state.events.len() - first_event,
            player_health = self.player().health(),
            monster_health = self.monster().health(),
            "round resolved"
        );
        Ok(())
    }

    /// Runs the phases in order, returning early once a fighter is down.
    fn resolve_phases(&mut self) -> Result<(), BattleError> {
        self.open_round()?;
        if self.is_over() {
            return Ok(());
        }

        let exchange = self.sub_round(Side::Player, None)?;
        if self.is_over() {
            return Ok(());
        }

        self.sub_round(Side::Monster, exchange)?;
        if self.is_over() {
            return Ok(());
        }

        self.close_round()
    }

    fn open_round(&mut self) -> Result<(), BattleError> {
        for side in Side::BOTH {
            let events = self.buffs_mut(side).activate_for_round();
            self.record_all(events)?;
        }
        self.resolve_timed_effects(Phase::RoundStart)
    }

    /// One direction of the exchange. The offense sub-round rolls the
    /// exchange for both directions; the defense sub-round reuses it.
    fn sub_round(
        &mut self,
        attacker: Side,
        exchange: Option<Exchange>,
    ) -> Result<Option<Exchange>, BattleError> {
        let phase = Phase::striking(attacker);
        debug!(%phase, %attacker, "sub-round");

        self.resolve_timed_effects(phase)?;
        if self.is_over() {
            return Ok(exchange);
        }

        let exchange = match exchange {
            Some(exchange) => exchange,
            None => self.roll_exchange()?,
        };
        self.resolve_strike(attacker, exchange.dealt_by(attacker))?;
        Ok(Some(exchange))
    }

    fn close_round(&mut self) -> Result<(), BattleError> {
        self.resolve_timed_effects(Phase::RoundEnd)?;
        if self.is_over() {
            return Ok(());
        }

        for side in Side::BOTH {
            let events = self.buffs_mut(side).expire_one_round()?;
            self.record_all(events)?;
        }
        Ok(())
    }

    fn record_deaths(&mut self) -> Result<(), BattleError> {
        for victim in Side::BOTH {
            if !self.fighter(victim).is_alive() {
                debug!(%victim, "fighter down");
                self.record_kind(EventKind::Death { victim })?;
            }
        }
        Ok(())
    }
}
