//! Battle orchestration and suspend/resume.
//!
//! The [`Battle`] is the authoritative reducer for a fight. It owns both
//! fighters and the append-only event log; every health change flows through
//! an event that is applied exactly once as it is recorded.
//!
//! # Round Structure
//!
//! ```text
//! round start   buff narration, ROUND_START effects
//! offense       player → monster: OFFENSE effects, exchange roll, damage,
//!               reflection, lifetap
//! defense       monster → player: DEFENSE effects, damage, reflection, lifetap
//! round end     ROUND_END effects, buff expiry
//! ```
//!
//! Termination is checked after every timed effect and after every phase.
//! The remaining effects and phases of the round are skipped once a fighter
//! is down. The follow-ups of a main strike (reflection, lifetap) always
//! resolve together with it, which is how both fighters can fall at once.
//!
//! # Resuming
//!
//! [`Battle::serialize`] captures both fighters, the log, the round counter,
//! the crit switch and the configuration. The random source is not part of the
//! blob; it is re-supplied to [`Battle::deserialize`].

mod effects;
mod errors;
mod exchange;
mod round;

pub use errors::BattleError;

use tracing::info;

use crate::buff::BuffList;
use crate::config::BattleConfig;
use crate::event::{BattleEvent, EventKind, Narrator};
use crate::fighter::{Fighter, Pairing, Side};
use crate::rng::RandomSource;

/// Everything that survives a suspend/resume cycle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct BattleState<F> {
    pairing: Pairing<F>,
    events: Vec<BattleEvent>,
    rounds_fought: u32,
    critical_hits_disabled: bool,
    config: BattleConfig,
    /// First side whose health reached zero, in event-log order.
    fallen: Option<Side>,
}

/// A fight between two fighters, resolved round by round.
pub struct Battle<F, R> {
    state: BattleState<F>,
    rng: R,
}

impl<F: Fighter, R: RandomSource> Battle<F, R> {
    /// Creates a battle with the default configuration.
    pub fn new(player: F, monster: F, rng: R) -> Result<Self, BattleError> {
        Self::with_config(player, monster, rng, BattleConfig::default())
    }

    /// Creates a battle. Both fighters must be alive.
    pub fn with_config(
        player: F,
        monster: F,
        rng: R,
        config: BattleConfig,
    ) -> Result<Self, BattleError> {
        let pairing = Pairing::new(player, monster);
        if let Some(side) = pairing.first_down() {
            return Err(BattleError::FighterNotAlive {
                side,
                name: pairing.get(side).name().to_owned(),
            });
        }

        Ok(Self {
            state: BattleState {
                pairing,
                events: Vec::new(),
                rounds_fought: 0,
                critical_hits_disabled: false,
                config,
                fallen: None,
            },
            rng,
        })
    }

    /// Resolves up to `n` rounds, stopping as soon as a fighter is down.
    ///
    /// Returns the number of rounds actually fought.
    pub fn fight_n_rounds(&mut self, n: u32) -> Result<u32, BattleError> {
        if self.is_over() {
            return Err(BattleError::BattleIsOver);
        }

        let mut fought = 0;
        while fought < n && !self.is_over() {
            self.fight_one_round()?;
            fought += 1;
        }

        if let Ok(winner) = self.winner() {
            info!(
                winner = winner.name(),
                rounds = self.state.rounds_fought,
                "battle over"
            );
        }
        Ok(fought)
    }

    /// True once either fighter's health has reached zero.
    pub fn is_over(&self) -> bool {
        self.state.pairing.first_down().is_some()
    }

    /// The side that went down first.
    ///
    /// If both fighters are at zero health the one that fell first, in event
    /// order, is the loser.
    pub fn loser_side(&self) -> Result<Side, BattleError> {
        if !self.is_over() {
            return Err(BattleError::BattleNotOver);
        }
        self.state
            .fallen
            .or_else(|| self.state.pairing.first_down())
            .ok_or(BattleError::BattleNotOver)
    }

    pub fn winner_side(&self) -> Result<Side, BattleError> {
        self.loser_side().map(Side::opponent)
    }

    pub fn winner(&self) -> Result<&F, BattleError> {
        Ok(self.fighter(self.winner_side()?))
    }

    pub fn loser(&self) -> Result<&F, BattleError> {
        Ok(self.fighter(self.loser_side()?))
    }

    /// The append-only battle log.
    pub fn events(&self) -> &[BattleEvent] {
        &self.state.events
    }

    pub fn player(&self) -> &F {
        &self.state.pairing.player
    }

    pub fn monster(&self) -> &F {
        &self.state.pairing.monster
    }

    pub fn fighter(&self, side: Side) -> &F {
        self.state.pairing.get(side)
    }

    /// Buffs of one side, for attaching or renewing between rounds.
    pub fn buffs_mut(&mut self, side: Side) -> &mut BuffList {
        self.state.pairing.get_mut(side).buffs_mut()
    }

    pub fn rounds_fought(&self) -> u32 {
        self.state.rounds_fought
    }

    /// Forces the critical-hit probability to zero for the rest of the battle.
    pub fn disable_critical_hit(&mut self) {
        self.state.critical_hits_disabled = true;
    }

    pub fn critical_hits_enabled(&self) -> bool {
        !self.state.critical_hits_disabled
    }

    pub fn config(&self) -> &BattleConfig {
        &self.state.config
    }

    pub fn random_source(&self) -> &R {
        &self.rng
    }

    /// Consumes the battle, handing back the random source.
    pub fn into_random_source(self) -> R {
        self.rng
    }

    /// Rendering context for this battle's fighters.
    pub fn narrator(&self, viewer: Option<Side>) -> Narrator<'_> {
        Narrator::for_pairing(viewer, &self.state.pairing)
    }

    /// Renders the whole log, skipping events with no narration.
    pub fn narrate(&self, viewer: Option<Side>) -> Vec<String> {
        let narrator = self.narrator(viewer);
        self.state
            .events
            .iter()
            .map(|event| event.decorate(&narrator))
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Applies an event to the fighters and appends it to the log.
    fn record(&mut self, mut event: BattleEvent) -> Result<(), BattleError> {
        event.apply(&mut self.state.pairing)?;
        tracing::trace!(kind = event.kind().name(), "event recorded");

        // A fighter healed back up no longer counts as fallen.
        if self.state.fallen.is_some_and(|side| self.fighter(side).is_alive()) {
            self.state.fallen = None;
        }
        if self.state.fallen.is_none() {
            self.state.fallen = self.state.pairing.first_down();
        }
        self.state.events.push(event);
        Ok(())
    }

    fn record_all(&mut self, events: Vec<BattleEvent>) -> Result<(), BattleError> {
        events.into_iter().try_for_each(|event| self.record(event))
    }

    fn record_kind(&mut self, kind: EventKind) -> Result<(), BattleError> {
        self.record(BattleEvent::new(kind))
    }
}

#[cfg(feature = "serde")]
impl<F, R> Battle<F, R>
where
    F: Fighter + serde::Serialize,
    R: RandomSource,
{
    /// Encodes the battle into an opaque resume blob.
    pub fn serialize(&self) -> Result<Vec<u8>, BattleError> {
        bincode::serialize(&self.state).map_err(|e| BattleError::Codec(e.to_string()))
    }
}

#[cfg(feature = "serde")]
impl<F, R> Battle<F, R>
where
    F: Fighter + serde::de::DeserializeOwned,
    R: RandomSource,
{
    /// Rebuilds a battle from a resume blob and a fresh random source.
    pub fn deserialize(bytes: &[u8], rng: R) -> Result<Self, BattleError> {
        let state: BattleState<F> =
            bincode::deserialize(bytes).map_err(|e| BattleError::Codec(e.to_string()))?;
        tracing::debug!(
            rounds = state.rounds_fought,
            events = state.events.len(),
            "battle resumed"
        );
        Ok(Self { state, rng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::Combatant;
    use crate::rng::PcgSource;

    fn fighters() -> (Combatant, Combatant) {
        (
            Combatant::new("Hero", 5, 60, 12.0, 8.0),
            Combatant::new("Troll", 4, 45, 9.0, 6.0),
        )
    }

    #[test]
    fn dead_fighter_cannot_enter() {
        let (player, monster) = fighters();
        let err = Battle::new(player, monster.with_health(0), PcgSource::new(1))
            .err()
            .unwrap();
        assert_eq!(
            err,
            BattleError::FighterNotAlive {
                side: Side::Monster,
                name: "Troll".into()
            }
        );
    }

    #[test]
    fn verdict_requires_termination() {
        let (player, monster) = fighters();
        let battle = Battle::new(player, monster, PcgSource::new(1)).unwrap();
        assert!(!battle.is_over());
        assert_eq!(battle.winner().err(), Some(BattleError::BattleNotOver));
        assert_eq!(battle.loser().err(), Some(BattleError::BattleNotOver));
    }

    #[test]
    fn zero_rounds_is_a_no_op() {
        let (player, monster) = fighters();
        let mut battle = Battle::new(player, monster, PcgSource::new(1)).unwrap();
        assert_eq!(battle.fight_n_rounds(0), Ok(0));
        assert!(battle.events().is_empty());
        assert_eq!(battle.rounds_fought(), 0);
    }

    #[test]
    fn fighting_after_the_end_fails_without_mutation() {
        let (player, monster) = fighters();
        let mut battle = Battle::new(player, monster, PcgSource::new(11)).unwrap();
        battle.fight_n_rounds(10_000).unwrap();
        assert!(battle.is_over());

        let events = battle.events().len();
        let rounds = battle.rounds_fought();
        assert_eq!(battle.fight_n_rounds(1), Err(BattleError::BattleIsOver));
        assert_eq!(battle.events().len(), events);
        assert_eq!(battle.rounds_fought(), rounds);
    }

    #[test]
    fn crit_switch_is_sticky() {
        let (player, monster) = fighters();
        let mut battle = Battle::new(player, monster, PcgSource::new(1)).unwrap();
        assert!(battle.critical_hits_enabled());
        battle.disable_critical_hit();
        assert!(!battle.critical_hits_enabled());
    }
}
