//! Rendering of events into narration text.

use crate::fighter::{Fighter, Pairing, Side};

use super::EventKind;

/// Rendering context: who is reading and what the two sides are called.
///
/// The viewer sees themselves addressed as "you"; a `None` viewer gets a
/// neutral third-person account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Narrator<'a> {
    viewer: Option<Side>,
    player: &'a str,
    monster: &'a str,
}

impl<'a> Narrator<'a> {
    pub fn new(viewer: Option<Side>, player: &'a str, monster: &'a str) -> Self {
        Self {
            viewer,
            player,
            monster,
        }
    }

    /// Narrator over the names of a pairing.
    pub fn for_pairing<F: Fighter>(viewer: Option<Side>, pairing: &'a Pairing<F>) -> Self {
        Self::new(viewer, pairing.player.name(), pairing.monster.name())
    }

    pub fn viewer(&self) -> Option<Side> {
        self.viewer
    }

    pub fn name(&self, side: Side) -> &'a str {
        match side {
            Side::Player => self.player,
            Side::Monster => self.monster,
        }
    }

    fn is_viewer(&self, side: Side) -> bool {
        self.viewer == Some(side)
    }

    /// "you" for the viewer, the fighter's name otherwise.
    fn addressed(&self, side: Side) -> &'a str {
        if self.is_viewer(side) {
            "you"
        } else {
            self.name(side)
        }
    }

    pub(super) fn render(&self, kind: &EventKind) -> String {
        match kind {
            EventKind::Damage { attacker, amount } => self.damage(*attacker, *amount),
            EventKind::DamageReflection {
                target,
                amount,
                message,
            }
            | EventKind::DamageLifetap {
                target,
                amount,
                message,
            }
            | EventKind::MinionDamage {
                target,
                amount,
                message,
            } => self.substitute(message, *target, *amount),
            EventKind::Regeneration {
                target,
                amount,
                succeed_message,
                fail_message,
            } => {
                let template = if *amount == 0 {
                    fail_message
                } else {
                    succeed_message
                };
                self.substitute(template, *target, *amount)
            }
            EventKind::CriticalHit {
                attacker,
                base_attack,
                attack,
            } => self.critical_hit(*attacker, CriticalTier::classify(*base_attack, *attack)),
            // Reserved for richer death narration.
            EventKind::Death { .. } => String::new(),
            EventKind::Message { text } => text.clone(),
        }
    }

    /// Fills `{target}`, `{amount}` and `{damage}` placeholders.
    pub fn substitute(&self, template: &str, target: Side, amount: i32) -> String {
        let magnitude = amount.unsigned_abs().to_string();
        template
            .replace("{target}", self.addressed(target))
            .replace("{amount}", &magnitude)
            .replace("{damage}", &magnitude)
    }

    fn damage(&self, attacker: Side, amount: i32) -> String {
        let defender = attacker.opponent();
        let (att, def) = (self.name(attacker), self.name(defender));
        let points = points(amount);

        match amount.signum() {
            0 if self.is_viewer(attacker) => format!("You try to hit {def} but MISS!"),
            0 if self.is_viewer(defender) => format!("{att} tries to hit you but MISSES!"),
            0 => format!("{att} tries to hit {def} but misses."),
            1 if self.is_viewer(attacker) => format!("You hit {def} for {points} of damage!"),
            1 if self.is_viewer(defender) => format!("{att} hits you for {points} of damage!"),
            1 => format!("{att} hits {def} for {points} of damage."),
            _ if self.is_viewer(attacker) => {
                format!("You try to hit {def} but are RIPOSTED for {points} of damage!")
            }
            _ if self.is_viewer(defender) => {
                format!("{att} tries to hit you but you RIPOSTE for {points} of damage!")
            }
            _ => format!("{att} tries to hit {def} but is riposted for {points} of damage."),
        }
    }

    fn critical_hit(&self, attacker: Side, tier: Option<CriticalTier>) -> String {
        let Some(tier) = tier else {
            return String::new();
        };
        let mv = tier.move_name();
        if self.is_viewer(attacker) {
            format!("You execute a {mv}")
        } else {
            format!("{} executes a {mv}", self.name(attacker))
        }
    }
}

fn points(amount: i32) -> String {
    match amount.unsigned_abs() {
        1 => "1 point".to_owned(),
        n => format!("{n} points"),
    }
}

/// Narration strength of a critical hit, by the ratio of the multiplied
/// attack to the fighter's raw attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CriticalTier {
    Minor,
    Power,
    Double,
    Mega,
}

impl CriticalTier {
    /// `None` when the ratio does not exceed ×1.25.
    pub fn classify(base_attack: f64, attack: f64) -> Option<Self> {
        if base_attack <= 0.0 {
            return None;
        }
        let ratio = attack / base_attack;
        if ratio > 4.0 {
            Some(Self::Mega)
        } else if ratio > 3.0 {
            Some(Self::Double)
        } else if ratio > 2.0 {
            Some(Self::Power)
        } else if ratio > 1.25 {
            Some(Self::Minor)
        } else {
            None
        }
    }

    fn move_name(self) -> &'static str {
        match self {
            Self::Minor => "minor power move!",
            Self::Power => "power move!",
            Self::Double => "DOUBLE power move!!",
            Self::Mega => "MEGA power move!!!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrator(viewer: Option<Side>) -> Narrator<'static> {
        Narrator::new(viewer, "Hero", "Troll")
    }

    fn damage(attacker: Side, amount: i32, viewer: Option<Side>) -> String {
        narrator(viewer).render(&EventKind::Damage { attacker, amount })
    }

    #[test]
    fn damage_narration_by_perspective() {
        let you = Some(Side::Player);
        assert_eq!(damage(Side::Player, 0, you), "You try to hit Troll but MISS!");
        assert_eq!(damage(Side::Player, 5, you), "You hit Troll for 5 points of damage!");
        assert_eq!(
            damage(Side::Player, -1, you),
            "You try to hit Troll but are RIPOSTED for 1 point of damage!"
        );
        assert_eq!(damage(Side::Monster, 3, you), "Troll hits you for 3 points of damage!");
        assert_eq!(
            damage(Side::Monster, -2, you),
            "Troll tries to hit you but you RIPOSTE for 2 points of damage!"
        );
        assert_eq!(damage(Side::Monster, 0, None), "Troll tries to hit Hero but misses.");
    }

    #[test]
    fn templates_substitute_target_and_amount() {
        let kind = EventKind::MinionDamage {
            target: Side::Monster,
            amount: -4,
            message: "A bee stings {target} for {amount}; {damage}.".into(),
        };
        assert_eq!(narrator(None).render(&kind), "A bee stings Troll for 4; 4.");
        assert_eq!(
            narrator(Some(Side::Monster)).render(&kind),
            "A bee stings you for 4; 4."
        );
    }

    #[test]
    fn regeneration_uses_fail_message_at_zero() {
        let regen = |amount| EventKind::Regeneration {
            target: Side::Player,
            amount,
            succeed_message: "{target} regain {amount}".into(),
            fail_message: "{target} are at full health".into(),
        };
        let n = narrator(Some(Side::Player));
        assert_eq!(n.render(&regen(3)), "you regain 3");
        assert_eq!(n.render(&regen(0)), "you are at full health");
    }

    #[test]
    fn critical_tiers() {
        assert_eq!(CriticalTier::classify(10.0, 30.0), Some(CriticalTier::Power));
        assert_eq!(CriticalTier::classify(10.0, 30.1), Some(CriticalTier::Double));
        assert_eq!(CriticalTier::classify(10.0, 45.0), Some(CriticalTier::Mega));
        assert_eq!(CriticalTier::classify(10.0, 13.0), Some(CriticalTier::Minor));
        assert_eq!(CriticalTier::classify(10.0, 12.5), None);
        assert_eq!(CriticalTier::classify(0.0, 0.0), None);

        let crit = EventKind::CriticalHit {
            attacker: Side::Player,
            base_attack: 10.0,
            attack: 50.0,
        };
        assert_eq!(
            narrator(Some(Side::Player)).render(&crit),
            "You execute a MEGA power move!!!"
        );
        assert_eq!(
            narrator(Some(Side::Monster)).render(&crit),
            "Hero executes a MEGA power move!!!"
        );
    }

    #[test]
    fn death_is_silent_and_messages_verbatim() {
        let n = narrator(None);
        assert_eq!(n.render(&EventKind::Death { victim: Side::Player }), "");
        assert_eq!(
            n.render(&EventKind::Message {
                text: "{target} stays".into()
            }),
            "{target} stays"
        );
    }
}
