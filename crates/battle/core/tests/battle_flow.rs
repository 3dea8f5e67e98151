use battle_core::{
    Activation, Battle, BattleConfig, BattleError, BattleEvent, Buff, BuffEffects, Combatant,
    CombatError, EntropySource, ErrorClass, EventKind, Fighter, FixedSource, Pairing, PcgSource,
    Rounds, Side,
};

fn hero() -> Combatant {
    Combatant::new("Hero", 5, 80, 14.0, 9.0)
}

fn troll() -> Combatant {
    Combatant::new("Troll", 4, 60, 11.0, 7.0)
}

fn no_crits() -> BattleConfig {
    BattleConfig::new().with_critical_hit_chance(0.0)
}

fn messages(events: &[BattleEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e.kind() {
            EventKind::Message { text } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn battles_terminate_with_entropy() {
    for _ in 0..20 {
        let mut battle = Battle::new(hero(), troll(), EntropySource::new()).unwrap();
        battle.fight_n_rounds(10_000).unwrap();
        assert!(battle.is_over());
    }
}

#[test]
fn battles_terminate_with_seeded_source() {
    for seed in 0..50 {
        let mut battle = Battle::new(hero(), troll(), PcgSource::new(seed)).unwrap();
        let fought = battle.fight_n_rounds(10_000).unwrap();
        assert!(battle.is_over(), "seed {seed} did not finish");
        assert_eq!(fought, battle.rounds_fought());
    }
}

#[test]
fn exactly_one_winner_and_loser() {
    for seed in 0..50 {
        let mut battle = Battle::new(hero(), troll(), PcgSource::new(seed)).unwrap();
        battle.fight_n_rounds(10_000).unwrap();

        let winner = battle.winner_side().unwrap();
        let loser = battle.loser_side().unwrap();
        assert_ne!(winner, loser);
        assert!(!battle.fighter(loser).is_alive());
        assert_eq!(battle.winner().unwrap().name(), battle.fighter(winner).name());

        // Death events close the log, one per fallen fighter.
        let deaths: Vec<Side> = battle
            .events()
            .iter()
            .filter_map(|e| match e.kind() {
                EventKind::Death { victim } => Some(*victim),
                _ => None,
            })
            .collect();
        assert!(deaths.contains(&loser));
        assert!(matches!(
            battle.events().last().map(BattleEvent::kind),
            Some(EventKind::Death { .. })
        ));
    }
}

#[test]
fn main_exchange_never_heals() {
    for seed in 0..20 {
        let mut battle = Battle::new(hero(), troll(), PcgSource::new(seed)).unwrap();
        battle.fight_n_rounds(10_000).unwrap();

        // Replay the log against fresh fighters.
        let mut replay = Pairing::new(hero(), troll());
        for event in battle.events() {
            let before = (replay.player.health(), replay.monster.health());
            BattleEvent::new(event.kind().clone())
                .apply(&mut replay)
                .unwrap();
            assert!(replay.player.health() <= before.0);
            assert!(replay.monster.health() <= before.1);
        }
        assert_eq!(replay.player.health(), battle.player().health());
        assert_eq!(replay.monster.health(), battle.monster().health());
    }
}

#[test]
fn every_recorded_event_is_applied_once() {
    let mut battle = Battle::new(hero(), troll(), PcgSource::new(5)).unwrap();
    battle.fight_n_rounds(3).unwrap();
    assert!(battle.events().iter().all(BattleEvent::is_applied));

    let mut pairing = Pairing::new(hero(), troll());
    let mut event = battle.events()[0].clone();
    let err = event.apply(&mut pairing).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Misuse);
    assert_eq!(err.error_code(), "EVENT_ALREADY_APPLIED");
    assert_eq!(pairing, Pairing::new(hero(), troll()));
}

#[test]
fn double_knockout_goes_to_the_first_to_fall() {
    let thorns = Buff::builder("thorns")
        .activation(Activation::ANY)
        .owner(BuffEffects::NEUTRAL.with_reflection(1.0))
        .effect_message("Thorns prick {target} for {amount}.")
        .build()
        .unwrap();
    let player = Combatant::new("Hero", 1, 5, 100.0, 0.0);
    let monster = Combatant::new("Bramble", 1, 5, 0.0, 0.0)
        .with_buff(thorns)
        .unwrap();
    let mut battle =
        Battle::with_config(player, monster, FixedSource::new(vec![0.5]), no_crits()).unwrap();
    battle.fight_n_rounds(1).unwrap();

    assert!(!battle.player().is_alive());
    assert!(!battle.monster().is_alive());
    assert_eq!(battle.loser_side(), Ok(Side::Monster));
    assert_eq!(battle.winner_side(), Ok(Side::Player));

    let tail: Vec<&EventKind> = battle.events().iter().rev().take(2).map(|e| e.kind()).collect();
    assert_eq!(
        tail,
        [
            &EventKind::Death {
                victim: Side::Monster
            },
            &EventKind::Death {
                victim: Side::Player
            },
        ]
    );
}

#[test]
fn round_start_drain_ends_the_fight_before_the_victim_regenerates() {
    let hex = Buff::builder("hex")
        .activation(Activation::ROUND_START)
        .opponent(BuffEffects::NEUTRAL.with_regeneration(-1000))
        .build()
        .unwrap();
    let troll_blood = Buff::builder("troll-blood")
        .activation(Activation::ROUND_START)
        .owner(BuffEffects::NEUTRAL.with_regeneration(1000))
        .build()
        .unwrap();
    let player = Combatant::new("Hero", 1, 30, 1.0, 0.0).with_buff(hex).unwrap();
    let monster = Combatant::new("Ogre", 1, 100, 200.0, 0.0)
        .with_buff(troll_blood)
        .unwrap();
    let mut battle =
        Battle::with_config(player, monster, FixedSource::new(vec![0.5]), no_crits()).unwrap();
    assert_eq!(battle.fight_n_rounds(5), Ok(1));

    assert_eq!(battle.winner_side(), Ok(Side::Player));
    assert!(battle.winner().unwrap().is_alive());
    assert_eq!(battle.player().health(), 30);
    assert_eq!(battle.monster().health(), 0);
    let kinds: Vec<&EventKind> = battle.events().iter().map(BattleEvent::kind).collect();
    assert!(matches!(
        kinds[..],
        [
            EventKind::Regeneration {
                target: Side::Monster,
                amount: -100,
                ..
            },
            EventKind::Death {
                victim: Side::Monster
            },
        ]
    ));
}

#[test]
fn fighter_healed_from_zero_is_not_the_loser() {
    // Every hit is reflected onto the hero in full, and the lifetap
    // brings the hero back from zero.
    let leech = Buff::builder("leech")
        .activation(Activation::ANY)
        .owner(BuffEffects::NEUTRAL.with_lifetap(1.0))
        .effect_message("{target} drinks {amount}.")
        .build()
        .unwrap();
    let thorns = Buff::builder("thorns")
        .activation(Activation::ANY)
        .owner(BuffEffects::NEUTRAL.with_reflection(1.0))
        .effect_message("Thorns prick {target} for {amount}.")
        .build()
        .unwrap();
    let player = Combatant::new("Hero", 1, 5, 100.0, 0.0).with_buff(leech).unwrap();
    let monster = Combatant::new("Bramble", 1, 100, 0.0, 0.0)
        .with_buff(thorns)
        .unwrap();
    let mut battle =
        Battle::with_config(player, monster, FixedSource::new(vec![0.5]), no_crits()).unwrap();
    battle.fight_n_rounds(100).unwrap();

    assert!(battle.is_over());
    assert_eq!(battle.player().health(), 5);
    assert_eq!(battle.monster().health(), 0);
    assert_eq!(battle.loser_side(), Ok(Side::Monster));
    assert!(battle.winner().unwrap().is_alive());
    assert_eq!(
        battle.events().last().map(BattleEvent::kind),
        Some(&EventKind::Death {
            victim: Side::Monster
        })
    );
}

#[test]
fn round_end_drain_skips_expiry_when_it_kills() {
    let curse = Buff::builder("curse")
        .activation(Activation::ROUND_END)
        .rounds(1)
        .start_message("A curse settles.")
        .end_message("The curse lifts.")
        .opponent(BuffEffects::NEUTRAL.with_regeneration(-1000))
        .build()
        .unwrap();
    let player = Combatant::new("Hero", 1, 50, 10.0, 0.0).with_buff(curse).unwrap();
    let monster = Combatant::new("Ogre", 1, 200, 0.0, 0.0);
    let mut battle =
        Battle::with_config(player, monster, FixedSource::new(vec![0.5]), no_crits()).unwrap();
    assert_eq!(battle.fight_n_rounds(5), Ok(1));

    assert_eq!(battle.winner_side(), Ok(Side::Player));
    assert_eq!(messages(battle.events()), ["A curse settles."]);
    assert_eq!(
        battle.player().buffs().get("curse").map(Buff::rounds),
        Some(Rounds::Finite(1))
    );

    let tail: Vec<&EventKind> = battle.events().iter().rev().take(2).map(|e| e.kind()).collect();
    assert!(matches!(
        tail[..],
        [
            EventKind::Death {
                victim: Side::Monster
            },
            EventKind::Regeneration {
                target: Side::Monster,
                ..
            },
        ]
    ));
}

#[test]
fn buffed_critical_hit_narrates_as_a_stronger_move() {
    let fury = Buff::builder("fury")
        .activation(Activation::ANY)
        .owner(BuffEffects::NEUTRAL.with_attack(2.0))
        .build()
        .unwrap();
    let player = Combatant::new("Hero", 1, 50, 10.0, 0.0).with_buff(fury).unwrap();
    let monster = Combatant::new("Ogre", 1, 1000, 0.0, 0.0);
    let config = BattleConfig::new().with_critical_hit_chance(1.0);
    let mut battle =
        Battle::with_config(player, monster, FixedSource::new(vec![0.5]), config).unwrap();
    battle.fight_n_rounds(1).unwrap();

    let lines = battle.narrate(Some(Side::Player));
    assert_eq!(lines[0], "You execute a MEGA power move!!!");
}

#[test]
fn three_round_buff_narrates_in_order() {
    let blessing = Buff::builder("blessing")
        .activation(Activation::ROUND_START)
        .rounds(3)
        .start_message("A light surrounds you.")
        .round_message("The light flickers.")
        .end_message("The light fades.")
        .build()
        .unwrap();
    let player = Combatant::new("Hero", 1, 10_000, 5.0, 5.0)
        .with_buff(blessing)
        .unwrap();
    let monster = Combatant::new("Golem", 1, 10_000, 5.0, 5.0);
    let mut battle = Battle::new(player, monster, PcgSource::new(21)).unwrap();
    assert_eq!(battle.fight_n_rounds(5), Ok(5));

    assert_eq!(
        messages(battle.events()),
        [
            "A light surrounds you.",
            "The light flickers.",
            "The light flickers.",
            "The light fades.",
        ]
    );
    assert!(!battle.player().buffs().has_slot("blessing"));
}

#[test]
fn invulnerable_fighter_keeps_full_health() {
    let aegis = Buff::builder("aegis")
        .activation(Activation::ANY)
        .infinite()
        .owner(BuffEffects::NEUTRAL.with_invulnerable(true))
        .build()
        .unwrap();
    for seed in 0..10 {
        let player = hero().with_buff(aegis.clone()).unwrap();
        let mut battle = Battle::new(player, troll(), PcgSource::new(seed)).unwrap();
        battle.fight_n_rounds(10_000).unwrap();

        assert_eq!(battle.player().health(), battle.player().max_health());
        assert_eq!(battle.winner_side(), Ok(Side::Player));
    }
}

#[test]
fn opponent_invulnerability_shields_the_other_side() {
    let truce = Buff::builder("truce")
        .activation(Activation::ANY)
        .infinite()
        .opponent(BuffEffects::NEUTRAL.with_invulnerable(true))
        .build()
        .unwrap();
    let monster = troll().with_buff(truce).unwrap();
    let mut battle = Battle::new(hero(), monster, PcgSource::new(4)).unwrap();
    battle.fight_n_rounds(10_000).unwrap();
    assert_eq!(battle.player().health(), battle.player().max_health());
}

#[test]
fn disabled_crits_never_appear() {
    for seed in 0..20 {
        let mut battle = Battle::new(hero(), troll(), PcgSource::new(seed)).unwrap();
        battle.disable_critical_hit();
        battle.fight_n_rounds(10_000).unwrap();
        assert!(
            !battle
                .events()
                .iter()
                .any(|e| matches!(e.kind(), EventKind::CriticalHit { .. }))
        );
    }
}

#[test]
fn lifecycle_errors() {
    let err = Battle::new(hero().with_health(0), troll(), PcgSource::new(1))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        BattleError::FighterNotAlive {
            side: Side::Player,
            ..
        }
    ));
    assert_eq!(err.class(), ErrorClass::Construction);

    let mut battle = Battle::new(hero(), troll(), PcgSource::new(2)).unwrap();
    let err = battle.winner().err().unwrap();
    assert_eq!(err.error_code(), "BATTLE_NOT_OVER");

    battle.fight_n_rounds(10_000).unwrap();
    let err = battle.fight_n_rounds(1).unwrap_err();
    assert_eq!(err, BattleError::BattleIsOver);
    assert!(err.class().is_misuse());
}

#[test]
fn narration_addresses_the_viewer() {
    let mut battle =
        Battle::with_config(hero(), troll(), PcgSource::new(9), no_crits()).unwrap();
    battle.fight_n_rounds(1).unwrap();

    let player_view = battle.narrate(Some(Side::Player));
    let neutral_view = battle.narrate(None);
    assert_eq!(player_view.len(), 2);
    assert!(player_view[0].starts_with("You "));
    assert!(player_view[1].starts_with("Troll "));
    assert!(neutral_view.iter().all(|line| !line.contains("you")));

    // Rendering is pure.
    assert_eq!(battle.narrate(Some(Side::Player)), player_view);
}
