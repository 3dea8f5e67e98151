use std::io::Write;
use std::path::PathBuf;

use battle_content::{BuffCatalog, ConfigLoader, RosterLoader};
use battle_core::{Battle, Fighter, PcgSource};

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

#[test]
fn bundled_content_loads_and_fights() {
    let catalog = BuffCatalog::load(&data("buffs.ron")).unwrap();
    let roster = RosterLoader::load(&data("fighters.ron"), &catalog).unwrap();
    let config = ConfigLoader::load(&data("battle.toml")).unwrap();

    assert!(!roster.is_empty());
    for player in roster.ids() {
        for monster in roster.ids() {
            let mut battle = Battle::with_config(
                roster.spawn(player).unwrap(),
                roster.spawn(monster).unwrap(),
                PcgSource::new(7),
                config.clone(),
            )
            .unwrap();
            battle.fight_n_rounds(10_000).unwrap();
            assert!(battle.is_over(), "{player} vs {monster} did not finish");
        }
    }
}

#[test]
fn loads_from_temporary_files() {
    let mut buffs = tempfile::NamedTempFile::new().unwrap();
    write!(
        buffs,
        r#"(buffs: [(slot: "rage", activation: "OFFENSE", rounds: Finite(2), owner: (attack_multiplier: 2.0))])"#
    )
    .unwrap();

    let mut fighters = tempfile::NamedTempFile::new().unwrap();
    write!(
        fighters,
        r#"[(id: "orc", name: "Orc", max_health: 30, attack: 6.0, defense: 4.0, buffs: ["rage"])]"#
    )
    .unwrap();

    let catalog = BuffCatalog::load(buffs.path()).unwrap();
    let roster = RosterLoader::load(fighters.path(), &catalog).unwrap();
    let orc = roster.get("orc").unwrap();
    assert_eq!(orc.buffs().owner_attack_multiplier(), 2.0);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere.toml");
    let err = ConfigLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("nowhere.toml"));
}
