//! Arena: resolve a saved battle a few rounds at a time.
//!
//! Each invocation loads the content directory, resumes the configured
//! session (or starts a new battle), fights `ARENA_ROUNDS` rounds, prints the
//! new narration and saves the session again.
//!
//! # Examples
//!
//! ```bash
//! # Start a seeded fight and resolve three rounds
//! ARENA_SESSION=duel ARENA_SEED=7 ARENA_ROUNDS=3 cargo run -p arena
//!
//! # Continue the same fight to the end, narrated neutrally
//! ARENA_SESSION=duel ARENA_ROUNDS=1000 ARENA_VIEWER=none cargo run -p arena
//! ```
mod config;
mod logging;
mod session;

use anyhow::Result;
use battle_core::Fighter;

use config::ArenaConfig;
use session::{Content, Session};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ArenaConfig::from_env();
    let _guard = logging::setup_logging(&config.log_dir(), &config.session)?;

    let content = Content::load(&config.content_dir)?;
    let mut session = Session::open(&config, &content)?;
    tracing::info!(
        "{} session '{}' ({})",
        if session.is_resumed() { "Resumed" } else { "Started" },
        config.session,
        session.path().display()
    );

    if session.battle().is_over() {
        tracing::warn!("Session '{}' is already decided", config.session);
        print_verdict(&session, &config);
        return Ok(());
    }

    let seen = session.battle().events().len();
    let fought = session.battle_mut().fight_n_rounds(config.rounds)?;
    tracing::debug!(fought, "rounds resolved");

    let battle = session.battle();
    let narrator = battle.narrator(config.viewer);
    for event in &battle.events()[seen..] {
        let line = event.decorate(&narrator);
        if !line.is_empty() {
            println!("{line}");
        }
    }

    if battle.is_over() {
        print_verdict(&session, &config);
    } else {
        println!(
            "{}: {}/{} | {}: {}/{}",
            battle.player().name(),
            battle.player().health(),
            battle.player().max_health(),
            battle.monster().name(),
            battle.monster().health(),
            battle.monster().max_health(),
        );
    }

    session.save()
}

fn print_verdict(session: &Session, config: &ArenaConfig) {
    let battle = session.battle();
    let (Ok(winner), Ok(side)) = (battle.winner(), battle.winner_side()) else {
        return;
    };
    if config.viewer == Some(side) {
        println!("You have defeated {}!", battle.fighter(side.opponent()).name());
    } else {
        println!(
            "{} wins after {} rounds.",
            winner.name(),
            battle.rounds_fought()
        );
    }
}
