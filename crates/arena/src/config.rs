//! Arena configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

use battle_core::Side;

/// Settings for one arena invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaConfig {
    /// Directory holding `buffs.ron`, `fighters.ron` and `battle.toml`.
    pub content_dir: PathBuf,
    /// Directory for session files; platform data directory when unset.
    pub save_dir: Option<PathBuf>,
    pub session: String,
    /// Roster id of the player for new sessions.
    pub player: String,
    /// Roster id of the monster for new sessions.
    pub monster: String,
    /// Rounds to resolve in this invocation.
    pub rounds: u32,
    /// Seed for a new session's random source; random when unset.
    pub seed: Option<u64>,
    /// Narration perspective; `None` is the neutral account.
    pub viewer: Option<Side>,
    pub no_crit: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            save_dir: None,
            session: "default".to_owned(),
            player: "hero".to_owned(),
            monster: "cave-troll".to_owned(),
            rounds: 1,
            seed: None,
            viewer: Some(Side::Player),
            no_crit: false,
        }
    }
}

impl ArenaConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_CONTENT_DIR` - Content directory (default: bundled battle-content data)
    /// - `ARENA_SAVE_DIR` - Session directory (default: platform-specific)
    /// - `ARENA_SESSION` - Session name (default: "default")
    /// - `ARENA_PLAYER` - Player roster id for new sessions (default: "hero")
    /// - `ARENA_MONSTER` - Monster roster id for new sessions (default: "cave-troll")
    /// - `ARENA_ROUNDS` - Rounds per invocation (default: 1)
    /// - `ARENA_SEED` - Seed for new sessions (default: random)
    /// - `ARENA_VIEWER` - `player`, `monster` or anything else for neutral (default: player)
    /// - `ARENA_NO_CRIT` - Disable critical hits in new sessions (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("ARENA_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        config.save_dir = env::var("ARENA_SAVE_DIR").ok().map(PathBuf::from);

        if let Ok(session) = env::var("ARENA_SESSION") {
            config.session = session;
        }
        if let Ok(player) = env::var("ARENA_PLAYER") {
            config.player = player;
        }
        if let Ok(monster) = env::var("ARENA_MONSTER") {
            config.monster = monster;
        }

        if let Some(rounds) = read_env::<u32>("ARENA_ROUNDS") {
            config.rounds = rounds;
        }
        config.seed = read_env::<u64>("ARENA_SEED");

        if env::var("ARENA_VIEWER").is_ok() {
            config.viewer = read_env::<Side>("ARENA_VIEWER");
        }

        if let Some(no_crit) = read_env::<bool>("ARENA_NO_CRIT") {
            config.no_crit = no_crit;
        } else if env::var("ARENA_NO_CRIT").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.no_crit = true;
        }

        config
    }

    /// Session directory, falling back to the platform data directory.
    pub fn resolved_save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("", "", "arena")
                .map(|dirs| dirs.data_dir().join("sessions"))
                .unwrap_or_else(|| PathBuf::from("./save_data"))
        })
    }

    /// Platform cache directory for log files.
    pub fn log_dir(&self) -> PathBuf {
        directories::ProjectDirs::from("", "", "arena")
            .map(|dirs| dirs.cache_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("/tmp/arena/logs"))
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("battle")
        .join("content")
        .join("data")
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_content() {
        let config = ArenaConfig::default();
        assert!(config.content_dir.join("fighters.ron").exists());
        assert_eq!(config.rounds, 1);
        assert_eq!(config.viewer, Some(Side::Player));
        assert!(!config.no_crit);
    }

    #[test]
    fn explicit_save_dir_wins() {
        let config = ArenaConfig {
            save_dir: Some(PathBuf::from("/srv/arena")),
            ..ArenaConfig::default()
        };
        assert_eq!(config.resolved_save_dir(), PathBuf::from("/srv/arena"));
    }
}
