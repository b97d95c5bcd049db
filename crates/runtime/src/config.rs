//! Runtime configuration and its environment loader.
use std::env;
use std::path::PathBuf;

use directories::{ProjectDirs, UserDirs};

use game_core::{Handicap, Participant, Participants};

use crate::archive::ArchiveConfig;
use crate::formats::LineEnding;

const INDEX_FILE: &str = "log_summary.json";

/// Settings for one session and the log archive.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Two-letter seat code, Black first: `H` human, `C` computer.
    pub player_types: String,
    pub human_player_name: String,
    pub computer_level: u8,
    /// Undo budget of a new game.
    pub max_undos: u32,
    pub handicap: Handicap,
    /// Archive root: exported logs and the trash live here.
    pub game_log_dir: PathBuf,
    /// Downloads directory scanned for logs, if the platform has one.
    pub download_dir: Option<PathBuf>,
    /// Snapshot blob and log index.
    pub save_data_dir: PathBuf,
    pub log_save_format: LineEnding,
    pub engine_command_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("", "", "shogi")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("shogi-data"));

        Self {
            player_types: "HC".to_string(),
            human_player_name: "You".to_string(),
            computer_level: 1,
            max_undos: 0,
            handicap: Handicap::None,
            game_log_dir: data_dir.join("game_logs"),
            download_dir: UserDirs::new().and_then(|dirs| dirs.download_dir().map(PathBuf::from)),
            save_data_dir: data_dir,
            log_save_format: LineEnding::Dos,
            engine_command_buffer: 8,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PLAYER_TYPES` - Seat code, `HC`/`CH`/`HH`/`CC` (default: HC)
    /// - `HUMAN_PLAYER_NAME` - Display name of human players (default: You)
    /// - `COMPUTER_LEVEL` - Engine strength (default: 1)
    /// - `MAX_UNDOS` - Undo budget per game (default: 0)
    /// - `HANDICAP` - Handicap label or name such as `bishop` (default: none)
    /// - `GAME_LOG_DIR` - Archive root (default: platform data dir)
    /// - `DOWNLOAD_DIR` - Extra scan directory (default: platform downloads)
    /// - `SAVE_DATA_DIR` - Snapshot and index directory (default: platform data dir)
    /// - `LOG_SAVE_FORMAT` - `kif_dos` or `kif_unix` (default: kif_dos)
    /// - `ENGINE_COMMAND_BUFFER` - Engine command queue size (default: 8)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(code) = env::var("PLAYER_TYPES") {
            config.player_types = code.trim().to_ascii_uppercase();
        }
        if let Ok(name) = env::var("HUMAN_PLAYER_NAME") {
            let name = name.trim();
            if !name.is_empty() {
                config.human_player_name = name.to_string();
            }
        }
        if let Some(level) = read_env::<u8>("COMPUTER_LEVEL") {
            config.computer_level = level;
        }
        if let Some(max_undos) = read_env::<u32>("MAX_UNDOS") {
            config.max_undos = max_undos;
        }
        if let Some(handicap) = read_env::<Handicap>("HANDICAP") {
            config.handicap = handicap;
        }
        if let Ok(dir) = env::var("GAME_LOG_DIR") {
            config.game_log_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("DOWNLOAD_DIR") {
            config.download_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }
        if let Ok(dir) = env::var("SAVE_DATA_DIR") {
            config.save_data_dir = PathBuf::from(dir);
        }
        if let Some(format) = read_env::<LineEnding>("LOG_SAVE_FORMAT") {
            config.log_save_format = format;
        }
        if let Some(capacity) = read_env::<usize>("ENGINE_COMMAND_BUFFER") {
            config.engine_command_buffer = capacity.max(1);
        }

        config
    }

    pub fn computer_player_name(&self) -> String {
        format!("Computer (level {})", self.computer_level)
    }

    /// Seats from `player_types`; an unknown code falls back to `HC`.
    pub fn participants(&self) -> Participants {
        let computer = self.computer_player_name();
        Participants::from_code(&self.player_types, &self.human_player_name, &computer)
            .unwrap_or_else(|| {
                tracing::warn!(
                    code = %self.player_types,
                    "Unknown PLAYER_TYPES, falling back to HC"
                );
                Participants::new(
                    Participant::human(self.human_player_name.clone()),
                    Participant::computer(computer.clone()),
                )
            })
    }

    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig {
            archive_root: self.game_log_dir.clone(),
            download_dir: self.download_dir.clone(),
            index_path: self.save_data_dir.join(INDEX_FILE),
        }
    }
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
    use game_core::Player;

    #[test]
    fn default_seats_are_human_against_computer() {
        let config = RuntimeConfig {
            human_player_name: "Alice".into(),
            computer_level: 3,
            ..RuntimeConfig::default()
        };
        let seats = config.participants();
        assert!(seats.get(Player::Black).is_human());
        assert_eq!(seats.get(Player::Black).name, "Alice");
        assert_eq!(seats.get(Player::White).name, "Computer (level 3)");
    }

    #[test]
    fn bad_seat_code_falls_back() {
        let config = RuntimeConfig {
            player_types: "XY".into(),
            ..RuntimeConfig::default()
        };
        assert!(config.participants().get(Player::Black).is_human());
        assert!(!config.participants().get(Player::White).is_human());
    }

    #[test]
    fn index_lives_in_save_data_dir() {
        let config = RuntimeConfig {
            save_data_dir: PathBuf::from("/data"),
            game_log_dir: PathBuf::from("/logs"),
            download_dir: None,
            ..RuntimeConfig::default()
        };
        let archive = config.archive_config();
        assert_eq!(archive.index_path, PathBuf::from("/data/log_summary.json"));
        assert_eq!(archive.scan_roots(), vec![PathBuf::from("/logs")]);
    }
}
