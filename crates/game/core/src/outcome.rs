use std::fmt;

use crate::player::Player;

/// Lifecycle of a game. `Active` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    #[default]
    Active,
    BlackWon,
    WhiteWon,
    Draw,
    FatalError,
}

impl GameState {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    pub const fn won_by(player: Player) -> Self {
        match player {
            Player::Black => Self::BlackWon,
            Player::White => Self::WhiteWon,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::BlackWon => "black won",
            Self::WhiteWon => "white won",
            Self::Draw => "draw",
            Self::FatalError => "fatal error",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a think-time total as `m:ss`, the way the status line shows it.
pub fn format_think_time(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_is_live() {
        assert!(!GameState::Active.is_terminal());
        assert!(GameState::Draw.is_terminal());
        assert!(GameState::FatalError.is_terminal());
        assert_eq!(GameState::won_by(Player::White), GameState::WhiteWon);
    }

    #[test]
    fn think_time_format() {
        assert_eq!(format_think_time(0), "0:00");
        assert_eq!(format_think_time(59_999), "0:59");
        assert_eq!(format_think_time(61_000), "1:01");
        assert_eq!(format_think_time(3_600_000), "60:00");
    }
}
