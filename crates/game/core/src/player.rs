use std::fmt;

/// One of the two sides of a game. Black moves first in an even game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Index usable for per-player arrays (`Black = 0`, `White = 1`).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Black => 0,
            Self::White => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holder of the next move.
///
/// [`Turn::None`] means the session is waiting on something other than a
/// player: an engine response or a pending promotion decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Black,
    White,
    #[default]
    None,
}

impl Turn {
    pub const fn player(self) -> Option<Player> {
        match self {
            Self::Black => Some(Player::Black),
            Self::White => Some(Player::White),
            Self::None => None,
        }
    }

    pub const fn is(self, player: Player) -> bool {
        matches!(
            (self, player),
            (Self::Black, Player::Black) | (Self::White, Player::White)
        )
    }
}

impl From<Player> for Turn {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Self::Black,
            Player::White => Self::White,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.player() {
            Some(player) => player.fmt(f),
            None => f.write_str("none"),
        }
    }
}

/// Who drives a side: a person at the board or the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerKind {
    Human,
    Computer,
}

/// A participant seated on one side of the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub kind: PlayerKind,
    pub name: String,
}

impl Participant {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            kind: PlayerKind::Human,
            name: name.into(),
        }
    }

    pub fn computer(name: impl Into<String>) -> Self {
        Self {
            kind: PlayerKind::Computer,
            name: name.into(),
        }
    }

    pub const fn is_human(&self) -> bool {
        matches!(self.kind, PlayerKind::Human)
    }
}

/// Both seats of a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participants {
    pub black: Participant,
    pub white: Participant,
}

impl Participants {
    pub fn new(black: Participant, white: Participant) -> Self {
        Self { black, white }
    }

    pub fn get(&self, player: Player) -> &Participant {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    pub fn kind(&self, player: Player) -> PlayerKind {
        self.get(player).kind
    }

    pub fn is_human(&self, turn: Turn) -> bool {
        turn.player()
            .is_some_and(|player| self.get(player).is_human())
    }

    pub fn is_computer(&self, turn: Turn) -> bool {
        turn.player()
            .is_some_and(|player| !self.get(player).is_human())
    }

    /// Parses a two-letter seat code such as `"HC"`: first letter is Black,
    /// second is White, `H` = human and `C` = computer.
    ///
    /// Names are supplied by the caller because they come from configuration.
    pub fn from_code(code: &str, human_name: &str, computer_name: &str) -> Option<Self> {
        let mut chars = code.chars();
        let seat = |c: char| match c.to_ascii_uppercase() {
            'H' => Some(Participant::human(human_name)),
            'C' => Some(Participant::computer(computer_name)),
            _ => None,
        };
        let black = seat(chars.next()?)?;
        let white = seat(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(black, white))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_none_is_not_a_player() {
        assert_eq!(Turn::None.player(), None);
        assert!(!Turn::None.is(Player::Black));
        assert!(Turn::from(Player::White).is(Player::White));
    }

    #[test]
    fn participants_from_code() {
        let seats = Participants::from_code("hc", "Alice", "Bonanza").unwrap();
        assert!(seats.is_human(Turn::Black));
        assert!(seats.is_computer(Turn::White));
        assert!(!seats.is_human(Turn::None));
        assert!(!seats.is_computer(Turn::None));
        assert_eq!(seats.white.name, "Bonanza");

        assert!(Participants::from_code("HX", "a", "b").is_none());
        assert!(Participants::from_code("HCH", "a", "b").is_none());
        assert!(Participants::from_code("H", "a", "b").is_none());
    }
}
