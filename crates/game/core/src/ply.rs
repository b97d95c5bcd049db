//! Single moves and the engine handles that identify them.

use std::fmt;

use crate::error::CoreError;
use crate::piece::PieceKind;
use crate::player::Player;

/// Board coordinate. `x` is the file index (file 1 = 0), `y` the rank index
/// (top rank = 0). Both lie in `0..9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSquare"))]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

/// Unchecked wire form of [`Square`]; deserialized squares go through
/// [`Square::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSquare {
    x: u8,
    y: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSquare> for Square {
    type Error = CoreError;

    fn try_from(raw: RawSquare) -> Result<Self, Self::Error> {
        Self::new(raw.x, raw.y)
    }
}

impl Square {
    pub const SIZE: u8 = 9;

    pub fn new(x: u8, y: u8) -> Result<Self, CoreError> {
        if x >= Self::SIZE || y >= Self::SIZE {
            return Err(CoreError::SquareOutOfRange { x, y });
        }
        Ok(Self { x, y })
    }

    /// Square from KIF file/rank numbers (both 1-based).
    pub fn from_file_rank(file: u8, rank: u8) -> Result<Self, CoreError> {
        if !(1..=Self::SIZE).contains(&file) || !(1..=Self::SIZE).contains(&rank) {
            return Err(CoreError::SquareOutOfRange { x: file, y: rank });
        }
        Ok(Self {
            x: file - 1,
            y: rank - 1,
        })
    }

    pub const fn file(self) -> u8 {
        self.x + 1
    }

    pub const fn rank(self) -> u8 {
        self.y + 1
    }

    /// Whether this square lies in `player`'s promotion zone: the three ranks
    /// nearest the opponent (rows 0..=2 for Black, rows 6..=8 for White).
    pub const fn in_promotion_zone(self, player: Player) -> bool {
        match player {
            Player::Black => self.y < 3,
            Player::White => self.y >= 6,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// One move by one player.
///
/// `piece` is the piece as it stands on `to` after the move, so a promoting
/// move carries the promoted kind together with `promotes = true`. A drop from
/// hand has no origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ply {
    pub piece: PieceKind,
    pub promotes: bool,
    pub from: Option<Square>,
    pub to: Square,
}

impl Ply {
    pub const fn board_move(piece: PieceKind, from: Square, to: Square) -> Self {
        Self {
            piece,
            promotes: false,
            from: Some(from),
            to,
        }
    }

    pub const fn drop(piece: PieceKind, to: Square) -> Self {
        Self {
            piece,
            promotes: false,
            from: None,
            to,
        }
    }

    pub const fn is_drop(&self) -> bool {
        self.from.is_none()
    }

    /// The same move with the piece replaced by its promoted form.
    pub const fn with_promotion(self) -> Self {
        Self {
            piece: self.piece.promoted(),
            promotes: true,
            ..self
        }
    }

    /// Whether the mover must be asked to choose between promoting or not.
    ///
    /// The piece must be promotable and moved on the board (drops never
    /// promote), and at least one of origin or destination must lie in the
    /// mover's promotion zone.
    pub fn allows_promotion(&self, player: Player) -> bool {
        if !self.piece.can_promote() {
            return false;
        }
        let Some(from) = self.from else {
            return false;
        };
        from.in_promotion_zone(player) || self.to.in_promotion_zone(player)
    }
}

impl fmt::Display for Ply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "{}{}-{}", self.piece, from, self.to)?,
            None => write!(f, "{}*{}", self.piece, self.to)?,
        }
        if self.promotes {
            f.write_str("+")?;
        }
        Ok(())
    }
}

/// Engine-issued handle for a committed ply, required to undo it.
///
/// Only meaningful for the engine instance that issued it; plies imported
/// from a log or restored without engine state carry no cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCookie(pub u32);

impl fmt::Display for MoveCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cookie#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(x: u8, y: u8) -> Square {
        Square::new(x, y).unwrap()
    }

    #[test]
    fn black_promotes_entering_or_leaving_top_ranks() {
        let into_zone = Ply::board_move(PieceKind::Pawn, sq(6, 3), sq(6, 2));
        assert!(into_zone.allows_promotion(Player::Black));

        let out_of_zone = Ply::board_move(PieceKind::Silver, sq(4, 2), sq(4, 3));
        assert!(out_of_zone.allows_promotion(Player::Black));

        let outside = Ply::board_move(PieceKind::Pawn, sq(6, 6), sq(6, 5));
        assert!(!outside.allows_promotion(Player::Black));
    }

    #[test]
    fn white_zone_is_mirrored() {
        let into_zone = Ply::board_move(PieceKind::Rook, sq(1, 5), sq(1, 6));
        assert!(into_zone.allows_promotion(Player::White));

        // Rows 0..=5 on both ends stay outside White's zone.
        let outside = Ply::board_move(PieceKind::Rook, sq(1, 1), sq(1, 5));
        assert!(!outside.allows_promotion(Player::White));
        // The same move is inside Black's zone.
        assert!(outside.allows_promotion(Player::Black));
    }

    #[test]
    fn drops_gold_king_and_promoted_pieces_never_ask() {
        assert!(!Ply::drop(PieceKind::Pawn, sq(0, 1)).allows_promotion(Player::Black));
        assert!(!Ply::board_move(PieceKind::Gold, sq(0, 3), sq(0, 2)).allows_promotion(Player::Black));
        assert!(!Ply::board_move(PieceKind::King, sq(0, 3), sq(0, 2)).allows_promotion(Player::Black));
        assert!(!Ply::board_move(PieceKind::Horse, sq(0, 3), sq(0, 2)).allows_promotion(Player::Black));
    }

    #[test]
    fn with_promotion_sets_flag_and_kind() {
        let ply = Ply::board_move(PieceKind::Bishop, sq(7, 7), sq(1, 1)).with_promotion();
        assert_eq!(ply.piece, PieceKind::Horse);
        assert!(ply.promotes);
    }

    #[test]
    fn square_bounds() {
        assert!(Square::new(9, 0).is_err());
        assert_eq!(Square::from_file_rank(7, 6).unwrap(), sq(6, 5));
        assert!(Square::from_file_rank(0, 1).is_err());
    }
}
