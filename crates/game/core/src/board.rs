//! Board contents and handicap setups.
//!
//! The runtime treats [`Board`] as an opaque value handed back by the engine;
//! it is only built here for the initial position and carried through
//! snapshots.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::piece::PieceKind;
use crate::player::Player;
use crate::ply::Square;

/// A piece on the board, tagged with its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub owner: Player,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

const SIZE: usize = Square::SIZE as usize;
const HAND_SLOTS: usize = PieceKind::HAND_KINDS.len();

/// Grid contents plus pieces in hand for both players.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    squares: [[Option<Piece>; SIZE]; SIZE],
    hands: [[u8; HAND_SLOTS]; 2],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[None; SIZE]; SIZE],
            hands: [[0; HAND_SLOTS]; 2],
        }
    }

    /// Standard starting position with `handicap` applied to White.
    pub fn initial(handicap: Handicap) -> Self {
        use PieceKind::*;

        let mut board = Self::empty();
        let back_rank = [Lance, Knight, Silver, Gold, King, Gold, Silver, Knight, Lance];

        for (x, kind) in back_rank.into_iter().enumerate() {
            board.squares[0][x] = Some(Piece::new(Player::White, kind));
            board.squares[8][x] = Some(Piece::new(Player::Black, kind));
        }
        for x in 0..SIZE {
            board.squares[2][x] = Some(Piece::new(Player::White, Pawn));
            board.squares[6][x] = Some(Piece::new(Player::Black, Pawn));
        }
        // Files count from the right as seen by Black: the rook sits on file 2,
        // the bishop on file 8.
        board.squares[7][1] = Some(Piece::new(Player::Black, Rook));
        board.squares[7][7] = Some(Piece::new(Player::Black, Bishop));
        board.squares[1][7] = Some(Piece::new(Player::White, Rook));
        board.squares[1][1] = Some(Piece::new(Player::White, Bishop));

        for square in handicap.removed_squares() {
            board.squares[square.y as usize][square.x as usize] = None;
        }
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.y as usize][square.x as usize]
    }

    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.y as usize][square.x as usize] = piece;
    }

    /// Number of pieces of `kind` (in base form) held by `player`.
    pub fn in_hand(&self, player: Player, kind: PieceKind) -> u8 {
        kind.hand_index()
            .map_or(0, |slot| self.hands[player.index()][slot])
    }

    pub fn set_in_hand(&mut self, player: Player, kind: PieceKind, count: u8) {
        if let Some(slot) = kind.hand_index() {
            self.hands[player.index()][slot] = count;
        }
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().flatten().count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial(Handicap::None)
    }
}

/// Handicap setups. Pieces are always removed from White (上手), who then
/// moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Handicap {
    #[default]
    None,
    Lance,
    Bishop,
    Rook,
    RookLance,
    TwoPieces,
    FourPieces,
    SixPieces,
}

impl Handicap {
    /// Label used in the `手合割` header of a KIF log.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "平手",
            Self::Lance => "香落ち",
            Self::Bishop => "角落ち",
            Self::Rook => "飛車落ち",
            Self::RookLance => "飛香落ち",
            Self::TwoPieces => "二枚落ち",
            Self::FourPieces => "四枚落ち",
            Self::SixPieces => "六枚落ち",
        }
    }

    pub const fn first_mover(self) -> Player {
        match self {
            Self::None => Player::Black,
            _ => Player::White,
        }
    }

    fn removed_squares(self) -> Vec<Square> {
        // White's back rank is row 0; file 1 (x = 0) is White's left lance.
        let at = |x: u8, y: u8| Square { x, y };
        let lance = at(0, 0);
        let bishop = at(1, 1);
        let rook = at(7, 1);
        let lances = [at(0, 0), at(8, 0)];
        let knights = [at(1, 0), at(7, 0)];

        match self {
            Self::None => Vec::new(),
            Self::Lance => vec![lance],
            Self::Bishop => vec![bishop],
            Self::Rook => vec![rook],
            Self::RookLance => vec![rook, lance],
            Self::TwoPieces => vec![rook, bishop],
            Self::FourPieces => [vec![rook, bishop], lances.to_vec()].concat(),
            Self::SixPieces => [vec![rook, bishop], lances.to_vec(), knights.to_vec()].concat(),
        }
    }
}

impl fmt::Display for Handicap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Handicap {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use strum::IntoEnumIterator;

        let trimmed = s.trim();
        Self::iter()
            .find(|h| h.label() == trimmed)
            .or(match trimmed {
                "" | "none" => Some(Self::None),
                "lance" => Some(Self::Lance),
                "bishop" => Some(Self::Bishop),
                "rook" => Some(Self::Rook),
                "rook_lance" => Some(Self::RookLance),
                "two" => Some(Self::TwoPieces),
                "four" => Some(Self::FourPieces),
                "six" => Some(Self::SixPieces),
                _ => None,
            })
            .ok_or_else(|| CoreError::UnknownHandicap(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_game_has_forty_pieces() {
        let board = Board::default();
        assert_eq!(board.piece_count(), 40);
        let king = board.piece_at(Square::new(4, 8).unwrap()).unwrap();
        assert_eq!(king, Piece::new(Player::Black, PieceKind::King));
    }

    #[test]
    fn handicaps_remove_white_pieces() {
        assert_eq!(Board::initial(Handicap::Bishop).piece_count(), 39);
        assert_eq!(Board::initial(Handicap::TwoPieces).piece_count(), 38);
        assert_eq!(Board::initial(Handicap::SixPieces).piece_count(), 34);
        assert!(
            Board::initial(Handicap::Rook)
                .piece_at(Square::new(7, 1).unwrap())
                .is_none()
        );
    }

    #[test]
    fn handicap_labels_parse_back() {
        assert_eq!("角落ち".parse::<Handicap>().unwrap(), Handicap::Bishop);
        assert_eq!("four".parse::<Handicap>().unwrap(), Handicap::FourPieces);
        assert!("odd".parse::<Handicap>().is_err());
        assert_eq!(Handicap::Lance.first_mover(), Player::White);
    }

    #[test]
    fn hand_counts_use_base_kind() {
        let mut board = Board::empty();
        board.set_in_hand(Player::Black, PieceKind::Horse, 1);
        assert_eq!(board.in_hand(Player::Black, PieceKind::Bishop), 1);
        assert_eq!(board.in_hand(Player::White, PieceKind::Bishop), 0);
        assert_eq!(board.in_hand(Player::Black, PieceKind::King), 0);
    }
}
