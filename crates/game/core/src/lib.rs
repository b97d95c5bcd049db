//! Value types for a two-player shogi session.
//!
//! `game-core` defines the vocabulary shared by the session runtime and the
//! log archive: players and seats, pieces, plies and the engine cookies that
//! identify them, board contents, handicaps, game outcome and archived game
//! logs with their content digest. Move legality is deliberately absent; the
//! engine behind the runtime owns the rules.
pub mod board;
pub mod error;
pub mod log;
pub mod outcome;
pub mod piece;
pub mod player;
pub mod ply;

pub use board::{Board, Handicap, Piece};
pub use error::CoreError;
pub use log::{GameLog, LogDigest};
pub use outcome::{GameState, format_think_time};
pub use piece::PieceKind;
pub use player::{Participant, Participants, Player, PlayerKind, Turn};
pub use ply::{MoveCookie, Ply, Square};
