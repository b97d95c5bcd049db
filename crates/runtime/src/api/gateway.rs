//! Boundary between the session and the move/undo oracle.
//!
//! The [`Engine`] owns rules and search and is driven synchronously on a
//! worker thread. The session reaches it only through [`EngineGateway`], whose
//! requests return immediately; each request later yields exactly one
//! [`EngineResult`], in issue order.
use game_core::{Board, GameState, MoveCookie, Player, Ply, Turn};

use super::errors::GatewayError;
use crate::session::HistoryEntry;

/// Outcome of one engine request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineResult {
    pub board: Board,
    pub next_turn: Turn,
    /// Ply committed by this request together with its undo cookie.
    pub appended: Option<HistoryEntry>,
    /// Trailing history entries to discard. Never combined with `appended`.
    pub rollback: u32,
    pub state: GameState,
    /// Player whose request this result resolves.
    pub acting_player: Player,
    /// Message for the user, e.g. an illegal move. Does not end the game.
    pub error_message: Option<String>,
}

impl EngineResult {
    /// Result committing `ply` and passing the turn on.
    pub fn moved(
        board: Board,
        acting_player: Player,
        ply: Ply,
        cookie: MoveCookie,
        next_turn: Turn,
        state: GameState,
    ) -> Self {
        Self {
            board,
            next_turn,
            appended: Some(HistoryEntry::new(ply, Some(cookie))),
            rollback: 0,
            state,
            acting_player,
            error_message: None,
        }
    }

    /// Result of a successful double undo returning the turn to `acting_player`.
    pub fn undone(board: Board, acting_player: Player) -> Self {
        Self {
            board,
            next_turn: acting_player.into(),
            appended: None,
            rollback: 2,
            state: GameState::Active,
            acting_player,
            error_message: None,
        }
    }

    /// Result rejecting the request and handing the turn back unchanged.
    pub fn rejected(board: Board, acting_player: Player, message: impl Into<String>) -> Self {
        Self {
            board,
            next_turn: acting_player.into(),
            appended: None,
            rollback: 0,
            state: GameState::Active,
            acting_player,
            error_message: Some(message.into()),
        }
    }
}

/// Synchronous move/undo oracle run on the engine worker.
///
/// Calls may block for as long as a search takes.
pub trait Engine: Send + 'static {
    /// Drop any in-flight state and load `board` with `turn` to move.
    fn reset(&mut self, board: &Board, turn: Turn);

    /// Search and play a move for `player`.
    fn computer_move(&mut self, player: Player) -> EngineResult;

    /// Validate and play a move entered by `player`.
    fn human_move(&mut self, player: Player, ply: Ply) -> EngineResult;

    /// Take back the two plies identified by `last` and `previous`.
    fn double_undo(&mut self, player: Player, last: MoveCookie, previous: MoveCookie)
    -> EngineResult;
}

/// Non-blocking request side of the engine boundary.
pub trait EngineGateway: Send {
    fn reset(&mut self, board: &Board, turn: Turn) -> Result<(), GatewayError>;

    fn request_move(&mut self, player: Player) -> Result<(), GatewayError>;

    fn submit_human_move(&mut self, player: Player, ply: Ply) -> Result<(), GatewayError>;

    fn request_double_undo(
        &mut self,
        player: Player,
        last: MoveCookie,
        previous: MoveCookie,
    ) -> Result<(), GatewayError>;
}
