//! Turn/session state machine.
//!
//! [`SessionController`] is the only writer of a [`GameSession`]. Requests
//! from the UI either go to the engine gateway or come back as a
//! [`RequestOutcome::Declined`]; nothing here blocks. Engine results are
//! applied by [`SessionController::on_engine_result`], one per request, in
//! issue order.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use game_core::{Board, GameLog, GameState, Player, Ply, Turn, format_think_time};

use super::clock::Clock;
use super::snapshot::SessionSnapshotCodec;
use super::state::GameSession;
use crate::api::{EngineGateway, EngineResult, ProtocolViolation, SessionError};
use crate::workers::PersistenceHandle;

/// Why a request was not forwarded. The session is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    GameOver,
    /// An engine result or a promotion decision is still outstanding.
    RequestOutstanding,
    NotYourTurn,
    NotHuman,
    NotEnoughHistory,
    MissingCookie,
    NoUndosRemaining,
    NoPendingPromotion,
    EngineUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The request was handed to the engine.
    Forwarded,
    /// The move may promote; call `resolve_promotion` or `cancel_promotion`.
    PromotionDecisionNeeded,
    Declined(DeclineReason),
}

/// What the UI needs after an engine result was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub board: Board,
    pub turn: Turn,
    pub state: GameState,
    pub last_ply: Option<Ply>,
    pub think_times_ms: [u64; 2],
    pub undos_remaining: u32,
    pub error_message: Option<String>,
}

pub struct SessionController {
    session: GameSession,
    gateway: Box<dyn EngineGateway>,
    clock: Arc<dyn Clock>,
    persistence: Option<PersistenceHandle>,
    pending_promotion: Option<(Player, Ply)>,
    awaiting_result: bool,
    did_human_move: bool,
}

impl SessionController {
    pub fn new(
        session: GameSession,
        gateway: Box<dyn EngineGateway>,
        clock: Arc<dyn Clock>,
        persistence: Option<PersistenceHandle>,
    ) -> Self {
        Self {
            session,
            gateway,
            clock,
            persistence,
            pending_promotion: None,
            awaiting_result: false,
            did_human_move: false,
        }
    }

    /// Mark the session as restored from a snapshot. Snapshots are only
    /// written after a human move, so quitting a resumed game archives it.
    pub fn resumed(mut self) -> Self {
        self.did_human_move = true;
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn pending_promotion(&self) -> Option<(Player, Ply)> {
        self.pending_promotion
    }

    pub fn is_awaiting_result(&self) -> bool {
        self.awaiting_result
    }

    /// Reset the engine to the current position and start the turn holder's
    /// clock. A computer to move is asked for its move right away.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.gateway.reset(&self.session.board, self.session.turn)?;
        self.pending_promotion = None;
        self.awaiting_result = false;

        let turn = self.session.turn;
        self.set_turn(turn);
        info!(
            target: "runtime::session",
            %turn,
            plies = self.session.history.len(),
            "Session started"
        );

        if self.session.participants.is_computer(turn) && !self.session.state.is_terminal() {
            self.request_computer_move()?;
        }
        Ok(())
    }

    pub fn request_human_move(&mut self, player: Player, ply: Ply) -> RequestOutcome {
        if let Err(reason) = self.check_human_turn(player) {
            return RequestOutcome::Declined(reason);
        }

        if !ply.promotes && ply.allows_promotion(player) {
            self.pending_promotion = Some((player, ply));
            self.set_turn(Turn::None);
            debug!(target: "runtime::session", %player, %ply, "Waiting for promotion decision");
            return RequestOutcome::PromotionDecisionNeeded;
        }

        self.forward_human_move(player, ply)
    }

    /// Complete a suspended move. Without a pending decision this is a no-op.
    pub fn resolve_promotion(&mut self, promote: bool) -> RequestOutcome {
        let Some((player, ply)) = self.pending_promotion.take() else {
            return RequestOutcome::Declined(DeclineReason::NoPendingPromotion);
        };
        let ply = if promote { ply.with_promotion() } else { ply };

        match self.gateway.submit_human_move(player, ply) {
            Ok(()) => {
                self.awaiting_result = true;
                RequestOutcome::Forwarded
            }
            Err(e) => {
                warn!(target: "runtime::session", error = %e, "Engine unavailable");
                self.pending_promotion = Some((player, ply));
                RequestOutcome::Declined(DeclineReason::EngineUnavailable)
            }
        }
    }

    /// Abandon a suspended move and hand the turn back to its player.
    pub fn cancel_promotion(&mut self) -> bool {
        let Some((player, _)) = self.pending_promotion.take() else {
            return false;
        };
        self.set_turn(Turn::from(player));
        true
    }

    pub fn request_undo(&mut self) -> RequestOutcome {
        let player = match self.session.turn.player() {
            Some(player) => player,
            None if self.session.state.is_terminal() => {
                return RequestOutcome::Declined(DeclineReason::GameOver);
            }
            None => return RequestOutcome::Declined(DeclineReason::RequestOutstanding),
        };
        if let Err(reason) = self.check_human_turn(player) {
            return RequestOutcome::Declined(reason);
        }

        let history = &self.session.history;
        let [.., previous, last] = history.as_slice() else {
            return RequestOutcome::Declined(DeclineReason::NotEnoughHistory);
        };
        let (Some(last_cookie), Some(previous_cookie)) = (last.cookie, previous.cookie) else {
            return RequestOutcome::Declined(DeclineReason::MissingCookie);
        };
        if self.session.undos_remaining == 0 {
            return RequestOutcome::Declined(DeclineReason::NoUndosRemaining);
        }

        if let Err(e) = self
            .gateway
            .request_double_undo(player, last_cookie, previous_cookie)
        {
            warn!(target: "runtime::session", error = %e, "Engine unavailable");
            return RequestOutcome::Declined(DeclineReason::EngineUnavailable);
        }

        // Charged on issue, so a rejected undo still costs one.
        self.session.undos_remaining -= 1;
        self.awaiting_result = true;
        self.set_turn(Turn::None);
        debug!(
            target: "runtime::session",
            %player,
            undos_remaining = self.session.undos_remaining,
            "Undo requested"
        );
        RequestOutcome::Forwarded
    }

    /// Apply the result of the outstanding request.
    ///
    /// A result that contradicts the history is never applied: the session
    /// moves to [`GameState::FatalError`] with history and board untouched,
    /// and the violation is returned.
    pub fn on_engine_result(&mut self, result: EngineResult) -> Result<SessionUpdate, SessionError> {
        if let Err(violation) = self.validate(&result) {
            return Err(self.fail(violation));
        }
        self.awaiting_result = false;

        let history_len = self.session.history.len();
        match result.appended {
            Some(entry) => self.session.history.push(entry),
            None => self
                .session
                .history
                .truncate(history_len - result.rollback as usize),
        }

        let acting = result.acting_player;
        if result.appended.is_some() && self.session.participants.get(acting).is_human() {
            self.did_human_move = true;
        }

        self.session.board = result.board;
        self.session.state = result.state;
        self.set_turn(result.next_turn);

        let mut error_message = result.error_message;
        if let Some(message) = &error_message {
            info!(target: "runtime::session", %message, "Engine reported an error");
        }

        if self.session.state.is_terminal() {
            info!(
                target: "runtime::session",
                state = %self.session.state,
                plies = self.session.history.len(),
                "Game over"
            );
            self.finish();
        } else {
            if self.session.participants.get(acting).is_human() {
                self.save_snapshot();
            }
            if self.session.participants.is_computer(self.session.turn) {
                if let Err(e) = self.request_computer_move() {
                    error!(target: "runtime::session", error = %e, "Failed to request computer move");
                    if error_message.is_none() {
                        error_message = Some(e.to_string());
                    }
                }
            }
        }

        Ok(SessionUpdate {
            board: self.session.board.clone(),
            turn: self.session.turn,
            state: self.session.state,
            last_ply: self.session.last_ply(),
            think_times_ms: self.think_times(),
            undos_remaining: self.session.undos_remaining,
            error_message,
        })
    }

    /// Think time per player (Black, White) including the running clock.
    pub fn think_times(&self) -> [u64; 2] {
        self.session.clocks.live_totals(self.clock.now_ms())
    }

    /// Think times formatted as `m:ss`.
    pub fn think_time_labels(&self) -> [String; 2] {
        self.think_times().map(format_think_time)
    }

    pub fn game_log(&self) -> GameLog {
        self.session.to_game_log()
    }

    /// Leave the session: archive the game if a human took part and drop
    /// the crash-recovery snapshot.
    pub fn quit(&mut self) -> Option<GameLog> {
        self.session.clocks.stop(self.clock.now_ms());
        let archived = self.maybe_archive();
        if let Some(persistence) = &self.persistence {
            persistence.delete_snapshot();
        }
        info!(target: "runtime::session", archived = archived.is_some(), "Session closed");
        archived
    }

    fn check_human_turn(&self, player: Player) -> Result<(), DeclineReason> {
        if self.session.state.is_terminal() {
            return Err(DeclineReason::GameOver);
        }
        if self.awaiting_result || self.pending_promotion.is_some() {
            return Err(DeclineReason::RequestOutstanding);
        }
        if !self.session.turn.is(player) {
            return Err(DeclineReason::NotYourTurn);
        }
        if !self.session.participants.get(player).is_human() {
            return Err(DeclineReason::NotHuman);
        }
        Ok(())
    }

    fn forward_human_move(&mut self, player: Player, ply: Ply) -> RequestOutcome {
        if let Err(e) = self.gateway.submit_human_move(player, ply) {
            warn!(target: "runtime::session", error = %e, "Engine unavailable");
            return RequestOutcome::Declined(DeclineReason::EngineUnavailable);
        }
        self.awaiting_result = true;
        self.set_turn(Turn::None);
        debug!(target: "runtime::session", %player, %ply, "Move forwarded");
        RequestOutcome::Forwarded
    }

    fn request_computer_move(&mut self) -> Result<(), SessionError> {
        let Some(player) = self.session.turn.player() else {
            return Ok(());
        };
        self.gateway.request_move(player)?;
        self.awaiting_result = true;
        debug!(target: "runtime::session", %player, "Computer move requested");
        Ok(())
    }

    /// Point the turn at `turn`, committing the running clock and starting
    /// the new holder's. No clock runs once the game is over.
    fn set_turn(&mut self, turn: Turn) {
        let now = self.clock.now_ms();
        self.session.turn = turn;
        if self.session.state.is_terminal() {
            self.session.clocks.stop(now);
        } else {
            self.session.clocks.switch_to(turn, now);
        }
    }

    fn validate(&self, result: &EngineResult) -> Result<(), ProtocolViolation> {
        if !self.awaiting_result {
            return Err(ProtocolViolation::UnexpectedResult);
        }
        if result.appended.is_some() && result.rollback > 0 {
            return Err(ProtocolViolation::AppendWithRollback {
                rollback: result.rollback,
            });
        }
        let history_len = self.session.history.len();
        if result.rollback as usize > history_len {
            return Err(ProtocolViolation::RollbackExceedsHistory {
                rollback: result.rollback,
                history_len,
            });
        }
        Ok(())
    }

    fn fail(&mut self, violation: ProtocolViolation) -> SessionError {
        error!(target: "runtime::session", %violation, "Engine protocol violation");
        self.awaiting_result = false;
        self.pending_promotion = None;
        self.session.state = GameState::FatalError;
        self.set_turn(Turn::None);
        SessionError::ProtocolViolation(violation)
    }

    fn finish(&mut self) {
        self.pending_promotion = None;
        if let Some(persistence) = &self.persistence {
            persistence.delete_snapshot();
        }
        self.maybe_archive();
    }

    fn maybe_archive(&self) -> Option<GameLog> {
        if !self.did_human_move || self.session.history.is_empty() {
            return None;
        }
        let log = self.game_log();
        if let Some(persistence) = &self.persistence {
            persistence.archive_log(log.clone(), true);
        }
        Some(log)
    }

    fn save_snapshot(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        match SessionSnapshotCodec::encode(&self.session) {
            Ok(bytes) => persistence.save_snapshot(bytes),
            Err(e) => warn!(target: "runtime::session", error = %e, "Failed to encode snapshot"),
        }
    }
}
