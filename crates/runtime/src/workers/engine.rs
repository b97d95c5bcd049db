//! Engine worker that owns the move/undo oracle.
//!
//! The engine keeps shared search state and handles one request at a time, so
//! the worker drains its command channel serially on a blocking thread and
//! answers each request with exactly one [`EngineResult`], in arrival order.

use tokio::sync::mpsc;
use tracing::{debug, info};

use game_core::{Board, MoveCookie, Player, Ply, Turn};

use crate::api::{Engine, EngineResult};

/// Commands that can be sent to the engine worker
#[derive(Debug)]
pub enum EngineCommand {
    /// Load a position, discarding anything in flight. Produces no result.
    Reset { board: Board, turn: Turn },
    /// Search and play a move for a computer participant.
    ComputerMove { player: Player },
    /// Play a move entered by a human participant.
    HumanMove { player: Player, ply: Ply },
    /// Take back the last two plies.
    DoubleUndo {
        player: Player,
        last: MoveCookie,
        previous: MoveCookie,
    },
}

/// Background worker that serializes engine access.
pub struct EngineWorker<E: Engine> {
    engine: E,
    command_rx: mpsc::Receiver<EngineCommand>,
    result_tx: mpsc::UnboundedSender<EngineResult>,
}

impl<E: Engine> EngineWorker<E> {
    pub fn new(
        engine: E,
        command_rx: mpsc::Receiver<EngineCommand>,
        result_tx: mpsc::UnboundedSender<EngineResult>,
    ) -> Self {
        Self {
            engine,
            command_rx,
            result_tx,
        }
    }

    /// Main worker loop. Blocks the calling thread; run it via
    /// `tokio::task::spawn_blocking`.
    pub fn run(mut self) {
        info!(target: "runtime::engine", "EngineWorker started");

        while let Some(command) = self.command_rx.blocking_recv() {
            let Some(result) = self.handle_command(command) else {
                continue;
            };
            if self.result_tx.send(result).is_err() {
                debug!(target: "runtime::engine", "Result channel closed (session dropped)");
                break;
            }
        }

        info!(target: "runtime::engine", "EngineWorker stopped");
    }

    fn handle_command(&mut self, command: EngineCommand) -> Option<EngineResult> {
        debug!(target: "runtime::engine", ?command, "Handling engine command");

        match command {
            EngineCommand::Reset { board, turn } => {
                self.engine.reset(&board, turn);
                None
            }
            EngineCommand::ComputerMove { player } => Some(self.engine.computer_move(player)),
            EngineCommand::HumanMove { player, ply } => Some(self.engine.human_move(player, ply)),
            EngineCommand::DoubleUndo {
                player,
                last,
                previous,
            } => Some(self.engine.double_undo(player, last, previous)),
        }
    }
}
