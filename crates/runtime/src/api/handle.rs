//! Channel-backed [`EngineGateway`] implementation.
//!
//! [`EngineHandle`] hides the command channel to the engine worker. Every
//! method enqueues one command and returns at once; the worker answers on the
//! result channel the session driver listens to.
use tokio::sync::mpsc;

use game_core::{Board, MoveCookie, Player, Ply, Turn};

use super::errors::GatewayError;
use super::gateway::EngineGateway;
use crate::workers::EngineCommand;

/// Client-facing handle to the engine worker.
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<EngineCommand>) -> Self {
        Self { command_tx }
    }

    fn send(&self, command: EngineCommand) -> Result<(), GatewayError> {
        self.command_tx.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => GatewayError::CommandQueueFull,
            mpsc::error::TrySendError::Closed(_) => GatewayError::CommandChannelClosed,
        })
    }
}

impl EngineGateway for EngineHandle {
    fn reset(&mut self, board: &Board, turn: Turn) -> Result<(), GatewayError> {
        self.send(EngineCommand::Reset {
            board: board.clone(),
            turn,
        })
    }

    fn request_move(&mut self, player: Player) -> Result<(), GatewayError> {
        self.send(EngineCommand::ComputerMove { player })
    }

    fn submit_human_move(&mut self, player: Player, ply: Ply) -> Result<(), GatewayError> {
        self.send(EngineCommand::HumanMove { player, ply })
    }

    fn request_double_undo(
        &mut self,
        player: Player,
        last: MoveCookie,
        previous: MoveCookie,
    ) -> Result<(), GatewayError> {
        self.send(EngineCommand::DoubleUndo {
            player,
            last,
            previous,
        })
    }
}
