//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine boundary, the session state machine,
//! repositories and the log archive so clients can bubble them up with
//! consistent context.
use thiserror::Error;

pub use crate::archive::ArchiveError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Failures of the engine command channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("engine worker command channel closed")]
    CommandChannelClosed,

    #[error("engine worker command queue is full")]
    CommandQueueFull,
}

/// Engine results that contradict the session's history.
///
/// These indicate a broken engine or a broken driver and are never absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("engine result delivered while no request was outstanding")]
    UnexpectedResult,

    #[error("engine result both appends a ply and rolls back {rollback} plies")]
    AppendWithRollback { rollback: u32 },

    #[error("engine result rolls back {rollback} plies but history holds {history_len}")]
    RollbackExceedsHistory { rollback: u32, history_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(#[from] ProtocolViolation),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("engine result channel closed")]
    ResultChannelClosed,

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
