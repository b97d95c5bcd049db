//! Session runtime for a shogi game client.
//!
//! This crate owns the game session state machine, talks to a move engine
//! through a command queue, keeps a crash-recovery snapshot and maintains the
//! archive of finished game logs. Consumers embed [`Session`] to drive a game
//! and use [`LogArchiveStore`] to browse saved logs.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session driver and its builder
//! - [`session`] holds the game state and the controller that mutates it
//! - [`api`] exposes the engine seam and error types
//! - [`archive`] and [`formats`] manage saved game logs on disk
//! - [`workers`] runs the engine and persistence tasks
//! - [`repository`] provides the storage adapters the workers write through
pub mod api;
pub mod archive;
pub mod config;
pub mod formats;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod workers;

pub use api::{
    Engine, EngineGateway, EngineHandle, EngineResult, GatewayError, ProtocolViolation, Result,
    RuntimeError, SessionError,
};
pub use archive::{ArchiveConfig, ArchiveError, ListMode, LogArchiveStore, LogIndex, UndoToken};
pub use config::RuntimeConfig;
pub use formats::{LineEnding, LogFormat, ParseError, parse_file};
pub use repository::{
    BlobRepository, FileBlobRepository, FileLogIndexRepository, InMemoryBlobRepository,
    RepositoryError,
};
pub use runtime::{Session, SessionBuilder};
pub use session::{
    Clock, DeclineReason, GameSession, HistoryEntry, ManualClock, RequestOutcome,
    SessionController, SessionSnapshotCodec, SessionUpdate, SystemClock, load_session,
};
