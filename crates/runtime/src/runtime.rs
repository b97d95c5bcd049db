//! Session driver.
//!
//! [`Session`] owns the [`SessionController`], spawns the engine and
//! persistence workers and feeds engine results back to the controller in
//! arrival order. Use [`SessionBuilder`] to wire repositories, archive and
//! clock.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_core::{GameLog, Player, Ply};

use crate::api::{Engine, EngineHandle, EngineResult, Result, RuntimeError};
use crate::archive::LogArchiveStore;
use crate::config::RuntimeConfig;
use crate::repository::{BlobRepository, InMemoryBlobRepository};
use crate::session::{
    Clock, GameSession, RequestOutcome, SessionController, SessionUpdate, SystemClock,
    load_session,
};
use crate::workers::{EngineWorker, PersistenceHandle, PersistenceWorker};

/// Starting a computer turn queues Reset and a move request back to back.
const MIN_ENGINE_BUFFER: usize = 2;

/// A running game with its background workers.
pub struct Session {
    controller: SessionController,
    result_rx: mpsc::UnboundedReceiver<EngineResult>,
    engine_worker: JoinHandle<()>,
    persistence_worker: JoinHandle<()>,
}

impl Session {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn session(&self) -> &GameSession {
        self.controller.session()
    }

    pub fn request_human_move(&mut self, player: Player, ply: Ply) -> RequestOutcome {
        self.controller.request_human_move(player, ply)
    }

    pub fn resolve_promotion(&mut self, promote: bool) -> RequestOutcome {
        self.controller.resolve_promotion(promote)
    }

    pub fn cancel_promotion(&mut self) -> bool {
        self.controller.cancel_promotion()
    }

    pub fn request_undo(&mut self) -> RequestOutcome {
        self.controller.request_undo()
    }

    pub fn think_times(&self) -> [u64; 2] {
        self.controller.think_times()
    }

    /// Wait for the next engine result and apply it.
    pub async fn next_update(&mut self) -> Result<SessionUpdate> {
        let result = self
            .result_rx
            .recv()
            .await
            .ok_or(RuntimeError::ResultChannelClosed)?;
        Ok(self.controller.on_engine_result(result)?)
    }

    /// Close the session: archive the game if a human moved, drop the
    /// crash-recovery snapshot and wait for both workers to finish.
    pub async fn quit(mut self) -> Result<Option<GameLog>> {
        let archived = self.controller.quit();

        // Dropping the controller closes the engine and persistence queues.
        drop(self.controller);
        drop(self.result_rx);

        self.engine_worker.await.map_err(RuntimeError::WorkerJoin)?;
        self.persistence_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(archived)
    }
}

/// Builder for [`Session`] with flexible configuration.
pub struct SessionBuilder {
    config: RuntimeConfig,
    clock: Arc<dyn Clock>,
    snapshots: Option<Arc<dyn BlobRepository>>,
    archive: Option<Arc<LogArchiveStore>>,
    session: Option<GameSession>,
    resume: bool,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            clock: Arc::new(SystemClock),
            snapshots: None,
            archive: None,
            session: None,
            resume: true,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Repository for the crash-recovery snapshot. Without one, snapshots
    /// are kept in memory only.
    pub fn snapshots(mut self, repo: Arc<dyn BlobRepository>) -> Self {
        self.snapshots = Some(repo);
        self
    }

    /// Archive receiving finished games.
    pub fn archive(mut self, archive: Arc<LogArchiveStore>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Play from an explicit session instead of a snapshot or a new game.
    pub fn initial_session(mut self, session: GameSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Whether a stored snapshot is resumed (default: true).
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Spawn the workers around `engine` and start the game.
    pub async fn build<E: Engine>(self, engine: E) -> Result<Session> {
        let now = self.clock.now_ms();
        let snapshots: Arc<dyn BlobRepository> = self
            .snapshots
            .unwrap_or_else(|| Arc::new(InMemoryBlobRepository::new()));

        let (session, resumed) = match self.session {
            Some(session) => (session, false),
            None => {
                let restored = if self.resume {
                    let repo = Arc::clone(&snapshots);
                    tokio::task::spawn_blocking(move || load_session(repo.as_ref(), now))
                        .await
                        .map_err(RuntimeError::WorkerJoin)??
                } else {
                    None
                };
                match restored {
                    Some(session) => {
                        tracing::info!(
                            target: "runtime::session",
                            plies = session.history.len(),
                            "Resuming saved session"
                        );
                        (session, true)
                    }
                    None => (
                        GameSession::new(
                            self.config.participants(),
                            self.config.handicap,
                            self.config.max_undos,
                            now,
                        ),
                        false,
                    ),
                }
            }
        };

        let (command_tx, command_rx) =
            mpsc::channel(self.config.engine_command_buffer.max(MIN_ENGINE_BUFFER));
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let engine_worker = tokio::task::spawn_blocking(move || {
            EngineWorker::new(engine, command_rx, result_tx).run();
        });

        let (persistence_tx, persistence_rx) = mpsc::unbounded_channel();
        let persistence_worker = tokio::spawn(
            PersistenceWorker::new(snapshots, self.archive, persistence_rx).run(),
        );

        let mut controller = SessionController::new(
            session,
            Box::new(EngineHandle::new(command_tx)),
            self.clock,
            Some(PersistenceHandle::new(persistence_tx)),
        );
        if resumed {
            controller = controller.resumed();
        }
        controller.start()?;

        Ok(Session {
            controller,
            result_rx,
            engine_worker,
            persistence_worker,
        })
    }
}
