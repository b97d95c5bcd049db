//! Persistence worker for crash-recovery snapshots and log archiving.
//!
//! The session hands writes to this worker and moves on. Commands are handled
//! one at a time in arrival order, so the most recently issued snapshot write
//! is the one left on disk. Blocking file I/O runs on the blocking pool.
//! Failures are retried with exponential backoff, then logged and dropped:
//! the next natural save point writes again.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info, warn};

use game_core::GameLog;

use crate::archive::{ArchiveError, LogArchiveStore};
use crate::repository::{BlobRepository, RepositoryError};
use crate::session::SNAPSHOT_KEY;

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 50;

/// Errors that can occur while persisting.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("blocking persistence task failed")]
    Join(#[source] tokio::task::JoinError),
}

/// Commands that can be sent to the persistence worker
#[derive(Debug)]
pub enum PersistenceCommand {
    /// Replace the crash-recovery snapshot with already encoded bytes.
    SaveSnapshot(Vec<u8>),
    /// Remove the crash-recovery snapshot.
    DeleteSnapshot,
    /// Add a log to the archive index.
    ArchiveLog { log: GameLog, merge: bool },
}

impl PersistenceCommand {
    fn label(&self) -> &'static str {
        match self {
            Self::SaveSnapshot(_) => "save_snapshot",
            Self::DeleteSnapshot => "delete_snapshot",
            Self::ArchiveLog { .. } => "archive_log",
        }
    }
}

/// Fire-and-forget sender half used by the session controller.
#[derive(Clone, Debug)]
pub struct PersistenceHandle {
    command_tx: mpsc::UnboundedSender<PersistenceCommand>,
}

impl PersistenceHandle {
    pub fn new(command_tx: mpsc::UnboundedSender<PersistenceCommand>) -> Self {
        Self { command_tx }
    }

    pub fn save_snapshot(&self, bytes: Vec<u8>) {
        self.send(PersistenceCommand::SaveSnapshot(bytes));
    }

    pub fn delete_snapshot(&self) {
        self.send(PersistenceCommand::DeleteSnapshot);
    }

    pub fn archive_log(&self, log: GameLog, merge: bool) {
        self.send(PersistenceCommand::ArchiveLog { log, merge });
    }

    fn send(&self, command: PersistenceCommand) {
        let label = command.label();
        if self.command_tx.send(command).is_err() {
            warn!(
                target: "runtime::persistence",
                command = label,
                "Persistence worker gone, dropping write"
            );
        }
    }
}

/// Background worker that handles all persistence operations
pub struct PersistenceWorker {
    snapshots: Arc<dyn BlobRepository>,
    archive: Option<Arc<LogArchiveStore>>,
    command_rx: mpsc::UnboundedReceiver<PersistenceCommand>,
}

impl PersistenceWorker {
    pub fn new(
        snapshots: Arc<dyn BlobRepository>,
        archive: Option<Arc<LogArchiveStore>>,
        command_rx: mpsc::UnboundedReceiver<PersistenceCommand>,
    ) -> Self {
        Self {
            snapshots,
            archive,
            command_rx,
        }
    }

    /// Main worker loop. Ends once every [`PersistenceHandle`] is dropped and
    /// the queue is drained.
    pub async fn run(mut self) {
        info!(target: "runtime::persistence", "PersistenceWorker started");

        while let Some(command) = self.command_rx.recv().await {
            let label = command.label();
            if let Err(e) = self.handle_with_retry(command).await {
                error!(
                    target: "runtime::persistence",
                    command = label,
                    error = %e,
                    "Giving up on persistence command"
                );
            }
        }

        info!(target: "runtime::persistence", "PersistenceWorker stopped");
    }

    /// Handle a command with exponential backoff retry
    async fn handle_with_retry(&self, command: PersistenceCommand) -> Result<(), PersistenceError> {
        let command = Arc::new(command);
        let mut attempt = 0;

        loop {
            match self.handle(Arc::clone(&command)).await {
                Ok(()) => {
                    if attempt > 0 {
                        info!(
                            target: "runtime::persistence",
                            attempt,
                            "Persisted {} after retry",
                            command.label()
                        );
                    }
                    return Ok(());
                }
                Err(e) if attempt + 1 < MAX_RETRIES => {
                    let delay = Duration::from_millis(BASE_DELAY_MS * (1 << attempt));
                    warn!(
                        target: "runtime::persistence",
                        "Failed to persist {} (attempt {}/{}): {}. Retrying in {:?}...",
                        command.label(),
                        attempt + 1,
                        MAX_RETRIES,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn handle(&self, command: Arc<PersistenceCommand>) -> Result<(), PersistenceError> {
        let snapshots = Arc::clone(&self.snapshots);
        let archive = self.archive.clone();

        tokio::task::spawn_blocking(move || -> Result<(), PersistenceError> {
            match command.as_ref() {
                PersistenceCommand::SaveSnapshot(bytes) => {
                    snapshots.put(SNAPSHOT_KEY, bytes)?;
                    debug!(target: "runtime::persistence", bytes = bytes.len(), "Snapshot saved");
                }
                PersistenceCommand::DeleteSnapshot => {
                    snapshots.delete(SNAPSHOT_KEY)?;
                    debug!(target: "runtime::persistence", "Snapshot deleted");
                }
                PersistenceCommand::ArchiveLog { log, merge } => match &archive {
                    Some(archive) => {
                        archive.save(log.clone(), *merge)?;
                    }
                    None => {
                        debug!(target: "runtime::persistence", "No archive configured, log dropped");
                    }
                },
            }
            Ok(())
        })
        .await
        .map_err(PersistenceError::Join)?
    }
}
