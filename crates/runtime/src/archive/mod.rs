//! Content-addressed archive of game logs.
//!
//! [`LogArchiveStore`] owns the persisted [`LogIndex`]: every public
//! operation takes the store lock, re-reads the index file, mutates it and
//! rewrites it whole. Logs are keyed by [`LogDigest`], so a game reached
//! through several files or checkpoints is indexed once.
//!
//! # File Structure
//!
//! ```text
//! {archive_root}/
//!   ├── {digest}.kif        exported logs
//!   └── trash/
//!       └── {digest}        soft-deleted files
//! {data_dir}/log_summary.json
//! ```

mod index;

pub use index::LogIndex;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::UNIX_EPOCH;

use thiserror::Error;
use tracing::{debug, info, warn};

use game_core::{GameLog, LogDigest};

use crate::formats::{self, LineEnding, LogFormat};
use crate::repository::{FileLogIndexRepository, RepositoryError};
use crate::session::Clock;

const TRASH_DIR: &str = "trash";
const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to move {path} to trash")]
    TrashFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to restore {path} from trash")]
    RestoreFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("log {0} was already restored")]
    AlreadyRestored(LogDigest),

    #[error("failed to export log to {path}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Where the archive lives on disk.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Directory holding exported logs and the trash.
    pub archive_root: PathBuf,
    /// Downloads-style directory scanned alongside the archive root.
    pub download_dir: Option<PathBuf>,
    /// Location of the persisted index.
    pub index_path: PathBuf,
}

impl ArchiveConfig {
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        self.download_dir
            .iter()
            .cloned()
            .chain(std::iter::once(self.archive_root.clone()))
            .collect()
    }

    pub fn trash_dir(&self) -> PathBuf {
        self.archive_root.join(TRASH_DIR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Scan only files changed since the last scan.
    #[default]
    Cached,
    /// Forget every on-disk entry and scan all files again.
    Rescan,
}

/// Capability to reverse one [`LogArchiveStore::delete`].
///
/// Clones share state: once any clone has restored the log, every further
/// undo reports [`ArchiveError::AlreadyRestored`].
#[derive(Debug, Clone)]
pub struct UndoToken {
    log: GameLog,
    restored: Arc<AtomicBool>,
}

impl UndoToken {
    fn new(log: GameLog) -> Self {
        Self {
            log,
            restored: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }
}

/// Store object shared by every consumer of the archive.
pub struct LogArchiveStore {
    config: ArchiveConfig,
    index_repo: FileLogIndexRepository,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl LogArchiveStore {
    pub fn new(config: ArchiveConfig, clock: Arc<dyn Clock>) -> Self {
        let index_repo = FileLogIndexRepository::new(&config.index_path);
        Self {
            config,
            index_repo,
            clock,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Scan `directories` for logs changed since the last scan and upsert
    /// them. Returns the number of files indexed.
    pub fn scan(&self, directories: &[PathBuf]) -> Result<usize> {
        let _guard = self.lock();
        let mut index = self.load_index();
        let indexed = self.scan_into(&mut index, directories);
        self.index_repo.save(&index)?;
        Ok(indexed)
    }

    /// All indexed logs, newest first, after scanning both scan roots.
    pub fn list_logs(&self, mode: ListMode) -> Result<Vec<GameLog>> {
        let _guard = self.lock();
        let mut index = self.load_index();
        if mode == ListMode::Rescan {
            remove_on_disk(&mut index);
        }
        self.scan_into(&mut index, &self.config.scan_roots());
        self.index_repo.save(&index)?;
        Ok(index.sorted_logs())
    }

    pub fn get(&self, digest: &LogDigest) -> Result<Option<GameLog>> {
        let _guard = self.lock();
        Ok(self.load_index().logs.get(digest).cloned())
    }

    /// Insert `log`. With `merge`, the longest indexed log that `log` extends
    /// is dropped first so only the most complete checkpoint remains.
    pub fn save(&self, log: GameLog, merge: bool) -> Result<LogDigest> {
        let _guard = self.lock();
        let mut index = self.load_index();

        if merge {
            if let Some(superseded) = index.best_prefix_of(&log) {
                debug!(target: "runtime::archive", %superseded, "Replacing shorter checkpoint");
                index.remove(&superseded);
            }
        }
        let digest = index.upsert(log);
        self.index_repo.save(&index)?;

        info!(target: "runtime::archive", %digest, "Saved log");
        Ok(digest)
    }

    /// Write `log` as `{digest}.kif` under the archive root and drop its
    /// in-memory index entry; the next scan indexes the file instead.
    pub fn save_to_archive_dir(&self, log: &GameLog, line_ending: LineEnding) -> Result<PathBuf> {
        let _guard = self.lock();
        let digest = log.digest();
        let path = self.config.archive_root.join(format!("{digest}.kif"));

        let text = formats::kif::write(log, line_ending);
        write_atomically(&path, text.as_bytes()).map_err(|source| ArchiveError::Export {
            path: path.clone(),
            source,
        })?;

        let mut index = self.load_index();
        if index.logs.get(&digest).is_some_and(GameLog::is_in_memory) {
            index.remove(&digest);
        }
        self.index_repo.save(&index)?;

        info!(target: "runtime::archive", %digest, path = %path.display(), "Exported log");
        Ok(path)
    }

    /// Soft-delete `log`.
    ///
    /// An on-disk log is moved to `trash/{digest}` first; the index entry is
    /// removed only once the file is safely in the trash. On error neither the
    /// file nor the index has changed.
    pub fn delete(&self, log: &GameLog) -> Result<UndoToken> {
        let _guard = self.lock();
        let digest = log.digest();
        let mut index = self.load_index();

        let trashed = match log.path() {
            Some(path) => {
                let trash_path = self.trash_path(&digest);
                move_to_trash(path, &trash_path)?;
                Some((path, trash_path))
            }
            None => None,
        };

        index.remove(&digest);
        if let Err(e) = self.index_repo.save(&index) {
            if let Some((path, trash_path)) = trashed {
                if let Err(rollback) = fs::rename(&trash_path, path) {
                    warn!(
                        target: "runtime::archive",
                        error = %rollback,
                        "Failed to move {} back after index write failed",
                        trash_path.display()
                    );
                }
            }
            return Err(e.into());
        }

        info!(target: "runtime::archive", %digest, "Deleted log");
        Ok(UndoToken::new(log.clone()))
    }

    /// Reverse the delete behind `token`.
    pub fn undo_delete(&self, token: &UndoToken) -> Result<()> {
        let _guard = self.lock();
        let log = token.log();
        let digest = log.digest();

        if token.restored.load(Ordering::SeqCst) {
            return Err(ArchiveError::AlreadyRestored(digest));
        }

        if let Some(path) = log.path() {
            let trash_path = self.trash_path(&digest);
            fs::rename(&trash_path, path).map_err(|source| {
                warn!(
                    target: "runtime::archive",
                    error = %source,
                    "Failed to restore {} to {}",
                    trash_path.display(),
                    path.display()
                );
                ArchiveError::RestoreFailed {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }

        let mut index = self.load_index();
        index.upsert(log.clone());
        if let Err(e) = self.index_repo.save(&index) {
            // Put the file back in the trash so the token can be retried.
            if let Some(path) = log.path() {
                let trash_path = self.trash_path(&digest);
                if let Err(rollback) = fs::rename(path, &trash_path) {
                    warn!(
                        target: "runtime::archive",
                        error = %rollback,
                        "Failed to move {} back to the trash after index write failed",
                        path.display()
                    );
                }
            }
            return Err(e.into());
        }
        token.restored.store(true, Ordering::SeqCst);

        info!(target: "runtime::archive", %digest, "Restored log");
        Ok(())
    }

    /// Remove in-memory logs started at or before `now - max_age_days`;
    /// `0` removes every in-memory log. The next listing rescans everything.
    pub fn prune_in_memory(&self, max_age_days: u32) -> Result<usize> {
        let _guard = self.lock();
        let mut index = self.load_index();

        let cutoff = self.clock.now_ms() - i64::from(max_age_days) * MS_PER_DAY - 1;
        let before = index.logs.len();
        index.logs.retain(|_, log| {
            !(log.is_in_memory() && (max_age_days == 0 || log.start_time_ms() <= cutoff))
        });
        let removed = before - index.logs.len();
        index.last_scan_time_ms = LogIndex::NEVER_SCANNED;
        self.index_repo.save(&index)?;

        info!(target: "runtime::archive", removed, max_age_days, "Pruned in-memory logs");
        Ok(removed)
    }

    /// Drop every entry backed by a file and force the next scan to read
    /// every file again.
    pub fn remove_all_on_disk_entries(&self) -> Result<usize> {
        let _guard = self.lock();
        let mut index = self.load_index();
        let removed = remove_on_disk(&mut index);
        self.index_repo.save(&index)?;
        Ok(removed)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_index(&self) -> LogIndex {
        self.index_repo.load().unwrap_or_else(|e| {
            warn!(
                target: "runtime::archive",
                error = %e,
                "Unreadable log index at {}, starting empty",
                self.index_repo.path().display()
            );
            LogIndex::default()
        })
    }

    fn trash_path(&self, digest: &LogDigest) -> PathBuf {
        self.config.trash_dir().join(digest.as_str())
    }

    fn scan_into(&self, index: &mut LogIndex, directories: &[PathBuf]) -> usize {
        let scan_start = self.clock.now_ms();
        let mut indexed = 0;

        for dir in directories {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(target: "runtime::archive", error = %e, "Skipping {}", dir.display());
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if LogFormat::from_path(&path).is_none() || !path.is_file() {
                    continue;
                }
                if modified_ms(&path).is_some_and(|ms| ms < index.last_scan_time_ms) {
                    continue;
                }
                match formats::parse_file(&path) {
                    Ok(log) => {
                        index.upsert(log);
                        indexed += 1;
                    }
                    Err(e) => {
                        warn!(
                            target: "runtime::archive",
                            error = %e,
                            "Skipping unreadable log {}",
                            path.display()
                        );
                    }
                }
            }
        }

        index.last_scan_time_ms = scan_start;
        debug!(target: "runtime::archive", indexed, scan_start, "Scan finished");
        indexed
    }
}

fn remove_on_disk(index: &mut LogIndex) -> usize {
    let before = index.logs.len();
    index.logs.retain(|_, log| log.is_in_memory());
    index.last_scan_time_ms = LogIndex::NEVER_SCANNED;
    before - index.logs.len()
}

fn modified_ms(path: &Path) -> Option<i64> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let elapsed = modified.duration_since(UNIX_EPOCH).ok()?;
    i64::try_from(elapsed.as_millis()).ok()
}

/// Move `path` to `trash_path`, creating the trash directory and clearing a
/// stale entry before one retry.
fn move_to_trash(path: &Path, trash_path: &Path) -> Result<()> {
    if fs::rename(path, trash_path).is_ok() {
        return Ok(());
    }

    let retry = || -> io::Result<()> {
        if let Some(dir) = trash_path.parent() {
            fs::create_dir_all(dir)?;
        }
        match fs::remove_file(trash_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::rename(path, trash_path)
    };
    retry().map_err(|source| ArchiveError::TrashFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let temp_path = path.with_extension("kif.tmp");
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ManualClock, SystemClock};
    use game_core::{PieceKind, Ply, Square};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        root: PathBuf,
        downloads: PathBuf,
        store: LogArchiveStore,
    }

    fn fixture_with_clock(clock: Arc<dyn Clock>) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("archive");
        let downloads = temp_dir.path().join("downloads");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&downloads).unwrap();
        let config = ArchiveConfig {
            archive_root: root.clone(),
            download_dir: Some(downloads.clone()),
            index_path: temp_dir.path().join("data/log_summary.json"),
        };
        Fixture {
            _temp_dir: temp_dir,
            root,
            downloads,
            store: LogArchiveStore::new(config, clock),
        }
    }

    fn fixture() -> Fixture {
        fixture_with_clock(Arc::new(SystemClock))
    }

    fn plies(n: usize) -> Vec<Ply> {
        (0..n)
            .map(|i| {
                let x = (i % 9) as u8;
                let y = ((i / 9) % 9) as u8;
                Ply::drop(PieceKind::Pawn, Square::new(x, y).unwrap())
            })
            .collect()
    }

    fn log(start: i64, n: usize) -> GameLog {
        GameLog::new(start, "Alice", "Bob", plies(n))
    }

    fn index_of(f: &Fixture) -> LogIndex {
        f.store.index_repo.load().unwrap()
    }

    fn kif_file(dir: &Path, name: &str, log: &GameLog) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, formats::kif::write(log, LineEnding::Unix)).unwrap();
        path
    }

    #[test]
    fn merge_replaces_the_checkpoint_it_extends() {
        let f = fixture();
        let short = log(1_000, 10);
        let long = log(1_000, 14);
        assert!(short.is_prefix_of(&long));

        f.store.save(short, true).unwrap();
        let digest = f.store.save(long.clone(), true).unwrap();

        let index = index_of(&f);
        assert_eq!(index.logs.len(), 1);
        assert_eq!(index.logs.get(&digest), Some(&long));
    }

    #[test]
    fn merge_keeps_unrelated_logs_and_removes_only_the_longest_prefix() {
        let f = fixture();
        f.store.save(log(1_000, 4), false).unwrap();
        f.store.save(log(1_000, 8), false).unwrap();
        f.store.save(log(2_000, 8), false).unwrap();
        f.store
            .save(GameLog::new(1_000, "Alice", "Carol", plies(8)), false)
            .unwrap();

        f.store.save(log(1_000, 12), true).unwrap();

        let index = index_of(&f);
        assert_eq!(index.logs.len(), 4);
        assert!(!index.logs.contains_key(&log(1_000, 8).digest()));
        assert!(index.logs.contains_key(&log(1_000, 4).digest()));
        assert!(index.logs.contains_key(&log(1_000, 12).digest()));
    }

    #[test]
    fn save_without_merge_overwrites_same_digest_only() {
        let f = fixture();
        f.store.save(log(1_000, 3), false).unwrap();
        f.store.save(log(1_000, 3), false).unwrap();
        f.store.save(log(1_000, 5), false).unwrap();
        assert_eq!(index_of(&f).logs.len(), 2);
    }

    #[test]
    fn scan_indexes_both_formats_and_skips_bad_files() {
        let f = fixture();
        kif_file(&f.root, "a.kif", &log(1_000, 2));
        let html = format!(
            "<html><pre>{}</pre></html>",
            formats::kif::write(&log(2_000, 3), LineEnding::Unix).replace('\n', "<br>")
        );
        fs::write(f.downloads.join("b.html"), html).unwrap();
        fs::write(f.root.join("broken.kif"), "   1 同　歩(77)\n").unwrap();
        fs::write(f.root.join("notes.txt"), "ignored").unwrap();

        let indexed = f.store.scan(&f.store.config().scan_roots()).unwrap();
        assert_eq!(indexed, 2);

        let index = index_of(&f);
        assert_eq!(index.logs.len(), 2);
        assert!(index.logs.values().all(|l| l.path().is_some()));
        assert!(index.last_scan_time_ms > 0);
    }

    #[test]
    fn scan_twice_is_idempotent() {
        let f = fixture();
        kif_file(&f.root, "a.kif", &log(1_000, 2));
        kif_file(&f.downloads, "b.kif", &log(3_000, 1));

        let roots = f.store.config().scan_roots();
        f.store.scan(&roots).unwrap();
        let first = index_of(&f);
        f.store.scan(&roots).unwrap();
        let second = index_of(&f);

        assert_eq!(first.logs, second.logs);
    }

    #[test]
    fn scan_skips_files_older_than_last_scan() {
        let clock = ManualClock::new(i64::MAX / 2);
        let f = fixture_with_clock(Arc::new(clock));
        f.store.scan(&[f.root.clone()]).unwrap();

        kif_file(&f.root, "late.kif", &log(1_000, 1));
        assert_eq!(f.store.scan(&[f.root.clone()]).unwrap(), 0);

        f.store.remove_all_on_disk_entries().unwrap();
        assert_eq!(f.store.scan(&[f.root.clone()]).unwrap(), 1);
    }

    #[test]
    fn list_logs_is_newest_first_and_rescan_forgets_removed_files() {
        let f = fixture();
        let older = kif_file(&f.root, "older.kif", &log(1_000, 1));
        kif_file(&f.downloads, "newer.kif", &log(5_000, 1));
        f.store.save(log(3_000, 2), false).unwrap();

        let starts: Vec<i64> = f
            .store
            .list_logs(ListMode::Cached)
            .unwrap()
            .iter()
            .map(GameLog::start_time_ms)
            .collect();
        assert_eq!(starts, vec![5_000, 3_000, 1_000]);

        fs::remove_file(older).unwrap();
        let logs = f.store.list_logs(ListMode::Rescan).unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().any(|l| l.is_in_memory()));
    }

    #[test]
    fn delete_and_undo_restore_file_and_entry() {
        let f = fixture();
        let path = kif_file(&f.root, "game.kif", &log(1_000, 2));
        f.store.scan(&[f.root.clone()]).unwrap();
        let indexed = index_of(&f).logs.values().next().cloned().unwrap();
        assert_eq!(indexed.path(), Some(path.as_path()));

        let token = f.store.delete(&indexed).unwrap();
        assert!(!path.exists());
        assert!(f.store.config().trash_dir().join(indexed.digest().as_str()).exists());
        assert!(index_of(&f).logs.is_empty());

        f.store.undo_delete(&token).unwrap();
        assert!(path.exists());
        assert_eq!(index_of(&f).logs.get(&indexed.digest()), Some(&indexed));

        let before = index_of(&f);
        assert!(matches!(
            f.store.undo_delete(&token.clone()),
            Err(ArchiveError::AlreadyRestored(_))
        ));
        assert_eq!(index_of(&f), before);
        assert!(path.exists());
    }

    #[test]
    fn delete_clears_a_stale_trash_entry() {
        let f = fixture();
        let game = log(1_000, 2);
        let path = kif_file(&f.root, "game.kif", &game);
        let on_disk = formats::parse_file(&path).unwrap();

        let trash = f.store.config().trash_dir();
        fs::create_dir_all(&trash).unwrap();
        fs::create_dir_all(trash.join(on_disk.digest().as_str())).unwrap();
        fs::write(trash.join(on_disk.digest().as_str()).join("x"), "stale").unwrap();
        // A non-empty directory in the way cannot be replaced: nothing changes.
        f.store.save(on_disk.clone(), false).unwrap();
        assert!(matches!(
            f.store.delete(&on_disk),
            Err(ArchiveError::TrashFailed { .. })
        ));
        assert!(path.exists());
        assert_eq!(index_of(&f).logs.len(), 1);

        fs::remove_dir_all(trash.join(on_disk.digest().as_str())).unwrap();
        fs::write(trash.join(on_disk.digest().as_str()), "stale").unwrap();
        f.store.delete(&on_disk).unwrap();
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(trash.join(on_disk.digest().as_str())).unwrap(),
            formats::kif::write(&game, LineEnding::Unix)
        );
    }

    #[test]
    fn delete_and_undo_of_in_memory_log() {
        let f = fixture();
        let game = log(1_000, 3);
        f.store.save(game.clone(), false).unwrap();

        let token = f.store.delete(&game).unwrap();
        assert!(index_of(&f).logs.is_empty());
        f.store.undo_delete(&token).unwrap();
        assert_eq!(index_of(&f).logs.len(), 1);
    }

    #[test]
    fn failed_restore_leaves_the_trash_in_place() {
        let f = fixture();
        let path = kif_file(&f.root, "game.kif", &log(1_000, 2));
        let on_disk = formats::parse_file(&path).unwrap();
        f.store.save(on_disk.clone(), false).unwrap();
        let token = f.store.delete(&on_disk).unwrap();

        fs::remove_dir_all(&f.root.join("trash")).unwrap();
        let result = f.store.undo_delete(&token);
        assert!(matches!(result, Err(ArchiveError::RestoreFailed { .. })));
        assert!(index_of(&f).logs.is_empty());
    }

    #[test]
    fn undo_after_failed_index_write_can_be_retried() {
        let f = fixture();
        let path = kif_file(&f.root, "game.kif", &log(1_000, 2));
        let on_disk = formats::parse_file(&path).unwrap();
        f.store.save(on_disk.clone(), false).unwrap();
        let token = f.store.delete(&on_disk).unwrap();
        let trash_path = f.store.config().trash_dir().join(on_disk.digest().as_str());

        // A non-empty directory at the index path makes the write fail.
        let index_path = f.store.config().index_path.clone();
        fs::remove_file(&index_path).unwrap();
        fs::create_dir_all(index_path.join("blocker")).unwrap();
        assert!(f.store.undo_delete(&token).is_err());
        assert!(!path.exists());
        assert!(trash_path.exists());

        fs::remove_dir_all(&index_path).unwrap();
        f.store.undo_delete(&token).unwrap();
        assert!(path.exists());
        assert_eq!(index_of(&f).logs.get(&on_disk.digest()), Some(&on_disk));
        assert!(matches!(
            f.store.undo_delete(&token),
            Err(ArchiveError::AlreadyRestored(_))
        ));
    }

    #[test]
    fn prune_removes_old_in_memory_logs_only() {
        let clock = ManualClock::new(10 * MS_PER_DAY);
        let f = fixture_with_clock(Arc::new(clock));
        f.store.save(log(2 * MS_PER_DAY, 1), false).unwrap();
        f.store.save(log(9 * MS_PER_DAY, 1), false).unwrap();
        let path = kif_file(&f.root, "old.kif", &log(0, 1));
        f.store.save(formats::parse_file(&path).unwrap(), false).unwrap();

        assert_eq!(f.store.prune_in_memory(7).unwrap(), 1);
        let index = index_of(&f);
        assert_eq!(index.logs.len(), 2);
        assert_eq!(index.last_scan_time_ms, LogIndex::NEVER_SCANNED);

        assert_eq!(f.store.prune_in_memory(0).unwrap(), 1);
        let index = index_of(&f);
        assert_eq!(index.logs.len(), 1);
        assert!(index.logs.values().all(|l| !l.is_in_memory()));
    }

    #[test]
    fn export_writes_kif_and_drops_in_memory_entry() {
        let f = fixture();
        let game = log(7_000, 3);
        f.store.save(game.clone(), false).unwrap();

        let path = f.store.save_to_archive_dir(&game, LineEnding::Dos).unwrap();
        assert_eq!(path, f.root.join(format!("{}.kif", game.digest())));
        assert!(fs::read_to_string(&path).unwrap().contains("\r\n"));
        assert!(index_of(&f).logs.is_empty());

        let logs = f.store.list_logs(ListMode::Cached).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].path(), Some(path.as_path()));
    }
}
