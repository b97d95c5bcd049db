//! Archive maintenance commands.
//!
//! Logs are addressed by a digest prefix, as printed by `logs list`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Subcommand;

use game_core::GameLog;
use runtime::formats::kif;
use runtime::{LineEnding, ListMode, LogArchiveStore, RuntimeConfig, SystemClock};

#[derive(Subcommand)]
pub enum LogsCommand {
    /// List archived logs, newest first
    List {
        /// Forget indexed files and scan every directory again
        #[arg(long)]
        rescan: bool,
    },

    /// Print a log as KIF text
    Show {
        #[arg(value_name = "DIGEST")]
        digest: String,
    },

    /// Index KIF and HTML files found in the given directories
    Scan {
        #[arg(value_name = "DIR", required = true)]
        dirs: Vec<PathBuf>,
    },

    /// Write a log into the archive directory as `<digest>.kif`
    Export {
        #[arg(value_name = "DIGEST")]
        digest: String,

        /// `kif_dos` or `kif_unix` (defaults to LOG_SAVE_FORMAT)
        #[arg(short, long, value_name = "FORMAT")]
        line_ending: Option<LineEnding>,
    },

    /// Delete a log; a log file goes to the archive trash
    Delete {
        #[arg(value_name = "DIGEST")]
        digest: String,
    },

    /// Drop unsaved logs older than the given age
    Prune {
        /// Age in days; 0 drops every unsaved log
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}

impl LogsCommand {
    pub async fn execute(self, config: RuntimeConfig) -> Result<()> {
        let store = Arc::new(LogArchiveStore::new(
            config.archive_config(),
            Arc::new(SystemClock),
        ));

        match self {
            Self::List { rescan } => {
                let mode = if rescan {
                    ListMode::Rescan
                } else {
                    ListMode::Cached
                };
                let logs = with_store(&store, move |store| store.list_logs(mode)).await?;
                if logs.is_empty() {
                    println!("No logs found.");
                }
                for log in &logs {
                    println!("{}", summary_line(log));
                }
            }
            Self::Show { digest } => {
                let log = find_log(&store, digest).await?;
                println!("# {}", log.digest());
                if let Some(path) = log.path() {
                    println!("# {}", path.display());
                }
                print!("{}", kif::write(&log, LineEnding::Unix));
            }
            Self::Scan { dirs } => {
                let indexed = with_store(&store, move |store| store.scan(&dirs)).await?;
                println!("Indexed {indexed} file(s).");
            }
            Self::Export {
                digest,
                line_ending,
            } => {
                let line_ending = line_ending.unwrap_or(config.log_save_format);
                let log = find_log(&store, digest).await?;
                let path =
                    with_store(&store, move |store| store.save_to_archive_dir(&log, line_ending))
                        .await?;
                println!("Exported to {}", path.display());
            }
            Self::Delete { digest } => {
                let log = find_log(&store, digest).await?;
                let token = with_store(&store, move |store| store.delete(&log)).await?;
                match token.log().path() {
                    Some(_) => println!(
                        "Moved {} to {}",
                        token.log().digest(),
                        store.config().trash_dir().display()
                    ),
                    None => println!("Deleted {}", token.log().digest()),
                }
            }
            Self::Prune { days } => {
                let removed =
                    with_store(&store, move |store| store.prune_in_memory(days)).await?;
                println!("Removed {removed} log(s).");
            }
        }

        Ok(())
    }
}

/// Run a blocking archive operation off the async runtime.
async fn with_store<T, F>(store: &Arc<LogArchiveStore>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&LogArchiveStore) -> runtime::archive::Result<T> + Send + 'static,
{
    let store = Arc::clone(store);
    Ok(tokio::task::spawn_blocking(move || f(&store)).await??)
}

/// Resolve a digest prefix against the cached listing.
async fn find_log(store: &Arc<LogArchiveStore>, prefix: String) -> Result<GameLog> {
    let logs = with_store(store, |store| store.list_logs(ListMode::Cached)).await?;
    let mut matches = logs
        .into_iter()
        .filter(|log| log.digest().as_str().starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(log), None) => Ok(log),
        (None, _) => bail!("No log matches '{prefix}'"),
        (Some(_), Some(_)) => bail!("'{prefix}' matches more than one log"),
    }
}

fn summary_line(log: &GameLog) -> String {
    let started = chrono::DateTime::from_timestamp_millis(log.start_time_ms())
        .map(|time| time.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let source = if log.is_in_memory() { "saved" } else { "file" };
    let digest = log.digest();
    let short = digest.as_str().get(..12).unwrap_or(digest.as_str());

    format!(
        "{}  {}  {:>4} plies  {:<5}  {} vs {}{}",
        short,
        started,
        log.num_plies(),
        source,
        log.black_player(),
        log.white_player(),
        log.handicap()
            .map(|handicap| format!(" ({handicap})"))
            .unwrap_or_default(),
    )
}
