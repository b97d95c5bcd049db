//! Logging setup: stderr plus a per-day file in the platform cache directory.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info` level. The returned guard flushes
/// the file writer when dropped, so keep it alive until exit.
pub fn setup_logging() -> Result<WorkerGuard> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "shogi.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::debug!("Log directory: {}", log_dir.display());
    Ok(guard)
}

/// Platform cache directory for log files
///
/// - macOS: `~/Library/Caches/shogi/logs`
/// - Linux: `~/.cache/shogi/logs` (or `$XDG_CACHE_HOME/shogi/logs`)
/// - Windows: `%LOCALAPPDATA%\shogi\cache\logs`
/// - Fallback: `/tmp/shogi/logs`
fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "shogi")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/shogi"))
        .join("logs")
}
