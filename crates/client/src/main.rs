//! Shogi client binary.
//!
//! Composition root for the session runtime: loads `.env` and environment
//! configuration, installs logging and exposes maintenance commands for the
//! game-log archive and the crash-recovery snapshot.
//!
//! ```bash
//! shogi logs list --rescan
//! shogi logs export 3fa9 --line-ending unix
//! SAVE_DATA_DIR=./save_data shogi session show
//! ```

mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use runtime::RuntimeConfig;

use commands::{LogsCommand, SessionCommand};

/// Shogi game client
#[derive(Parser)]
#[command(name = "shogi")]
#[command(about = "Shogi session runtime and game-log archive", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Browse and maintain archived game logs
    #[command(subcommand)]
    Logs(LogsCommand),

    /// Inspect the saved game session
    #[command(subcommand)]
    Session(SessionCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup_logging()?;

    let config = RuntimeConfig::from_env();
    tracing::debug!(
        game_log_dir = %config.game_log_dir.display(),
        save_data_dir = %config.save_data_dir.display(),
        "Configuration loaded"
    );

    match cli.command {
        Command::Logs(cmd) => cmd.execute(config).await,
        Command::Session(cmd) => cmd.execute(config).await,
    }
}
