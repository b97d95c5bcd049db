//! Crash-recovery snapshot commands.

use anyhow::{Context, Result};
use clap::Subcommand;

use game_core::{Player, format_think_time};
use runtime::session::SNAPSHOT_KEY;
use runtime::{BlobRepository, Clock, FileBlobRepository, RuntimeConfig, SystemClock, load_session};

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Print the game that would be resumed on the next start
    Show {
        /// List every ply
        #[arg(short, long)]
        moves: bool,
    },

    /// Throw the saved game away
    Discard,
}

impl SessionCommand {
    pub async fn execute(self, config: RuntimeConfig) -> Result<()> {
        let data_dir = config.save_data_dir.clone();
        let repo = tokio::task::spawn_blocking(move || FileBlobRepository::new(&data_dir))
            .await?
            .with_context(|| {
                format!(
                    "Failed to open save directory {}",
                    config.save_data_dir.display()
                )
            })?;

        match self {
            Self::Show { moves } => {
                let now = SystemClock.now_ms();
                let session = tokio::task::spawn_blocking(move || load_session(&repo, now))
                    .await??;
                let Some(session) = session else {
                    println!("No saved game.");
                    return Ok(());
                };

                for player in [Player::Black, Player::White] {
                    let seat = session.participants.get(player);
                    println!(
                        "{:<6} {} ({:?}), {}",
                        player,
                        seat.name,
                        seat.kind,
                        format_think_time(session.clocks.total(player))
                    );
                }
                println!("Handicap: {}", session.handicap.label());
                println!("To move:  {}", session.turn);
                println!("State:    {}", session.state);
                println!("Plies:    {}", session.history.len());
                println!("Undos:    {}", session.undos_remaining);

                if moves {
                    for (number, ply) in session.plies().enumerate() {
                        println!("{:>4} {}", number + 1, ply);
                    }
                }
            }
            Self::Discard => {
                let existed = repo.exists(SNAPSHOT_KEY);
                tokio::task::spawn_blocking(move || repo.delete(SNAPSHOT_KEY)).await??;
                if existed {
                    println!("Saved game discarded.");
                } else {
                    println!("No saved game.");
                }
            }
        }

        Ok(())
    }
}
