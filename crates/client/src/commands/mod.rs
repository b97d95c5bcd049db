//! CLI subcommands.

mod logs;
mod session;

pub use logs::LogsCommand;
pub use session::SessionCommand;
