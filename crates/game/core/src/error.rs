//! Error types for constructing core values.

use thiserror::Error;

/// Errors raised when building core values from untrusted input
/// (parsed logs, configuration, decoded snapshots).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("square ({x}, {y}) is outside the 9x9 board")]
    SquareOutOfRange { x: u8, y: u8 },

    #[error("unknown handicap label: {0}")]
    UnknownHandicap(String),
}
