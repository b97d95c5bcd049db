//! Worker tasks that back the session driver.
//!
//! The engine worker serializes access to the move/undo oracle, while the
//! persistence worker keeps snapshot and archive I/O off the session's path.

mod engine;
mod persistence;

pub use engine::{EngineCommand, EngineWorker};
pub use persistence::{PersistenceCommand, PersistenceError, PersistenceHandle, PersistenceWorker};
