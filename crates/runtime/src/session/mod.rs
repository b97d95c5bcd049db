//! Game session state and the state machine that owns it.

mod clock;
mod controller;
mod snapshot;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{DeclineReason, RequestOutcome, SessionController, SessionUpdate};
pub use snapshot::{SNAPSHOT_KEY, SNAPSHOT_VERSION, SessionSnapshotCodec, load_session};
pub use state::{GameSession, HistoryEntry, RunningClock, ThinkClocks};
