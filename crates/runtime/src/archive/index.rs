//! In-memory form of the persisted log index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use game_core::{GameLog, LogDigest};

/// Digest-keyed map of known logs plus the start time of the last scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogIndex {
    /// Wall time at which the last directory scan started, `-1` if none ran.
    pub last_scan_time_ms: i64,
    pub logs: BTreeMap<LogDigest, GameLog>,
}

impl Default for LogIndex {
    fn default() -> Self {
        Self {
            last_scan_time_ms: Self::NEVER_SCANNED,
            logs: BTreeMap::new(),
        }
    }
}

impl LogIndex {
    pub const NEVER_SCANNED: i64 = -1;

    /// Insert `log` under its digest, replacing an entry with the same digest.
    pub fn upsert(&mut self, log: GameLog) -> LogDigest {
        let digest = log.digest();
        self.logs.insert(digest.clone(), log);
        digest
    }

    pub fn remove(&mut self, digest: &LogDigest) -> Option<GameLog> {
        self.logs.remove(digest)
    }

    /// Digest of the longest indexed log that `log` extends, if any.
    pub fn best_prefix_of(&self, log: &GameLog) -> Option<LogDigest> {
        self.logs
            .iter()
            .filter(|(_, existing)| existing.is_prefix_of(log))
            .max_by_key(|(_, existing)| existing.num_plies())
            .map(|(digest, _)| digest.clone())
    }

    /// Logs sorted newest first, ties broken by digest.
    pub fn sorted_logs(&self) -> Vec<GameLog> {
        let mut logs: Vec<GameLog> = self.logs.values().cloned().collect();
        logs.sort_by(|a, b| b.start_time_ms().cmp(&a.start_time_ms()));
        logs
    }
}
