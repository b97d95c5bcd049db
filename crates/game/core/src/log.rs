//! Archived game records and their content digest.

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};

use crate::ply::Ply;

/// Content key of a [`GameLog`].
///
/// Derived from start time, both player names and the ordered plies only, so
/// two logs that differ in nothing but their on-disk location share a digest.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LogDigest(String);

impl LogDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LogDigest {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable record of a finished or checkpointed game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameLog {
    start_time_ms: i64,
    black_player: String,
    white_player: String,
    handicap: Option<String>,
    plies: Vec<Ply>,
    path: Option<PathBuf>,
}

impl GameLog {
    pub fn new(
        start_time_ms: i64,
        black_player: impl Into<String>,
        white_player: impl Into<String>,
        plies: Vec<Ply>,
    ) -> Self {
        Self {
            start_time_ms,
            black_player: black_player.into(),
            white_player: white_player.into(),
            handicap: None,
            plies,
            path: None,
        }
    }

    pub fn with_handicap(self, handicap: Option<String>) -> Self {
        Self { handicap, ..self }
    }

    /// Copy of this log attached to a file on disk.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }

    pub fn start_time_ms(&self) -> i64 {
        self.start_time_ms
    }

    pub fn black_player(&self) -> &str {
        &self.black_player
    }

    pub fn white_player(&self) -> &str {
        &self.white_player
    }

    pub fn handicap(&self) -> Option<&str> {
        self.handicap.as_deref()
    }

    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn num_plies(&self) -> usize {
        self.plies.len()
    }

    /// File backing this log, `None` for logs that only live in the index.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }

    /// SHA-256 over a canonical encoding of the identifying fields, hex encoded.
    pub fn digest(&self) -> LogDigest {
        let mut hasher = Sha256::new();
        hasher.update(self.start_time_ms.to_le_bytes());
        for name in [&self.black_player, &self.white_player] {
            hasher.update((name.len() as u32).to_le_bytes());
            hasher.update(name.as_bytes());
        }
        hasher.update((self.plies.len() as u32).to_le_bytes());
        for ply in &self.plies {
            let (fx, fy) = ply.from.map_or((u8::MAX, u8::MAX), |sq| (sq.x, sq.y));
            hasher.update([
                ply.piece as u8,
                u8::from(ply.promotes),
                fx,
                fy,
                ply.to.x,
                ply.to.y,
            ]);
        }
        LogDigest(hex::encode(hasher.finalize()))
    }

    /// True when `self` is a strictly shorter earlier version of `other`:
    /// same start time and players, fewer plies, and every ply of `self`
    /// equal to the ply at the same position in `other`.
    pub fn is_prefix_of(&self, other: &GameLog) -> bool {
        self.start_time_ms == other.start_time_ms
            && self.black_player == other.black_player
            && self.white_player == other.white_player
            && self.plies.len() < other.plies.len()
            && other.plies.starts_with(&self.plies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;
    use crate::ply::Square;

    fn ply(n: u8) -> Ply {
        Ply::board_move(
            PieceKind::Pawn,
            Square::new(n % 9, 6).unwrap(),
            Square::new(n % 9, 5).unwrap(),
        )
    }

    fn log(plies: usize) -> GameLog {
        GameLog::new(1_000, "Alice", "Bob", (0..plies as u8).map(ply).collect())
    }

    #[test]
    fn digest_is_stable_and_ignores_path() {
        let a = log(4);
        assert_eq!(a.digest(), a.digest());
        let b = a.clone().with_path("/tmp/a.kif");
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().as_str().len(), 64);
    }

    #[test]
    fn digest_changes_with_content() {
        let base = log(4);
        assert_ne!(base.digest(), log(5).digest());
        let renamed = GameLog::new(1_000, "Alice", "Carol", base.plies().to_vec());
        assert_ne!(base.digest(), renamed.digest());
        let later = GameLog::new(1_001, "Alice", "Bob", base.plies().to_vec());
        assert_ne!(base.digest(), later.digest());
    }

    #[test]
    fn digest_separates_name_boundaries() {
        let a = GameLog::new(0, "ab", "c", vec![]);
        let b = GameLog::new(0, "a", "bc", vec![]);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn prefix_requires_matching_metadata_and_plies() {
        let short = log(10);
        let long = log(14);
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(!short.is_prefix_of(&short));

        let other_player = GameLog::new(1_000, "Alice", "Eve", long.plies().to_vec());
        assert!(!short.is_prefix_of(&other_player));

        let mut diverged = long.plies().to_vec();
        diverged[3] = ply(8).with_promotion();
        let diverged = GameLog::new(1_000, "Alice", "Bob", diverged);
        assert!(!short.is_prefix_of(&diverged));
    }
}
