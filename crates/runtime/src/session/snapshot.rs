//! Versioned binary encoding of a [`GameSession`] for crash recovery.

use crate::repository::{BlobRepository, RepositoryError, Result};

use super::state::GameSession;

/// Format tag written before every snapshot payload.
pub const SNAPSHOT_VERSION: u32 = 0x1234_0001;

/// Blob key of the crash-recovery snapshot.
pub const SNAPSHOT_KEY: &str = "current_game";

/// Encoder/decoder for session snapshots.
///
/// Layout: 4-byte little-endian [`SNAPSHOT_VERSION`] followed by the bincode
/// encoding of every [`GameSession`] field.
pub struct SessionSnapshotCodec;

impl SessionSnapshotCodec {
    pub fn encode(session: &GameSession) -> Result<Vec<u8>> {
        let mut bytes = SNAPSHOT_VERSION.to_le_bytes().to_vec();
        bincode::serialize_into(&mut bytes, session)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Decode a snapshot, restarting the turn holder's clock at `now_ms`.
    /// Restored history carries no cookies.
    ///
    /// A missing or foreign version tag, or an undecodable payload, yields
    /// `None`: the caller starts without a prior session.
    pub fn decode(bytes: &[u8], now_ms: i64) -> Option<GameSession> {
        let Some((tag, payload)) = bytes.split_first_chunk::<4>() else {
            tracing::warn!(
                target: "runtime::persistence",
                len = bytes.len(),
                "Snapshot too short for a version tag"
            );
            return None;
        };
        let version = u32::from_le_bytes(*tag);
        if version != SNAPSHOT_VERSION {
            tracing::warn!(
                target: "runtime::persistence",
                version = format_args!("{version:#010x}"),
                "Ignoring snapshot with unknown version"
            );
            return None;
        }

        let mut session: GameSession = match bincode::deserialize(payload) {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(
                    target: "runtime::persistence",
                    error = %error,
                    "Ignoring undecodable snapshot"
                );
                return None;
            }
        };

        let turn = if session.state.is_terminal() {
            game_core::Turn::None
        } else {
            session.turn
        };
        session.clocks.restart_for(turn, now_ms);

        // Cookies belong to the engine that issued them; the restarted engine
        // knows none of them.
        for entry in &mut session.history {
            entry.cookie = None;
        }
        Some(session)
    }
}

/// Load the crash-recovery session from `repo`, if one is stored.
pub fn load_session(repo: &dyn BlobRepository, now_ms: i64) -> Result<Option<GameSession>> {
    let bytes = repo.get(SNAPSHOT_KEY)?;
    Ok(bytes.and_then(|bytes| SessionSnapshotCodec::decode(&bytes, now_ms)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryBlobRepository;
    use crate::session::state::HistoryEntry;
    use game_core::{
        Handicap, MoveCookie, Participant, Participants, PieceKind, Player, Ply, Square, Turn,
    };

    fn session() -> GameSession {
        let participants =
            Participants::new(Participant::human("Alice"), Participant::computer("Bob"));
        let mut session = GameSession::new(participants, Handicap::None, 2, 1_000);
        let ply = Ply::board_move(
            PieceKind::Pawn,
            Square::new(6, 6).unwrap(),
            Square::new(6, 5).unwrap(),
        );
        session.history.push(HistoryEntry::new(ply, Some(MoveCookie(7))));
        session.history.push(HistoryEntry::imported(Ply::drop(
            PieceKind::Pawn,
            Square::new(4, 4).unwrap(),
        )));
        session.turn = Turn::White;
        session.clocks.switch_to(Turn::Black, 1_000);
        session.clocks.switch_to(Turn::White, 6_000);
        session
    }

    #[test]
    fn decode_restores_fields_and_restarts_turn_holder_clock() {
        let original = session();
        let bytes = SessionSnapshotCodec::encode(&original).unwrap();
        assert_eq!(&bytes[..4], &SNAPSHOT_VERSION.to_le_bytes());

        let restored = SessionSnapshotCodec::decode(&bytes, 100_000).unwrap();
        assert!(restored.plies().eq(original.plies()));
        assert_eq!(restored.turn, Turn::White);
        assert_eq!(restored.undos_remaining, 2);
        assert_eq!(restored.start_time_ms, 1_000);
        assert_eq!(restored.clocks.total(Player::Black), 5_000);
        assert_eq!(restored.clocks.running_player(), Some(Player::White));
        // The gap between the write and the restore is never charged.
        assert_eq!(restored.clocks.live_total(Player::White, 100_500), 500);
    }

    #[test]
    fn decode_drops_engine_cookies() {
        let original = session();
        assert_eq!(original.history[0].cookie, Some(MoveCookie(7)));

        let bytes = SessionSnapshotCodec::encode(&original).unwrap();
        let restored = SessionSnapshotCodec::decode(&bytes, 0).unwrap();
        assert!(restored.history.iter().all(|entry| entry.cookie.is_none()));
    }

    #[test]
    fn foreign_version_is_treated_as_absent() {
        let mut bytes = SessionSnapshotCodec::encode(&session()).unwrap();
        bytes[0] ^= 0xFF;
        assert!(SessionSnapshotCodec::decode(&bytes, 0).is_none());
        assert!(SessionSnapshotCodec::decode(&[0x01, 0x00], 0).is_none());
    }

    #[test]
    fn truncated_payload_is_treated_as_absent() {
        let bytes = SessionSnapshotCodec::encode(&session()).unwrap();
        assert!(SessionSnapshotCodec::decode(&bytes[..bytes.len() / 2], 0).is_none());
    }

    #[test]
    fn load_session_reads_current_game_key() {
        let repo = InMemoryBlobRepository::new();
        assert!(load_session(&repo, 0).unwrap().is_none());

        let bytes = SessionSnapshotCodec::encode(&session()).unwrap();
        repo.put(SNAPSHOT_KEY, &bytes).unwrap();
        let restored = load_session(&repo, 50).unwrap().unwrap();
        assert_eq!(restored.history.len(), 2);
    }
}
