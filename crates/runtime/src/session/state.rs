//! Authoritative state of one game session.

use serde::{Deserialize, Serialize};

use game_core::{
    Board, GameLog, GameState, Handicap, MoveCookie, Participants, Player, Ply, Turn,
};

/// One committed ply together with the engine cookie needed to undo it.
///
/// Plies and cookies live in one entry so the history can never hold a ply
/// without its (possibly absent) cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ply: Ply,
    pub cookie: Option<MoveCookie>,
}

impl HistoryEntry {
    pub fn new(ply: Ply, cookie: Option<MoveCookie>) -> Self {
        Self { ply, cookie }
    }

    /// Entry for a ply recorded outside the live engine.
    pub fn imported(ply: Ply) -> Self {
        Self { ply, cookie: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningClock {
    pub player: Player,
    pub started_at_ms: i64,
}

/// Per-player cumulative think time with at most one running clock.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkClocks {
    totals_ms: [u64; 2],
    running: Option<RunningClock>,
}

impl ThinkClocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed think time of `player`, excluding a running clock.
    pub fn total(&self, player: Player) -> u64 {
        self.totals_ms[player.index()]
    }

    /// Think time of `player` including the running clock up to `now_ms`.
    pub fn live_total(&self, player: Player, now_ms: i64) -> u64 {
        let running = match self.running {
            Some(clock) if clock.player == player => elapsed(clock.started_at_ms, now_ms),
            _ => 0,
        };
        self.total(player) + running
    }

    pub fn live_totals(&self, now_ms: i64) -> [u64; 2] {
        [
            self.live_total(Player::Black, now_ms),
            self.live_total(Player::White, now_ms),
        ]
    }

    pub fn running_player(&self) -> Option<Player> {
        self.running.map(|clock| clock.player)
    }

    /// Stop the running clock, adding its elapsed time to that player's total.
    pub fn stop(&mut self, now_ms: i64) {
        if let Some(clock) = self.running.take() {
            self.totals_ms[clock.player.index()] += elapsed(clock.started_at_ms, now_ms);
        }
    }

    /// Commit the running clock, then start the clock of `turn`'s player.
    pub fn switch_to(&mut self, turn: Turn, now_ms: i64) {
        self.stop(now_ms);
        self.running = turn.player().map(|player| RunningClock {
            player,
            started_at_ms: now_ms,
        });
    }

    /// Discard any running clock without charging it, then start `turn`'s
    /// clock at `now_ms`. Used when a session is restored so the time the
    /// process was away is never counted as thinking.
    pub fn restart_for(&mut self, turn: Turn, now_ms: i64) {
        self.running = turn.player().map(|player| RunningClock {
            player,
            started_at_ms: now_ms,
        });
    }
}

fn elapsed(started_at_ms: i64, now_ms: i64) -> u64 {
    u64::try_from(now_ms.saturating_sub(started_at_ms)).unwrap_or(0)
}

/// Board, history, turn, clocks and budget of one game.
///
/// Mutated only by [`SessionController`](super::SessionController).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub board: Board,
    pub history: Vec<HistoryEntry>,
    pub turn: Turn,
    pub state: GameState,
    pub clocks: ThinkClocks,
    pub undos_remaining: u32,
    pub start_time_ms: i64,
    pub participants: Participants,
    pub handicap: Handicap,
}

impl GameSession {
    /// Fresh game from the starting position of `handicap`.
    ///
    /// No clock runs until the controller starts the session.
    pub fn new(
        participants: Participants,
        handicap: Handicap,
        max_undos: u32,
        start_time_ms: i64,
    ) -> Self {
        Self {
            board: Board::initial(handicap),
            history: Vec::new(),
            turn: Turn::from(handicap.first_mover()),
            state: GameState::Active,
            clocks: ThinkClocks::new(),
            undos_remaining: max_undos,
            start_time_ms,
            participants,
            handicap,
        }
    }

    pub fn plies(&self) -> impl Iterator<Item = Ply> + '_ {
        self.history.iter().map(|entry| entry.ply)
    }

    pub fn last_ply(&self) -> Option<Ply> {
        self.history.last().map(|entry| entry.ply)
    }

    /// Archival record of the game played so far.
    pub fn to_game_log(&self) -> GameLog {
        let handicap = (self.handicap != Handicap::None).then(|| self.handicap.label().to_string());
        GameLog::new(
            self.start_time_ms,
            self.participants.get(Player::Black).name.clone(),
            self.participants.get(Player::White).name.clone(),
            self.plies().collect(),
        )
        .with_handicap(handicap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Participant, PieceKind, Square};

    fn participants() -> Participants {
        Participants::new(Participant::human("Alice"), Participant::computer("Bob"))
    }

    #[test]
    fn switching_commits_only_the_running_clock() {
        let mut clocks = ThinkClocks::new();
        clocks.switch_to(Turn::Black, 1_000);
        clocks.switch_to(Turn::White, 4_000);
        assert_eq!(clocks.total(Player::Black), 3_000);
        assert_eq!(clocks.running_player(), Some(Player::White));

        clocks.switch_to(Turn::None, 4_500);
        assert_eq!(clocks.total(Player::White), 500);
        assert_eq!(clocks.running_player(), None);

        clocks.stop(9_000);
        assert_eq!(clocks.live_totals(9_000), [3_000, 500]);
    }

    #[test]
    fn restart_discards_stored_start() {
        let mut clocks = ThinkClocks::new();
        clocks.switch_to(Turn::Black, 0);
        clocks.restart_for(Turn::Black, 60_000);
        assert_eq!(clocks.live_total(Player::Black, 61_000), 1_000);
    }

    #[test]
    fn clock_running_backwards_is_not_charged() {
        let mut clocks = ThinkClocks::new();
        clocks.switch_to(Turn::White, 5_000);
        clocks.stop(4_000);
        assert_eq!(clocks.total(Player::White), 0);
    }

    #[test]
    fn handicap_game_starts_with_white() {
        let session = GameSession::new(participants(), Handicap::Bishop, 3, 0);
        assert_eq!(session.turn, Turn::White);
        assert_eq!(session.state, GameState::Active);
    }

    #[test]
    fn game_log_carries_names_and_plies() {
        let mut session = GameSession::new(participants(), Handicap::None, 3, 42);
        let ply = Ply::board_move(
            PieceKind::Pawn,
            Square::new(6, 6).unwrap(),
            Square::new(6, 5).unwrap(),
        );
        session.history.push(HistoryEntry::new(ply, Some(MoveCookie(1))));

        let log = session.to_game_log();
        assert_eq!(log.start_time_ms(), 42);
        assert_eq!(log.black_player(), "Alice");
        assert_eq!(log.white_player(), "Bob");
        assert_eq!(log.plies(), &[ply]);
        assert_eq!(log.handicap(), None);
        assert!(log.is_in_memory());
    }
}
