//! Concrete board engine with session statistics.

use crate::{Board, BoardEngine, Mark, Outcome, Position, Square, check_winner, is_full};
use derive_getters::Getters;
use tracing::{debug, instrument};

/// Cumulative results for one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct Stats {
    /// Games started.
    games: u32,
    /// Games the local player won.
    wins: u32,
    /// Games the remote player won.
    losses: u32,
    /// Games that filled the board with no line.
    draws: u32,
}

/// Grid plus the bookkeeping a two-player session needs.
///
/// Marks alternate starting with X at the beginning of every game, so the
/// peer that moves first always plays X.
#[derive(Debug, Clone, Getters)]
pub struct GameBoard {
    /// The grid.
    board: Board,
    /// Mark that the next `update_game_board` call places.
    next_mark: Mark,
    /// Local player's name.
    local_name: String,
    /// Remote player's name.
    remote_name: String,
    /// Name attached to the most recent move.
    last_move: Option<String>,
    /// Session statistics.
    stats: Stats,
}

impl GameBoard {
    /// Creates an empty board for a session between two named players.
    #[instrument(skip_all, fields(local = %local_name.as_ref(), remote = %remote_name.as_ref()))]
    pub fn new(local_name: impl AsRef<str>, remote_name: impl AsRef<str>) -> Self {
        Self {
            board: Board::new(),
            next_mark: Mark::X,
            local_name: local_name.as_ref().to_string(),
            remote_name: remote_name.as_ref().to_string(),
            last_move: None,
            stats: Stats::default(),
        }
    }
}

impl BoardEngine for GameBoard {
    fn is_empty(&self, pos: Position) -> bool {
        self.board.is_empty(pos)
    }

    #[instrument(skip(self), fields(mark = %self.next_mark))]
    fn update_game_board(&mut self, pos: Position) {
        self.board.set(pos, Square::Occupied(self.next_mark));
        self.next_mark = self.next_mark.opponent();
    }

    fn set_last_move(&mut self, identity: &str) {
        self.last_move = Some(identity.to_string());
    }

    fn is_winner(&self) -> bool {
        check_winner(&self.board).is_some()
    }

    fn board_is_full(&self) -> bool {
        is_full(&self.board)
    }

    #[instrument(skip(self))]
    fn reset_game_board(&mut self) {
        self.board.clear();
        self.next_mark = Mark::X;
    }

    fn update_total_games(&mut self) {
        self.stats.games += 1;
        debug!(games = self.stats.games, "Game counter incremented");
    }

    #[instrument(skip(self))]
    fn record_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::LocalWin => self.stats.wins += 1,
            Outcome::RemoteWin => self.stats.losses += 1,
            Outcome::Draw => self.stats.draws += 1,
        }
    }

    fn render(&self) -> String {
        format!(
            "Current Board (Opponent: {}):\n{}",
            self.remote_name,
            self.board.display()
        )
    }

    fn render_stats(&self) -> String {
        let last = self.last_move.as_deref().unwrap_or("nobody");
        format!(
            "Player: {}\nOpponent: {}\nLast move by: {}\nGames played: {}\nWins: {}\nLosses: {}\nDraws: {}\n",
            self.local_name,
            self.remote_name,
            last,
            self.stats.games,
            self.stats.wins,
            self.stats.losses,
            self.stats.draws,
        )
    }
}
