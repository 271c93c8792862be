//! Capability interface consumed by the networked game loop.

use crate::Position;

/// How a finished game ended, seen from the local player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Outcome {
    /// The local player completed a line.
    #[display("You win!")]
    LocalWin,
    /// The remote player completed a line.
    #[display("Your opponent wins.")]
    RemoteWin,
    /// Board filled up with no line.
    #[display("It's a draw.")]
    Draw,
}

/// Board state owner as seen by a game loop.
///
/// The loop never touches cells directly. It asks for legality and
/// termination, applies moves, and delegates attribution, statistics and
/// rendering to the engine.
pub trait BoardEngine {
    /// True when nobody has played at `pos` this game.
    fn is_empty(&self, pos: Position) -> bool;

    /// Places the next mark at `pos`. Attribution is recorded separately
    /// through [`BoardEngine::set_last_move`].
    fn update_game_board(&mut self, pos: Position);

    /// Records who made the most recent move.
    fn set_last_move(&mut self, identity: &str);

    /// True when some mark holds a full line.
    fn is_winner(&self) -> bool;

    /// True when every cell is occupied.
    fn board_is_full(&self) -> bool;

    /// Clears every cell for a new game.
    fn reset_game_board(&mut self);

    /// Counts one more game played on this connection.
    fn update_total_games(&mut self);

    /// Tallies a finished game into the session statistics.
    fn record_outcome(&mut self, outcome: Outcome);

    /// Current board as text.
    fn render(&self) -> String;

    /// Cumulative session statistics as text.
    fn render_stats(&self) -> String;
}
