//! Draw detection.

use crate::{Board, Square};
use tracing::instrument;

/// Checks if every square is occupied.
///
/// A full board with no winner is a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}
