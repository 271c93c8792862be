//! Core domain types for the grid.

use crate::position::Position;

/// Mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Mark {
    /// X (goes first).
    X,
    /// O (goes second).
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

/// 3x3 grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    /// Squares in row-major order.
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Empties every square.
    pub fn clear(&mut self) {
        self.squares = [Square::Empty; 9];
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Formats the board with 1-indexed row and column headers.
    pub fn display(&self) -> String {
        let mut result = String::from("    1   2   3\n");
        for row in 0..3u8 {
            result.push_str(&format!("{}  ", row + 1));
            for col in 0..3u8 {
                let symbol = match Position::from_row_col(row, col).map(|p| self.get(p)) {
                    Some(Square::Occupied(mark)) => mark.to_string(),
                    _ => " ".to_string(),
                };
                result.push(' ');
                result.push_str(&symbol);
                if col < 2 {
                    result.push_str(" |");
                }
            }
            result.push('\n');
            if row < 2 {
                result.push_str("   ---+---+---\n");
            }
        }
        result
    }
}
