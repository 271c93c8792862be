//! The nine cells of the board.

use tracing::instrument;

/// A cell on the board.
///
/// Rows and columns are zero-indexed here. Anything user-facing adds one at
/// the I/O boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Position {
    /// Row 0, column 0.
    TopLeft,
    /// Row 0, column 1.
    TopCenter,
    /// Row 0, column 2.
    TopRight,
    /// Row 1, column 0.
    MiddleLeft,
    /// Row 1, column 1.
    Center,
    /// Row 1, column 2.
    MiddleRight,
    /// Row 2, column 0.
    BottomLeft,
    /// Row 2, column 1.
    BottomCenter,
    /// Row 2, column 2.
    BottomRight,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Row-major board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates a position from a row-major board index.
    #[instrument]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-indexed row.
    pub fn row(self) -> u8 {
        (self.to_index() / 3) as u8
    }

    /// Zero-indexed column.
    pub fn col(self) -> u8 {
        (self.to_index() % 3) as u8
    }

    /// Creates a position from a zero-indexed row and column.
    ///
    /// Returns `None` when either coordinate is outside `0..=2`.
    #[instrument]
    pub fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if row > 2 || col > 2 {
            return None;
        }
        Self::from_index(usize::from(row) * 3 + usize::from(col))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
