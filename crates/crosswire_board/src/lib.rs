//! Tic-tac-toe board engine.
//!
//! Owns grid state and answers the questions a networked game loop needs:
//! is a cell free, has somebody won, is the board full. The engine also
//! keeps per-session statistics and renders the board as text.
//!
//! # Architecture
//!
//! - **Types**: [`Board`], [`Square`], [`Mark`], [`Position`]
//! - **Rules**: pure win and draw detection over a [`Board`]
//! - **Engine**: the [`BoardEngine`] capability trait and its [`GameBoard`]
//!   implementation

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod engine;
mod position;
mod rules;
mod types;

pub use board::{GameBoard, Stats};
pub use engine::{BoardEngine, Outcome};
pub use position::Position;
pub use rules::{check_winner, is_full};
pub use types::{Board, Mark, Square};
