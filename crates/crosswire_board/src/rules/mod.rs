//! Pure rules over a [`Board`](crate::Board).

mod draw;
mod win;

pub use draw::is_full;
pub use win::check_winner;
