//! Crosswire - two-player tic-tac-toe over a TCP stream.
//!
//! One process joins, the other hosts. After a name exchange the two peers
//! alternate moves, each tracking the same turn state machine, until a line
//! or a full board ends the game. The joining side then decides whether the
//! connection carries another game.
//!
//! # Architecture
//!
//! - **Establish**: dial with interactive retry, or accept one peer
//! - **Handshake**: one identity send and one identity receive
//! - **Game loop**: explicit [`TurnState`] machine over a [`BoardEngine`]
//! - **Rematch**: `Play Again` / `Fun Times` tokens
//! - **Session**: drives the above and closes the connection on every path
//!
//! # Example
//!
//! ```no_run
//! use crosswire::{Console, JoinSettings, TcpDialer, join};
//!
//! # fn example() -> Result<(), crosswire::ProtocolError> {
//! let mut console = Console::stdio();
//! let report = join(&mut TcpDialer::default(), &mut console, &JoinSettings::default())?;
//! if let Some(report) = report {
//!     println!("{} games played", report.outcomes().len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod connection;
mod error;
mod establish;
mod game_loop;
mod handshake;
mod identity;
mod message;
mod rematch;
mod role;
mod session;
mod terminal;

// Crate-level exports - Configuration
pub use config::{ConfigError, PeerConfig};

// Crate-level exports - Transport
pub use connection::{Connection, Stream};
pub use establish::{Dialer, Endpoint, Established, RetryPolicy, TcpDialer, accept_one, establish};

// Crate-level exports - Errors
pub use error::{ProtocolError, ProtocolErrorKind};

// Crate-level exports - Protocol
pub use game_loop::{GameLoop, TurnState, acquire_move};
pub use handshake::exchange;
pub use identity::{Identities, Identity};
pub use message::{
    Decision, FUN_TIMES, IDENTITY_BUFFER, MOVE_LEN, Message, MessageKind, PLAY_AGAIN,
    decode_identity, decode_move, encode_move,
};
pub use rematch::{await_decision, negotiate};
pub use role::Role;

// Crate-level exports - Drivers
pub use session::{HostSettings, JoinSettings, SessionReport, host, join, play_session};

// Crate-level exports - Terminal
pub use terminal::{
    Console, Terminal, move_code, parse_move_code, prompt_decision, prompt_endpoint,
    prompt_identity, prompt_port,
};

// Board engine re-exports
pub use crosswire_board::{BoardEngine, GameBoard, Outcome, Position, Stats};
