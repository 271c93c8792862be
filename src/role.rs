//! Which end of the connection this process is.

use crate::TurnState;

/// Side of the connection.
///
/// The joining side dials, moves first in every game, and decides whether a
/// rematch happens. The hosting side listens and follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Role {
    /// Dials the peer.
    #[display("join")]
    Join,
    /// Accepts the peer.
    #[display("host")]
    Host,
}

impl Role {
    /// Turn state every new game starts in.
    pub fn opening_state(self) -> TurnState {
        match self {
            Role::Join => TurnState::LocalTurn,
            Role::Host => TurnState::RemoteTurn,
        }
    }
}
