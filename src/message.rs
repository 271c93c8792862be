//! Tagged message envelope and its wire encoding.
//!
//! The wire format carries no type tags: both peers track the same turn
//! state and know which payload comes next. Inside the process every
//! payload is a [`Message`] so the expected kind is explicit at every
//! receive site.
//!
//! | Message  | Bytes on the wire                            |
//! |----------|----------------------------------------------|
//! | identity | raw UTF-8 name                               |
//! | move     | two ASCII digits, zero-indexed row then col  |
//! | rematch  | `Play Again` or `Fun Times`                  |

use crate::{Identity, ProtocolError};
use crosswire_board::Position;
use tracing::instrument;

/// Upper bound for a single identity read.
pub const IDENTITY_BUFFER: usize = 1024;

/// Length of a move payload.
pub const MOVE_LEN: usize = 2;

/// Token sent when the local player wants another game.
pub const PLAY_AGAIN: &[u8] = b"Play Again";

/// Token sent when the local player is done.
pub const FUN_TIMES: &[u8] = b"Fun Times";

/// Rematch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Decision {
    /// Start another game on the same connection.
    #[display("continue")]
    Continue,
    /// Close the connection.
    #[display("stop")]
    Stop,
}

impl Decision {
    /// Literal wire token for this decision.
    pub fn token(self) -> &'static [u8] {
        match self {
            Decision::Continue => PLAY_AGAIN,
            Decision::Stop => FUN_TIMES,
        }
    }

    /// Parses a complete wire token.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        match token {
            PLAY_AGAIN => Some(Decision::Continue),
            FUN_TIMES => Some(Decision::Stop),
            _ => None,
        }
    }
}

/// Which payload the protocol state expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MessageKind {
    /// Player name.
    #[display("identity")]
    Identity,
    /// Two-digit move code.
    #[display("move")]
    Move,
    /// Rematch token.
    #[display("rematch")]
    Rematch,
}

/// One protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Player name sent once per connection.
    Identity(Identity),
    /// A cell played this turn.
    Move(Position),
    /// Post-game decision.
    Rematch(Decision),
}

impl Message {
    /// Tag of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Identity(_) => MessageKind::Identity,
            Message::Move(_) => MessageKind::Move,
            Message::Rematch(_) => MessageKind::Rematch,
        }
    }

    /// Bytes placed on the wire.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Message::Identity(identity) => identity.as_str().as_bytes().to_vec(),
            Message::Move(pos) => encode_move(*pos).to_vec(),
            Message::Rematch(decision) => decision.token().to_vec(),
        }
    }
}

/// Encodes a cell as two zero-indexed ASCII digits.
pub fn encode_move(pos: Position) -> [u8; MOVE_LEN] {
    [b'0' + pos.row(), b'0' + pos.col()]
}

/// Decodes a two-digit move payload.
///
/// Anything other than exactly two digits naming a cell on the board is a
/// desync.
#[instrument(skip(payload), fields(payload = %String::from_utf8_lossy(payload)))]
pub fn decode_move(payload: &[u8]) -> Result<Position, ProtocolError> {
    let [row, col] = payload else {
        return Err(ProtocolError::desync(format!(
            "move payload must be {} bytes, got {}",
            MOVE_LEN,
            payload.len()
        )));
    };
    if !row.is_ascii_digit() || !col.is_ascii_digit() {
        return Err(ProtocolError::desync(format!(
            "move payload '{}' is not two digits",
            String::from_utf8_lossy(payload)
        )));
    }
    Position::from_row_col(row - b'0', col - b'0').ok_or_else(|| {
        ProtocolError::desync(format!(
            "move payload '{}' is off the board",
            String::from_utf8_lossy(payload)
        ))
    })
}

/// Decodes an identity payload.
#[instrument(skip(payload), fields(len = payload.len()))]
pub fn decode_identity(payload: &[u8]) -> Result<Identity, ProtocolError> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| ProtocolError::desync(format!("identity is not valid UTF-8: {}", e)))?;
    Identity::new(text)
        .ok_or_else(|| ProtocolError::desync(format!("identity '{}' is not alphanumeric", text)))
}
