//! Protocol error types.

use derive_more::{Display, Error};
use std::io;
use tracing::instrument;

/// What went wrong during a session.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ProtocolErrorKind {
    /// Send or receive failed, timed out, or the peer hung up.
    #[display("Transport fault: {}", _0)]
    Transport(String),
    /// The peer sent something the current protocol state cannot interpret.
    #[display("Protocol desync: {}", _0)]
    Desync(String),
    /// Reading from or writing to the local terminal failed.
    #[display("Terminal error: {}", _0)]
    Terminal(String),
    /// The local terminal reached end of input while a prompt was open.
    #[display("Terminal input closed")]
    InputClosed,
}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct ProtocolError {
    /// Error category.
    pub kind: ProtocolErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProtocolError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: ProtocolErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Transport fault.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Transport(message.into()))
    }

    /// Unexpected payload from the peer.
    #[track_caller]
    pub fn desync(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Desync(message.into()))
    }

    /// Terminal I/O failure.
    #[track_caller]
    pub fn terminal(err: io::Error) -> Self {
        Self::new(ProtocolErrorKind::Terminal(err.to_string()))
    }

    /// Terminal input exhausted.
    #[track_caller]
    pub fn input_closed() -> Self {
        Self::new(ProtocolErrorKind::InputClosed)
    }

    /// True for malformed or out-of-sequence peer payloads.
    pub fn is_desync(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::Desync(_))
    }

    /// True for send/receive failures.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::Transport(_))
    }
}

impl From<io::Error> for ProtocolError {
    #[track_caller]
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                Self::transport("receive timed out")
            }
            io::ErrorKind::UnexpectedEof => Self::transport("connection closed by peer"),
            _ => Self::transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_transport() {
        let err: ProtocolError = io::Error::from(io::ErrorKind::WouldBlock).into();
        assert_eq!(
            err.kind,
            ProtocolErrorKind::Transport("receive timed out".to_string())
        );
    }

    #[test]
    fn test_location_is_recorded() {
        let err = ProtocolError::desync("bad move");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.is_desync());
        assert!(!err.is_transport());
        assert!(err.to_string().starts_with("Protocol desync: bad move at "));
    }
}
