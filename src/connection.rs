//! The single stream connection a session runs over.

use crate::message::{FUN_TIMES, IDENTITY_BUFFER, MOVE_LEN, PLAY_AGAIN};
use crate::{Decision, Identity, Message, MessageKind, ProtocolError, decode_identity, decode_move};
use crosswire_board::Position;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Byte stream a [`Connection`] can own.
///
/// Read timeouts and shutdown are optional capabilities; in-memory streams
/// keep the no-op defaults.
pub trait Stream: Read + Write {
    /// Bounds every subsequent blocking read. `None` blocks indefinitely.
    fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }

    /// Releases the underlying transport.
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Stream for TcpStream {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// A session with exactly one peer.
///
/// Sends and receives are strictly sequential. Every receive names the
/// message kind the protocol expects next. The stream is shut down once,
/// either by [`Connection::close`] or on drop.
#[derive(Debug)]
pub struct Connection<S: Stream> {
    stream: S,
    peer: String,
    closed: bool,
}

impl<S: Stream> Connection<S> {
    /// Wraps an open stream.
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            closed: false,
        }
    }

    /// Peer description for logs.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// The wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// True once the stream has been shut down.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bounds every blocking receive. `None` restores indefinite blocking.
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<(), ProtocolError> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Sends one message as a single payload.
    #[instrument(skip(self, message), fields(peer = %self.peer, kind = %message.kind()))]
    pub fn send(&mut self, message: &Message) -> Result<(), ProtocolError> {
        let bytes = message.encode();
        self.stream.write_all(&bytes)?;
        self.stream.flush()?;
        debug!(payload = %String::from_utf8_lossy(&bytes), "Sent");
        Ok(())
    }

    /// Receives the next message, interpreting the bytes as `kind`.
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub fn recv(&mut self, kind: MessageKind) -> Result<Message, ProtocolError> {
        let message = match kind {
            MessageKind::Identity => Message::Identity(self.read_identity()?),
            MessageKind::Move => Message::Move(self.read_move()?),
            MessageKind::Rematch => Message::Rematch(self.read_decision()?),
        };
        debug!(?message, "Received");
        Ok(message)
    }

    /// Receives the peer's name.
    pub fn recv_identity(&mut self) -> Result<Identity, ProtocolError> {
        match self.recv(MessageKind::Identity)? {
            Message::Identity(identity) => Ok(identity),
            other => Err(unexpected(MessageKind::Identity, &other)),
        }
    }

    /// Receives the peer's move.
    pub fn recv_move(&mut self) -> Result<Position, ProtocolError> {
        match self.recv(MessageKind::Move)? {
            Message::Move(pos) => Ok(pos),
            other => Err(unexpected(MessageKind::Move, &other)),
        }
    }

    /// Receives the peer's rematch decision.
    pub fn recv_decision(&mut self) -> Result<Decision, ProtocolError> {
        match self.recv(MessageKind::Rematch)? {
            Message::Rematch(decision) => Ok(decision),
            other => Err(unexpected(MessageKind::Rematch, &other)),
        }
    }

    /// Shuts the stream down. Later calls do nothing.
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub fn close(&mut self) -> Result<(), ProtocolError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!("Closing connection");
        self.stream.shutdown()?;
        Ok(())
    }

    /// One bounded read; the identity is whatever arrived in it.
    fn read_identity(&mut self) -> Result<Identity, ProtocolError> {
        let mut buf = [0u8; IDENTITY_BUFFER];
        let n = self.stream.read(&mut buf)?;
        if n == 0 {
            return Err(ProtocolError::transport("connection closed by peer"));
        }
        decode_identity(&buf[..n])
    }

    fn read_move(&mut self) -> Result<Position, ProtocolError> {
        let mut buf = [0u8; MOVE_LEN];
        self.stream.read_exact(&mut buf)?;
        decode_move(&buf)
    }

    /// Reads exactly one token. `Fun Times` is one byte shorter than
    /// `Play Again`, so the shorter length is read first and the final byte
    /// only when the prefix calls for it.
    fn read_decision(&mut self) -> Result<Decision, ProtocolError> {
        let mut buf = [0u8; PLAY_AGAIN.len()];
        let short = FUN_TIMES.len();
        self.stream.read_exact(&mut buf[..short])?;
        if buf[..short] == PLAY_AGAIN[..short] {
            self.stream.read_exact(&mut buf[short..])?;
            return decode_decision(&buf);
        }
        decode_decision(&buf[..short])
    }
}

impl<S: Stream> Drop for Connection<S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "Failed to close connection on drop");
        }
    }
}

fn decode_decision(token: &[u8]) -> Result<Decision, ProtocolError> {
    Decision::from_token(token).ok_or_else(|| {
        ProtocolError::desync(format!(
            "unknown rematch token '{}'",
            String::from_utf8_lossy(token)
        ))
    })
}

#[track_caller]
fn unexpected(expected: MessageKind, got: &Message) -> ProtocolError {
    ProtocolError::desync(format!("expected {} message, got {}", expected, got.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reads from a fixed script, records writes.
    #[derive(Debug, Default)]
    struct Loopback {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
        shutdowns: usize,
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Loopback {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Stream for Loopback {
        fn shutdown(&mut self) -> io::Result<()> {
            self.shutdowns += 1;
            Ok(())
        }
    }

    fn scripted(input: &[u8]) -> Connection<Loopback> {
        Connection::new(
            Loopback {
                input: Cursor::new(input.to_vec()),
                ..Default::default()
            },
            "test",
        )
    }

    #[test]
    fn test_back_to_back_tokens_do_not_merge() {
        let mut conn = scripted(b"Play Again01Fun Times");
        assert_eq!(conn.recv_decision().ok(), Some(Decision::Continue));
        assert_eq!(conn.recv_move().ok(), Some(Position::TopCenter));
        assert_eq!(conn.recv_decision().ok(), Some(Decision::Stop));
    }

    #[test]
    fn test_unknown_token_is_desync() {
        let mut conn = scripted(b"Play Later");
        assert!(conn.recv_decision().unwrap_err().is_desync());
    }

    #[test]
    fn test_eof_mid_move_is_transport() {
        let mut conn = scripted(b"1");
        assert!(conn.recv_move().unwrap_err().is_transport());
    }

    #[test]
    fn test_identity_eof_is_transport() {
        let mut conn = scripted(b"");
        assert!(conn.recv_identity().unwrap_err().is_transport());
    }

    #[test]
    fn test_send_writes_exact_bytes() {
        let mut conn = scripted(b"");
        conn.send(&Message::Move(Position::BottomLeft)).unwrap();
        conn.send(&Message::Rematch(Decision::Stop)).unwrap();
        assert_eq!(conn.get_ref().output, b"20Fun Times".to_vec());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut conn = scripted(b"");
        conn.close().unwrap();
        conn.close().unwrap();
        assert!(conn.is_closed());
        assert_eq!(conn.get_ref().shutdowns, 1);
    }
}
