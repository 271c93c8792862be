//! Shared fixtures: a scripted in-memory stream, a scripted console and a
//! board engine that records every call.

#![allow(dead_code)]

use crosswire::{BoardEngine, Console, GameBoard, Outcome, Position, Stream};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;
use std::time::Duration;

/// Bytes in both directions plus shutdown count.
#[derive(Debug, Default)]
pub struct Wire {
    /// Payloads the peer has sent and we have not read yet. A single read
    /// never crosses from one payload into the next.
    pub inbound: VecDeque<Vec<u8>>,
    /// Bytes we have sent.
    pub outbound: Vec<u8>,
    /// Number of shutdown calls.
    pub shutdowns: usize,
    /// Number of read calls that returned data.
    pub reads: usize,
    /// Last receive bound the connection asked for.
    pub read_timeout: Option<Duration>,
    /// When set, reading past the scripted payloads times out instead of
    /// reporting end of stream.
    pub stall: bool,
}

/// In-memory stream over a shared [`Wire`].
#[derive(Debug, Clone)]
pub struct ScriptedStream(pub Rc<RefCell<Wire>>);

impl ScriptedStream {
    /// Stream whose peer has already sent `inbound` as one payload.
    pub fn new(inbound: &[u8]) -> (Self, Rc<RefCell<Wire>>) {
        Self::with_inbound(vec![inbound.to_vec()])
    }

    /// Stream whose peer has already sent each of `payloads` separately.
    pub fn payloads(payloads: &[&str]) -> (Self, Rc<RefCell<Wire>>) {
        Self::with_inbound(payloads.iter().map(|p| p.as_bytes().to_vec()).collect())
    }

    /// Stream whose peer sends `payloads` and then goes silent.
    pub fn stalling(payloads: &[&str]) -> (Self, Rc<RefCell<Wire>>) {
        let (stream, wire) = Self::payloads(payloads);
        wire.borrow_mut().stall = true;
        (stream, wire)
    }

    fn with_inbound(inbound: Vec<Vec<u8>>) -> (Self, Rc<RefCell<Wire>>) {
        let wire = Rc::new(RefCell::new(Wire {
            inbound: inbound.into_iter().filter(|p| !p.is_empty()).collect(),
            ..Default::default()
        }));
        (Self(wire.clone()), wire)
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut wire = self.0.borrow_mut();
        let stall = wire.stall;
        let Some(front) = wire.inbound.front_mut() else {
            if stall {
                return Err(io::Error::from(io::ErrorKind::WouldBlock));
            }
            return Ok(0);
        };
        let n = buf.len().min(front.len());
        buf[..n].copy_from_slice(&front[..n]);
        front.drain(..n);
        if front.is_empty() {
            wire.inbound.pop_front();
        }
        wire.reads += 1;
        Ok(n)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().outbound.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Stream for ScriptedStream {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.0.borrow_mut().read_timeout = timeout;
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.0.borrow_mut().shutdowns += 1;
        Ok(())
    }
}

/// Console fed from `lines`, writing into memory.
pub type ScriptedConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

/// Console that answers prompts with `lines` in order.
pub fn console(lines: &[&str]) -> ScriptedConsole {
    let mut script = String::new();
    for line in lines {
        script.push_str(line);
        script.push('\n');
    }
    Console::new(Cursor::new(script.into_bytes()), Vec::new())
}

/// Everything a console printed.
pub fn printed(console: &ScriptedConsole) -> String {
    String::from_utf8_lossy(console.output()).to_string()
}

/// [`GameBoard`] that logs every capability call.
#[derive(Debug)]
pub struct RecordingEngine {
    /// Real engine doing the work.
    pub inner: GameBoard,
    /// Calls in order, e.g. `"update(Center)"`.
    pub calls: Vec<String>,
}

impl RecordingEngine {
    /// Engine for a session between two names.
    pub fn new(local: &str, remote: &str) -> Self {
        Self {
            inner: GameBoard::new(local, remote),
            calls: Vec::new(),
        }
    }

    /// Calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl BoardEngine for RecordingEngine {
    fn is_empty(&self, pos: Position) -> bool {
        self.inner.is_empty(pos)
    }

    fn update_game_board(&mut self, pos: Position) {
        self.calls.push(format!("update({:?})", pos));
        self.inner.update_game_board(pos);
    }

    fn set_last_move(&mut self, identity: &str) {
        self.calls.push(format!("last_move({})", identity));
        self.inner.set_last_move(identity);
    }

    fn is_winner(&self) -> bool {
        self.inner.is_winner()
    }

    fn board_is_full(&self) -> bool {
        self.inner.board_is_full()
    }

    fn reset_game_board(&mut self) {
        self.calls.push("reset".to_string());
        self.inner.reset_game_board();
    }

    fn update_total_games(&mut self) {
        self.calls.push("total_games".to_string());
        self.inner.update_total_games();
    }

    fn record_outcome(&mut self, outcome: Outcome) {
        self.calls.push(format!("outcome({:?})", outcome));
        self.inner.record_outcome(outcome);
    }

    fn render(&self) -> String {
        self.inner.render()
    }

    fn render_stats(&self) -> String {
        self.inner.render_stats()
    }
}
