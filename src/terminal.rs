//! Interactive prompts.
//!
//! Everything the player types goes through a [`Terminal`]. Validation loops
//! live here and never surface rejected input as an error; only a failing or
//! exhausted terminal does.

use crate::{Decision, Endpoint, Identity, ProtocolError};
use crosswire_board::Position;
use std::io::{self, BufRead, Stdin, Stdout, Write};
use tracing::{debug, instrument};

/// Line-oriented player I/O.
pub trait Terminal {
    /// Shows `prompt` and returns the next line without its terminator.
    fn ask(&mut self, prompt: &str) -> Result<String, ProtocolError>;

    /// Shows a line of text.
    fn say(&mut self, text: &str) -> Result<(), ProtocolError>;
}

/// [`Terminal`] over any buffered reader and writer.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console from an input and an output.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl Console<io::BufReader<Stdin>, Stdout> {
    /// Console on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal for Console<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String, ProtocolError> {
        write!(self.output, "{}", prompt).map_err(ProtocolError::terminal)?;
        self.output.flush().map_err(ProtocolError::terminal)?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(ProtocolError::terminal)?;
        if n == 0 {
            return Err(ProtocolError::input_closed());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: &str) -> Result<(), ProtocolError> {
        writeln!(self.output, "{}", text).map_err(ProtocolError::terminal)?;
        self.output.flush().map_err(ProtocolError::terminal)
    }
}

/// Asks for a host address and port until both parse.
#[instrument(skip(terminal))]
pub fn prompt_endpoint(terminal: &mut impl Terminal) -> Result<Endpoint, ProtocolError> {
    let host = loop {
        let host = terminal.ask("Enter host ip address: ")?;
        let host = host.trim();
        if !host.is_empty() {
            break host.to_string();
        }
        terminal.say("Please enter an address.")?;
    };
    let port = prompt_port(terminal, "Enter host port number: ")?;
    Ok(Endpoint::new(host, port))
}

/// Asks for a TCP port until one parses.
#[instrument(skip(terminal))]
pub fn prompt_port(terminal: &mut impl Terminal, question: &str) -> Result<u16, ProtocolError> {
    loop {
        match terminal.ask(question)?.trim().parse::<u16>() {
            Ok(port) => return Ok(port),
            Err(e) => {
                debug!(error = %e, "Rejected port");
                terminal.say("Not a valid port number.")?;
            }
        }
    }
}

/// Asks for a username until it is alphanumeric.
#[instrument(skip(terminal))]
pub fn prompt_identity(terminal: &mut impl Terminal) -> Result<Identity, ProtocolError> {
    let mut question = "Please enter your username (only alphanumeric): ";
    loop {
        if let Some(identity) = Identity::new(terminal.ask(question)?) {
            return Ok(identity);
        }
        terminal.say("Please only enter alphanumeric usernames.")?;
        question = "Please enter your username: ";
    }
}

/// Asks a yes/no question until the answer is `y` or `n`.
#[instrument(skip(terminal))]
pub fn prompt_decision(
    terminal: &mut impl Terminal,
    question: &str,
) -> Result<Decision, ProtocolError> {
    loop {
        match terminal.ask(question)?.trim().to_lowercase().as_str() {
            "y" => return Ok(Decision::Continue),
            "n" => return Ok(Decision::Stop),
            _ => terminal.say("Invalid input.")?,
        }
    }
}

/// Parses a user-facing move code.
///
/// Codes are 1-indexed row then column, so `"11"` is the top-left cell and
/// `"33"` the bottom-right. Anything that is not exactly two characters from
/// `1..=3` is rejected.
pub fn parse_move_code(code: &str) -> Option<Position> {
    let [row, col] = code.as_bytes() else {
        return None;
    };
    if !(b'1'..=b'3').contains(row) || !(b'1'..=b'3').contains(col) {
        return None;
    }
    Position::from_row_col(row - b'1', col - b'1')
}

/// User-facing code for a cell, the inverse of [`parse_move_code`].
pub fn move_code(pos: Position) -> String {
    format!("{}{}", pos.row() + 1, pos.col() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(script: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_move_code_mapping() {
        assert_eq!(parse_move_code("11"), Some(Position::TopLeft));
        assert_eq!(parse_move_code("33"), Some(Position::BottomRight));
        assert_eq!(parse_move_code("31"), Some(Position::BottomLeft));
        assert_eq!(move_code(Position::MiddleRight), "23");
    }

    #[test]
    fn test_move_code_rejections() {
        for code in ["44", "10", "1", "111", "", "a1", " 11"] {
            assert_eq!(parse_move_code(code), None, "code {:?}", code);
        }
    }

    #[test]
    fn test_decision_reprompts_until_valid() {
        let mut term = console("maybe\nY\n");
        assert_eq!(prompt_decision(&mut term, "Again? ").ok(), Some(Decision::Continue));
        let out = String::from_utf8_lossy(term.output()).to_string();
        assert_eq!(out.matches("Again? ").count(), 2);
        assert!(out.contains("Invalid input."));
    }

    #[test]
    fn test_identity_reprompts_on_symbols() {
        let mut term = console("bad name\nalice\n");
        let identity = prompt_identity(&mut term).unwrap();
        assert_eq!(identity.as_str(), "alice");
    }

    #[test]
    fn test_endpoint_reprompts_bad_port() {
        let mut term = console("127.0.0.1\n99999\n4000\n");
        let endpoint = prompt_endpoint(&mut term).unwrap();
        assert_eq!(endpoint.to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_eof_is_input_closed() {
        let mut term = console("");
        let err = term.ask("anything? ").unwrap_err();
        assert_eq!(err.kind, crate::ProtocolErrorKind::InputClosed);
    }
}
