//! Post-game decision exchange.
//!
//! Only the joining side decides. It sends its token and acts on it without
//! waiting for an answer; the hosting side reads the token and follows.

use crate::terminal::prompt_decision;
use crate::{Connection, Decision, Message, ProtocolError, Stream, Terminal};
use tracing::{info, instrument};

/// Asks the local player and sends the matching token.
#[instrument(skip_all, fields(peer = %connection.peer()))]
pub fn negotiate<S: Stream, T: Terminal>(
    connection: &mut Connection<S>,
    terminal: &mut T,
) -> Result<Decision, ProtocolError> {
    let decision = prompt_decision(terminal, "Would you like to play another game (y/n): ")?;
    connection.send(&Message::Rematch(decision))?;
    info!(%decision, "Rematch decision sent");
    Ok(decision)
}

/// Waits for the peer's token.
#[instrument(skip_all, fields(peer = %connection.peer()))]
pub fn await_decision<S: Stream, T: Terminal>(
    connection: &mut Connection<S>,
    terminal: &mut T,
) -> Result<Decision, ProtocolError> {
    terminal.say("Waiting for opponent to decide on another game...")?;
    let decision = connection.recv_decision()?;
    info!(%decision, "Rematch decision received");
    terminal.say(match decision {
        Decision::Continue => "Your opponent wants to play again.",
        Decision::Stop => "Your opponent has left the table.",
    })?;
    Ok(decision)
}
