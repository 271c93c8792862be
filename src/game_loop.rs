//! Turn state machine for a single game.
//!
//! ```text
//! LocalTurn ─▶ LocalEvaluate ─▶ RemoteTurn ─▶ RemoteEvaluate ─┐
//!     ▲              │                              │          │
//!     │              ▼                              ▼          │
//!     │          Terminated ◀───────────────────────┘          │
//!     └────────────────────────────────────────────────────────┘
//! ```
//!
//! Both peers run the same machine with opposite starting turns, which is
//! what lets them interpret untagged payloads.

use crate::terminal::parse_move_code;
use crate::{Connection, Identities, Message, ProtocolError, Role, Stream, Terminal};
use crosswire_board::{BoardEngine, Outcome, Position};
use tracing::{debug, info, instrument};

const MOVE_PROMPT: &str =
    "Please enter the row and column you want to choose (if you want top left, you would enter \"11\"): ";

/// Where a game currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnState {
    /// Acquire, apply and send a local move.
    LocalTurn,
    /// Check whether the local move ended the game.
    LocalEvaluate,
    /// Receive and apply the peer's move.
    RemoteTurn,
    /// Check whether the peer's move ended the game.
    RemoteEvaluate,
    /// The game is over.
    Terminated(Outcome),
}

impl TurnState {
    /// The finished outcome, if any.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            TurnState::Terminated(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Drives one game over an established, handshaken connection.
pub struct GameLoop<'a, S: Stream, E: BoardEngine, T: Terminal> {
    connection: &'a mut Connection<S>,
    engine: &'a mut E,
    terminal: &'a mut T,
    identities: &'a Identities,
    state: TurnState,
}

impl<'a, S: Stream, E: BoardEngine, T: Terminal> GameLoop<'a, S, E, T> {
    /// Prepares a game in the role's opening state.
    pub fn new(
        connection: &'a mut Connection<S>,
        engine: &'a mut E,
        terminal: &'a mut T,
        identities: &'a Identities,
        role: Role,
    ) -> Self {
        Self {
            connection,
            engine,
            terminal,
            identities,
            state: role.opening_state(),
        }
    }

    /// Current state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Performs one transition and returns the new state.
    ///
    /// Stepping a terminated game is a no-op.
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn step(&mut self) -> Result<TurnState, ProtocolError> {
        self.state = match self.state {
            TurnState::LocalTurn => {
                let pos = acquire_move(&mut *self.terminal, &*self.engine)?;
                self.engine.update_game_board(pos);
                self.connection.send(&Message::Move(pos))?;
                self.engine.set_last_move(self.identities.local().as_str());
                self.terminal.say(&self.engine.render())?;
                TurnState::LocalEvaluate
            }
            TurnState::LocalEvaluate => self.evaluate(Outcome::LocalWin, TurnState::RemoteTurn),
            TurnState::RemoteTurn => {
                self.terminal.say("Waiting for opponent to move...")?;
                let pos = self.connection.recv_move()?;
                if !self.engine.is_empty(pos) {
                    return Err(ProtocolError::desync(format!(
                        "peer played occupied cell {}",
                        pos
                    )));
                }
                self.engine.update_game_board(pos);
                self.engine.set_last_move(self.identities.remote().as_str());
                self.terminal.say(&self.engine.render())?;
                TurnState::RemoteEvaluate
            }
            TurnState::RemoteEvaluate => self.evaluate(Outcome::RemoteWin, TurnState::LocalTurn),
            terminated @ TurnState::Terminated(_) => terminated,
        };
        Ok(self.state)
    }

    /// Steps until the game ends.
    #[instrument(skip(self), fields(local = %self.identities.local(), remote = %self.identities.remote()))]
    pub fn run(mut self) -> Result<Outcome, ProtocolError> {
        loop {
            if let Some(outcome) = self.step()?.outcome() {
                info!(%outcome, "Game over");
                return Ok(outcome);
            }
        }
    }

    /// Termination check after a move. A win goes to whoever just moved;
    /// otherwise a full board is a draw.
    fn evaluate(&mut self, win: Outcome, next: TurnState) -> TurnState {
        let outcome = if self.engine.is_winner() {
            win
        } else if self.engine.board_is_full() {
            Outcome::Draw
        } else {
            return next;
        };
        self.engine.record_outcome(outcome);
        TurnState::Terminated(outcome)
    }
}

/// Prompts until the player names an empty cell.
#[instrument(skip_all)]
pub fn acquire_move<T: Terminal, E: BoardEngine>(
    terminal: &mut T,
    engine: &E,
) -> Result<Position, ProtocolError> {
    loop {
        let code = terminal.ask(MOVE_PROMPT)?;
        let Some(pos) = parse_move_code(&code) else {
            debug!(%code, "Rejected move code");
            terminal.say("Not a valid row/column.")?;
            continue;
        };
        if engine.is_empty(pos) {
            return Ok(pos);
        }
        debug!(%pos, "Cell taken");
        terminal.say("Space is already taken. Please Try again.")?;
    }
}
