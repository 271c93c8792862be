//! Top-level drivers: connect, handshake, play games until someone stops,
//! close.

use crate::establish::{Established, accept_one, establish};
use crate::rematch::{await_decision, negotiate};
use crate::terminal::prompt_identity;
use crate::{
    Connection, Decision, Dialer, Endpoint, GameLoop, Identities, Identity, ProtocolError,
    RetryPolicy, Role, Stream, Terminal, exchange,
};
use crosswire_board::{BoardEngine, GameBoard, Outcome};
use derive_getters::Getters;
use std::net::TcpListener;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Everything the joining side needs before it starts prompting.
#[derive(Debug, Clone, Default, Getters, derive_new::new)]
pub struct JoinSettings {
    /// Endpoint for the first attempt. Prompted when absent.
    endpoint: Option<Endpoint>,
    /// Local player's name. Prompted when absent.
    name: Option<Identity>,
    /// Establishment attempt budget.
    policy: RetryPolicy,
    /// Bound on each receive once connected.
    read_timeout: Option<Duration>,
}

/// Everything the hosting side needs before it starts prompting.
#[derive(Debug, Clone, Default, Getters, derive_new::new)]
pub struct HostSettings {
    /// Local player's name. Prompted when absent.
    name: Option<Identity>,
    /// Bound on each receive once connected.
    read_timeout: Option<Duration>,
}

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SessionReport {
    /// Both names.
    identities: Identities,
    /// Outcome of every game, in order.
    outcomes: Vec<Outcome>,
}

/// Plays games on an open, handshaken connection until a stop decision.
///
/// Every game starts from a cleared board with the game counter bumped.
/// Session statistics are rendered once at the end.
#[instrument(skip_all, fields(role = %role, peer = %connection.peer()))]
pub fn play_session<S, E, T>(
    connection: &mut Connection<S>,
    engine: &mut E,
    terminal: &mut T,
    identities: &Identities,
    role: Role,
) -> Result<Vec<Outcome>, ProtocolError>
where
    S: Stream,
    E: BoardEngine,
    T: Terminal,
{
    let mut outcomes = Vec::new();
    loop {
        engine.reset_game_board();
        engine.update_total_games();
        terminal.say(&engine.render())?;

        let outcome = GameLoop::new(connection, engine, terminal, identities, role).run()?;
        terminal.say(&outcome.to_string())?;
        outcomes.push(outcome);

        let decision = match role {
            Role::Join => negotiate(connection, terminal)?,
            Role::Host => await_decision(connection, terminal)?,
        };
        if decision == Decision::Stop {
            break;
        }
        info!(games = outcomes.len(), "Starting another game");
    }
    terminal.say(&engine.render_stats())?;
    Ok(outcomes)
}

/// Dials a peer and plays until a stop decision.
///
/// Returns `Ok(None)` when the player aborted establishment. The connection
/// is closed on every path once it exists.
#[instrument(skip_all)]
pub fn join<D, T>(
    dialer: &mut D,
    terminal: &mut T,
    settings: &JoinSettings,
) -> Result<Option<SessionReport>, ProtocolError>
where
    D: Dialer,
    T: Terminal,
{
    let established = establish(dialer, terminal, settings.endpoint.clone(), settings.policy)?;
    let Established::Connected(mut connection) = established else {
        info!("Establishment aborted");
        return Ok(None);
    };
    let result = converse(
        &mut connection,
        terminal,
        settings.name.clone(),
        settings.read_timeout,
        Role::Join,
    );
    finish(connection, result).map(Some)
}

/// Accepts one peer on `listener` and plays until the peer stops.
#[instrument(skip_all)]
pub fn host<T: Terminal>(
    listener: &TcpListener,
    terminal: &mut T,
    settings: &HostSettings,
) -> Result<SessionReport, ProtocolError> {
    match listener.local_addr() {
        Ok(addr) => terminal.say(&format!("Waiting for a player on {}...", addr))?,
        Err(e) => {
            warn!(error = %e, "Listener has no local address");
            terminal.say("Waiting for a player...")?;
        }
    }
    let mut connection = accept_one(listener)?;
    let result = converse(
        &mut connection,
        terminal,
        settings.name.clone(),
        settings.read_timeout,
        Role::Host,
    );
    finish(connection, result)
}

fn converse<S: Stream, T: Terminal>(
    connection: &mut Connection<S>,
    terminal: &mut T,
    name: Option<Identity>,
    read_timeout: Option<Duration>,
    role: Role,
) -> Result<SessionReport, ProtocolError> {
    connection.set_read_timeout(read_timeout)?;
    let local = match name {
        Some(name) => name,
        None => prompt_identity(terminal)?,
    };
    let identities = exchange(connection, local, role)?;
    terminal.say(&format!("Playing against {}.", identities.remote()))?;

    let mut engine = GameBoard::new(identities.local(), identities.remote());
    let outcomes = play_session(connection, &mut engine, terminal, &identities, role)?;
    Ok(SessionReport {
        identities,
        outcomes,
    })
}

/// Closes the connection whatever `result` holds; the session's own error
/// wins over a close error.
fn finish<S: Stream>(
    mut connection: Connection<S>,
    result: Result<SessionReport, ProtocolError>,
) -> Result<SessionReport, ProtocolError> {
    let closed = connection.close();
    if let Err(e) = &result {
        warn!(error = %e, "Session ended with an error");
    }
    let report = result?;
    closed?;
    Ok(report)
}
