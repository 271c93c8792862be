//! Opening the connection: interactive dial with retry, or a one-shot accept.

use crate::terminal::{prompt_decision, prompt_endpoint};
use crate::{Connection, Decision, ProtocolError, Stream, Terminal};
use derive_getters::Getters;
use std::io;
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Address and port of the peer to dial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, derive_new::new, derive_more::Display)]
#[display("{}:{}", host, port)]
pub struct Endpoint {
    /// Host name or IP address.
    #[new(into)]
    host: String,
    /// TCP port.
    port: u16,
}

/// Opens streams to endpoints.
pub trait Dialer {
    /// Stream type produced on success.
    type Stream: Stream;

    /// One connection attempt.
    fn dial(&mut self, endpoint: &Endpoint) -> io::Result<Self::Stream>;
}

/// Dials over TCP.
#[derive(Debug, Clone, Copy, Default, derive_new::new)]
pub struct TcpDialer {
    /// Bound on each attempt. `None` or zero uses the operating system's
    /// default.
    connect_timeout: Option<Duration>,
}

impl Dialer for TcpDialer {
    type Stream = TcpStream;

    #[instrument(skip(self))]
    fn dial(&mut self, endpoint: &Endpoint) -> io::Result<TcpStream> {
        let Some(timeout) = self.connect_timeout.filter(|t| !t.is_zero()) else {
            return TcpStream::connect((endpoint.host().as_str(), *endpoint.port()));
        };
        let mut last_err = None;
        for addr in (endpoint.host().as_str(), *endpoint.port()).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "address resolved to nothing")
        }))
    }
}

/// How many times establishment may try before giving up on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, derive_new::new)]
pub struct RetryPolicy {
    /// `None` retries for as long as the player keeps saying yes.
    max_attempts: Option<u32>,
}

/// Result of establishment.
#[derive(Debug)]
pub enum Established<S: Stream> {
    /// A live connection.
    Connected(Connection<S>),
    /// The player declined to retry or the attempt budget ran out.
    Aborted,
}

/// Dials until a connection opens or the player gives up.
///
/// The first attempt uses `first` when given; every later attempt asks for
/// a fresh address and port. A failed attempt offers a yes/no retry.
#[instrument(skip(dialer, terminal))]
pub fn establish<D, T>(
    dialer: &mut D,
    terminal: &mut T,
    first: Option<Endpoint>,
    policy: RetryPolicy,
) -> Result<Established<D::Stream>, ProtocolError>
where
    D: Dialer,
    T: Terminal,
{
    let mut next = first;
    let mut attempts = 0u32;
    loop {
        let endpoint = match next.take() {
            Some(endpoint) => endpoint,
            None => prompt_endpoint(terminal)?,
        };
        attempts += 1;
        match dialer.dial(&endpoint) {
            Ok(stream) => {
                info!(%endpoint, attempts, "Connected");
                return Ok(Established::Connected(Connection::new(
                    stream,
                    endpoint.to_string(),
                )));
            }
            Err(e) => warn!(%endpoint, attempts, error = %e, "Connection attempt failed"),
        }
        if policy.max_attempts().is_some_and(|max| attempts >= max) {
            terminal.say(&format!(
                "Connection could not be made after {} attempts.",
                attempts
            ))?;
            return Ok(Established::Aborted);
        }
        let retry = prompt_decision(
            terminal,
            "Connection could not be made. Would you like to try again (y/n): ",
        )?;
        if retry == Decision::Stop {
            info!(attempts, "Player aborted connection");
            return Ok(Established::Aborted);
        }
    }
}

/// Accepts exactly one peer on `listener`.
#[instrument(skip(listener))]
pub fn accept_one(listener: &TcpListener) -> Result<Connection<TcpStream>, ProtocolError> {
    let (stream, addr) = listener.accept()?;
    info!(%addr, "Peer connected");
    Ok(Connection::new(stream, addr.to_string()))
}
