//! One-time identity exchange after the connection opens.

use crate::{Connection, Identities, Identity, Message, ProtocolError, Role, Stream};
use tracing::{info, instrument};

/// Swaps names with the peer.
///
/// The joining side speaks first and the hosting side answers, so each side
/// performs exactly one send and one receive. Nothing is retried: a closed
/// connection or an unusable name ends the session.
#[instrument(skip(connection, local), fields(peer = %connection.peer(), local = %local))]
pub fn exchange<S: Stream>(
    connection: &mut Connection<S>,
    local: Identity,
    role: Role,
) -> Result<Identities, ProtocolError> {
    let remote = match role {
        Role::Join => {
            connection.send(&Message::Identity(local.clone()))?;
            connection.recv_identity()?
        }
        Role::Host => {
            let remote = connection.recv_identity()?;
            connection.send(&Message::Identity(local.clone()))?;
            remote
        }
    };
    info!(remote = %remote, "Handshake complete");
    Ok(Identities::new(local, remote))
}
