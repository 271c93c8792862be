//! Player identities exchanged during the handshake.

use derive_getters::Getters;

/// A non-empty, alphanumeric player name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct Identity(String);

impl Identity {
    /// Validates a candidate name.
    ///
    /// Returns `None` for empty names or names containing anything other
    /// than letters and digits.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if !name.is_empty() && name.chars().all(char::is_alphanumeric) {
            Some(Self(name))
        } else {
            None
        }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Both names for one connection, fixed after the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct Identities {
    /// This endpoint's player.
    local: Identity,
    /// The peer's player.
    remote: Identity,
}
