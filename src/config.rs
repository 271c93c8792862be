//! Peer configuration from TOML with command-line overrides.

use crate::{Endpoint, HostSettings, Identity, JoinSettings, RetryPolicy};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Optional settings for either side of a session.
///
/// Every field may be left out. Anything missing is prompted for
/// interactively or falls back to indefinite waiting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Deserialize, derive_new::new)]
#[serde(default, deny_unknown_fields)]
pub struct PeerConfig {
    /// Player name.
    name: Option<String>,
    /// Host to dial (join) or bind (host).
    host: Option<String>,
    /// Port to dial (join) or bind (host).
    port: Option<u16>,
    /// Give up establishment after this many failed attempts.
    max_attempts: Option<u32>,
    /// Bound on each connection attempt, in seconds.
    connect_timeout_secs: Option<u64>,
    /// Bound on each receive, in seconds.
    read_timeout_secs: Option<u64>,
}

impl PeerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(name = ?config.name, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Field-wise merge where values in `overrides` win.
    pub fn merge(self, overrides: PeerConfig) -> Self {
        Self {
            name: overrides.name.or(self.name),
            host: overrides.host.or(self.host),
            port: overrides.port.or(self.port),
            max_attempts: overrides.max_attempts.or(self.max_attempts),
            connect_timeout_secs: overrides.connect_timeout_secs.or(self.connect_timeout_secs),
            read_timeout_secs: overrides.read_timeout_secs.or(self.read_timeout_secs),
        }
    }

    /// Validated player name, if configured.
    pub fn identity(&self) -> Result<Option<Identity>, ConfigError> {
        self.name
            .as_ref()
            .map(|name| {
                Identity::new(name.as_str()).ok_or_else(|| {
                    ConfigError::new(format!("Name '{}' must be alphanumeric", name))
                })
            })
            .transpose()
    }

    /// Bound on each connection attempt. Zero is rejected; leave the key
    /// out to use the operating system's default.
    pub fn connect_timeout(&self) -> Result<Option<Duration>, ConfigError> {
        nonzero_secs("connect_timeout_secs", self.connect_timeout_secs)
    }

    /// Bound on each receive. Zero is rejected; leave the key out to wait
    /// indefinitely.
    pub fn read_timeout(&self) -> Result<Option<Duration>, ConfigError> {
        nonzero_secs("read_timeout_secs", self.read_timeout_secs)
    }

    /// Settings for the joining side. The endpoint is only pre-filled when
    /// both host and port are known.
    #[instrument(skip(self))]
    pub fn join_settings(&self) -> Result<JoinSettings, ConfigError> {
        if self.max_attempts == Some(0) {
            return Err(ConfigError::new("max_attempts must be at least 1".to_string()));
        }
        self.connect_timeout()?;
        let endpoint = match (&self.host, self.port) {
            (Some(host), Some(port)) => Some(Endpoint::new(host.as_str(), port)),
            _ => None,
        };
        Ok(JoinSettings::new(
            endpoint,
            self.identity()?,
            RetryPolicy::new(self.max_attempts),
            self.read_timeout()?,
        ))
    }

    /// Settings for the hosting side.
    #[instrument(skip(self))]
    pub fn host_settings(&self) -> Result<HostSettings, ConfigError> {
        Ok(HostSettings::new(self.identity()?, self.read_timeout()?))
    }
}

fn nonzero_secs(key: &str, secs: Option<u64>) -> Result<Option<Duration>, ConfigError> {
    match secs {
        Some(0) => Err(ConfigError::new(format!("{} must be at least 1", key))),
        secs => Ok(secs.map(Duration::from_secs)),
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_overrides() {
        let file = PeerConfig {
            name: Some("alice".into()),
            port: Some(5000),
            ..Default::default()
        };
        let cli = PeerConfig {
            port: Some(6000),
            host: Some("10.0.0.2".into()),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.name().as_deref(), Some("alice"));
        assert_eq!(*merged.port(), Some(6000));
        assert_eq!(merged.host().as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_endpoint_needs_host_and_port() {
        let only_port = PeerConfig {
            port: Some(5000),
            ..Default::default()
        };
        assert!(only_port.join_settings().unwrap().endpoint().is_none());
    }

    #[test]
    fn test_bad_name_rejected() {
        let config = PeerConfig {
            name: Some("not ok".into()),
            ..Default::default()
        };
        assert!(config.join_settings().is_err());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let connect = PeerConfig {
            connect_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(connect.join_settings().is_err());
        assert!(connect.connect_timeout().is_err());

        let read = PeerConfig {
            read_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(read.join_settings().is_err());
        assert!(read.host_settings().is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = PeerConfig {
            max_attempts: Some(0),
            ..Default::default()
        };
        assert!(config.join_settings().is_err());
    }
}
