//! Command-line interface for crosswire.

use clap::{Args, Parser, Subcommand};
use crosswire::PeerConfig;
use std::path::PathBuf;

/// Crosswire - tic-tac-toe against a peer over TCP
#[derive(Parser, Debug)]
#[command(name = "crosswire")]
#[command(about = "Two-player tic-tac-toe over a TCP stream", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a hosting peer and move first
    Join {
        /// Host address to dial
        #[arg(long)]
        host: Option<String>,

        /// Options shared by both sides
        #[command(flatten)]
        common: CommonArgs,

        /// Give up after this many failed connection attempts
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Bound on each connection attempt, in seconds
        #[arg(long)]
        connect_timeout: Option<u64>,
    },

    /// Wait for a joining peer and move second
    Host {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,

        /// Options shared by both sides
        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Port to dial or listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Player name (alphanumeric)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Bound on each receive from the peer, in seconds
    #[arg(long)]
    pub read_timeout: Option<u64>,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "crosswire.toml")]
    pub config: PathBuf,
}

impl Command {
    /// Configuration file named on the command line.
    pub fn config_path(&self) -> &PathBuf {
        match self {
            Command::Join { common, .. } | Command::Host { common, .. } => &common.config,
        }
    }

    /// Flag values as a configuration layer.
    pub fn overrides(&self) -> PeerConfig {
        match self {
            Command::Join {
                host,
                common,
                max_attempts,
                connect_timeout,
            } => PeerConfig::new(
                common.name.clone(),
                host.clone(),
                common.port,
                *max_attempts,
                *connect_timeout,
                common.read_timeout,
            ),
            Command::Host { bind, common } => PeerConfig::new(
                common.name.clone(),
                bind.clone(),
                common.port,
                None,
                None,
                common.read_timeout,
            ),
        }
    }
}
