//! Crosswire - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use crosswire::{Console, PeerConfig, TcpDialer, Terminal, prompt_port};
use std::net::TcpListener;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();
    let config = PeerConfig::load(cli.command.config_path())?.merge(cli.command.overrides());

    match cli.command {
        Command::Join { .. } => run_join(config),
        Command::Host { .. } => run_host(config),
    }
}

/// Dial a hosting peer.
#[instrument(skip(config))]
fn run_join(config: PeerConfig) -> Result<()> {
    let settings = config.join_settings()?;
    let mut dialer = TcpDialer::new(config.connect_timeout()?);
    let mut console = Console::stdio();

    match crosswire::join(&mut dialer, &mut console, &settings)? {
        Some(report) => info!(games = report.outcomes().len(), "Session finished"),
        None => info!("No connection made"),
    }
    Ok(())
}

/// Wait for a joining peer.
#[instrument(skip(config))]
fn run_host(config: PeerConfig) -> Result<()> {
    let settings = config.host_settings()?;
    let mut console = Console::stdio();

    let bind = config.host().clone().unwrap_or_else(|| "0.0.0.0".to_string());
    let port = match config.port() {
        Some(port) => *port,
        None => prompt_port(&mut console, "Enter port number to listen on: ")?,
    };
    let listener = TcpListener::bind((bind.as_str(), port))
        .with_context(|| format!("Failed to bind {}:{}", bind, port))?;
    info!(%bind, port, "Listening");

    let report = crosswire::host(&listener, &mut console, &settings)?;
    console.say("Thanks for playing.")?;
    info!(games = report.outcomes().len(), "Session finished");
    Ok(())
}

/// Logs go to stderr so prompts on stdout stay readable.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
