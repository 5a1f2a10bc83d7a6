//! HTLC CLI — hash locks, preimage checks and swap simulation.
//!
//! Subcommands: init, hash, verify, simulate.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::HtlcConfig;

/// Hashed Timelock Contract tool.
#[derive(Parser, Debug)]
#[command(name = "htlc", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "htlc.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Print HASH160 of a secret.
    Hash(commands::hash::HashArgs),
    /// Check whether a secret opens a hash lock.
    Verify(commands::verify::VerifyArgs),
    /// Run a funded contract through the claim or refund path.
    Simulate(commands::simulate::SimulateArgs),
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = HtlcConfig::load(&cli.config)?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Hash(args) => commands::hash::run(args),
        Commands::Verify(args) => commands::verify::run(args),
        Commands::Simulate(args) => commands::simulate::run(args, &config),
    }
}
