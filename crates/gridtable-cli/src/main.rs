#![allow(clippy::doc_markdown)]
//! `GridTable` CLI - interactive REPL and script runner for in-memory tables
//!
//! Usage:
//!   `gridtable repl`
//!   `gridtable run ./commands.grid --format json`
//!   `gridtable --config ./gridtable.toml config`

mod repl;
mod repl_output;
mod session;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gridtable_core::{GridConfig, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use repl_output::OutputFormat;

#[derive(Parser)]
#[command(name = "gridtable")]
#[command(author, version, about = "GridTable CLI - In-memory indexed tables")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a gridtable.toml configuration file
    #[arg(short, long, global = true, env = "GRIDTABLE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive REPL
    Repl,

    /// Execute a file of REPL commands
    Run {
        /// Path to the script
        script: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Repl => repl::run(&config)?,
        Commands::Run { script, format } => repl::run_script(&script, &config, format)?,
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GridConfig> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            GridConfig::load_from_path(path)
        }
        None => GridConfig::load(),
    }
    .context("Failed to load configuration")?;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Logs go to stderr; `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let json = logging.format == "json";

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
