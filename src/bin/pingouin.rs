//! Pingouin CLI - Tabular Q-learning on a hazard grid
//!
//! This CLI provides a unified interface for:
//! - Training an agent and reporting what it learned
//! - Moving through the grid interactively after training
//! - Exporting the learned action values

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pingouin")]
#[command(version, about = "Q-learning agent for a grid with hazards", long_about = None)]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent and print a summary
    Train(Box<pingouin::cli::commands::train::TrainArgs>),

    /// Train an agent, then drive the grid from stdin
    Play(pingouin::cli::commands::play::PlayArgs),

    /// Train an agent and export its table
    Export(pingouin::cli::commands::export::ExportArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => pingouin::cli::commands::train::execute(*args),
        Commands::Play(args) => pingouin::cli::commands::play::execute(args),
        Commands::Export(args) => pingouin::cli::commands::export::execute(args),
    }
}
