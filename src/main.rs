//! Upton CLI - run the agent against recorded turn snapshots.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use upton::AgentState;

/// Upton - a heuristic lane-combat agent
#[derive(Parser, Debug)]
#[command(name = "upton")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Engine configuration JSON (default: stock unit catalog)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the tie-break coin (default: 0)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: cli::OutputFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one turn from a snapshot and print the submission
    Turn {
        /// Turn snapshot JSON
        #[arg(long, required = true)]
        state: PathBuf,

        /// Hold turns carried over from the previous turn's report
        #[arg(long, default_value = "0")]
        hold_turns: u32,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Play a sequence of snapshots through one agent
    Replay {
        /// Turn snapshot JSON files, in turn order
        #[arg(required = true, num_args = 1..)]
        snapshots: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("upton=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let result = match args.command {
        Commands::Turn {
            state,
            hold_turns,
            common,
        } => cli::turn::execute(
            &state,
            common.config.as_deref(),
            common.seed,
            common.format,
            AgentState { hold_turns },
        ),
        Commands::Replay { snapshots, common } => {
            cli::replay::execute(&snapshots, common.config.as_deref(), common.seed, common.format)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
