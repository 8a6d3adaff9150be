mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "retrace",
    about = "Replay dispatch-event logs into action call trees",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct and print the call trees recorded in an event log
    Replay {
        /// Event log, one JSON runtime event per line
        file: PathBuf,

        /// Only show this run
        #[arg(long)]
        run: Option<String>,

        /// Also print each run's final state snapshot
        #[arg(long)]
        state: bool,
    },

    /// List the runs recorded in an event log
    Runs {
        /// Event log, one JSON runtime event per line
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Replay { file, run, state } => {
            cmd::replay::run(&file, run.as_deref(), state, cli.json)
        }
        Commands::Runs { file } => cmd::runs::run(&file, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
