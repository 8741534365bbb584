use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod manifest;
mod output;

#[derive(Parser)]
#[command(name = "carton")]
#[command(version, about = "Bundle resolution and build tracing for carton projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the target graph and print each bundle's derived outputs
    Resolve {
        /// Path to the build manifest
        #[arg(short, long, default_value = "carton.toml")]
        manifest: PathBuf,
        /// Print a timing summary when the run finishes
        #[arg(long)]
        time: bool,
        /// Write a Chrome trace file to this path when the run finishes
        #[arg(long)]
        tracelog: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Resolve {
            manifest,
            time,
            tracelog,
        } => commands::resolve::execute(&manifest, time, tracelog.as_deref()),
    }
}
