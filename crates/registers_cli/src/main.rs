//! Registers CLI
//!
//! Command-line tools for operating the registers sync service against a
//! local document directory, with change events written to a journal.
//!
//! # Commands
//!
//! - `get` - Print the stored document for a company
//! - `upsert` - Apply a delta read from a JSON file
//! - `delete` - Delete a company's document
//! - `events` - Print journalled change events

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Registers sync command-line tools.
#[derive(Parser)]
#[command(name = "registers")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding stored documents
    #[arg(global = true, short, long)]
    data_dir: Option<PathBuf>,

    /// Change event journal (defaults to events.jsonl in the data directory)
    #[arg(global = true, short, long)]
    journal: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored document for a company
    Get {
        /// Company number
        company: String,
    },

    /// Apply a delta to a company's registers
    Upsert {
        /// Company number
        company: String,

        /// JSON file holding the delta request body
        #[arg(long)]
        delta: PathBuf,
    },

    /// Delete a company's registers
    Delete {
        /// Company number
        company: String,
    },

    /// Print journalled change events
    Events {
        /// Maximum number of events to print, most recent last
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Get { company } => {
            let workspace = workspace(cli.data_dir, cli.journal)?;
            commands::get::run(&workspace, &company, &mut out)?;
        }
        Commands::Upsert { company, delta } => {
            let workspace = workspace(cli.data_dir, cli.journal)?;
            commands::upsert::run(&workspace, &company, &delta, &mut out)?;
        }
        Commands::Delete { company } => {
            let workspace = workspace(cli.data_dir, cli.journal)?;
            commands::delete::run(&workspace, &company, &mut out)?;
        }
        Commands::Events { limit } => {
            let workspace = workspace(cli.data_dir, cli.journal)?;
            commands::events::run(&workspace, limit, &mut out)?;
        }
        Commands::Version => {
            println!("Registers CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn workspace(
    data_dir: Option<PathBuf>,
    journal: Option<PathBuf>,
) -> Result<commands::Workspace, Box<dyn std::error::Error>> {
    let data_dir = data_dir.ok_or("--data-dir is required for this command")?;
    Ok(commands::Workspace::new(data_dir, journal))
}
