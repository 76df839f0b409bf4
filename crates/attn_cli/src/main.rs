//! Attention CLI - track and rank unmet priorities across a source tree.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "attn")]
#[command(about = "Attribute and priority tracking for source trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Root of the tracked tree
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and refresh file facets for a directory
    Scan {
        /// Directory to scan, relative to the root
        dir: Option<PathBuf>,
        /// Scan every directory in the tree
        #[arg(long)]
        all: bool,
    },
    /// Recompute content identities of existing file facets
    Refresh {
        /// Directory to refresh, relative to the root
        dir: Option<PathBuf>,
    },
    /// Remove facets of files that no longer exist
    Cleanup {
        /// Directory to clean, relative to the root
        dir: Option<PathBuf>,
    },
    /// Show facet counts for a directory
    Stats {
        /// Directory to inspect, relative to the root
        dir: Option<PathBuf>,
    },
    /// Print the urgency report
    Report {
        /// Include the score ranking and summary
        #[arg(long)]
        detailed: bool,
        /// Show at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Export resolved data to JSON
    Dump {
        /// Output file, relative to the root
        #[arg(short, long, default_value = commands::dump::DEFAULT_DUMP_FILE)]
        output: PathBuf,
    },
    /// Write store files from a JSON export
    Apply {
        /// Input file, relative to the root
        #[arg(short, long, default_value = commands::dump::DEFAULT_DUMP_FILE)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Respects RUST_LOG (e.g. RUST_LOG=attn_core=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli.root.as_path();

    match cli.command {
        Commands::Scan { dir, all } => {
            if all {
                commands::scan::run_all(root)
            } else {
                commands::scan::run(root, dir.as_deref())
            }
        }
        Commands::Refresh { dir } => commands::refresh::run(root, dir.as_deref()),
        Commands::Cleanup { dir } => commands::cleanup::run(root, dir.as_deref()),
        Commands::Stats { dir } => commands::stats::run(root, dir.as_deref()),
        Commands::Report { detailed, limit } => commands::report::run(root, detailed, limit),
        Commands::Dump { output } => commands::dump::run(root, &output),
        Commands::Apply { input } => commands::apply::run(root, &input),
    }
}
