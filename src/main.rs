//! # docdex CLI
//!
//! ```bash
//! docdex --config ./docdex.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docdex ingest` | Load, chunk, embed, and index the configured docs tree |
//! | `docdex search "<query>"` | Semantic search over the saved store |
//! | `docdex stats` | Print store summary statistics |
//! | `docdex inspect` | Print sampled chunks for quality review |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docdex::{config, ingest, inspect, query};

/// docdex — semantic retrieval over plain-text reference documentation.
#[derive(Parser)]
#[command(
    name = "docdex",
    about = "Semantic retrieval over plain-text reference documentation",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./docdex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the docs tree: load, chunk, embed, build and save the store.
    Ingest {
        /// Show document and chunk counts without embedding or writing.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of documents to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search the saved store with a natural-language query.
    Search {
        /// The query string.
        query: String,

        /// Number of results to return.
        #[arg(long, short, default_value_t = 3)]
        k: usize,
    },

    /// Print store summary statistics.
    Stats,

    /// Print sampled chunks in full for quality review.
    Inspect {
        /// Number of chunks to display (evenly sampled).
        #[arg(long, default_value_t = 5)]
        sample: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest { dry_run, limit } => {
            ingest::run_ingest(&cfg, dry_run, limit).await?;
        }
        Commands::Search { query, k } => {
            query::run_search(&cfg, &query, k).await?;
        }
        Commands::Stats => {
            inspect::run_stats(&cfg)?;
        }
        Commands::Inspect { sample } => {
            inspect::run_inspect(&cfg, sample)?;
        }
    }

    Ok(())
}
