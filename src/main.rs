//! # Research Desk CLI (`desk`)
//!
//! The `desk` binary answers questions against a corpus of research
//! summaries. It loads the corpus once, embeds every summary once, then
//! matches the query to the single most similar summary.
//!
//! ## Usage
//!
//! ```bash
//! desk --config ./config/desk.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `desk ask "<query>"` | Answer a question with the best-matching summary or section |
//! | `desk sections [<n>]` | Show how summaries split into labeled sections |
//! | `desk intents` | List intent keywords in evaluation order |
//! | `desk stats` | Build the index and print corpus and model details |
//!
//! ## Examples
//!
//! ```bash
//! # Full summary of the closest study
//! desk ask "bone density in microgravity"
//!
//! # Only the impacts section of the closest study
//! desk ask "what are the impacts of bone loss" --json
//!
//! # Debug routing decisions
//! RUST_LOG=research_desk_core=debug desk ask "knowledge gaps in radiation"
//! ```

mod ask;
mod config;
mod corpus;
mod embedding;
mod inspect;
mod service;
mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Research Desk: semantic question answering over research summaries.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file.
#[derive(Parser)]
#[command(
    name = "desk",
    about = "Research Desk — semantic question answering over research summaries",
    version,
    long_about = "Research Desk finds the single research summary that best matches a \
    free-text question using sentence embeddings, and can narrow the answer to one \
    labeled section (impacts, results, knowledge gaps, ...) when the question asks for it."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/desk.toml")]
    config: PathBuf,

    /// Log match scores and routing decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Answer a question.
    ///
    /// Embeds the question, picks the most similar summary, and rejects it
    /// if the similarity is below `[retrieval].relevance_threshold`. If the
    /// question mentions a known intent (impact, result, knowledge, ...) and
    /// the summary has that section, only the section is printed.
    Ask {
        /// The question text.
        query: String,

        /// Print the `{ title, summary }` response as JSON.
        #[arg(long, conflicts_with = "raw")]
        json: bool,

        /// Print the summary exactly as stored, without sentence breaks.
        #[arg(long)]
        raw: bool,
    },

    /// Show labeled sections parsed from each summary.
    ///
    /// Does not load an embedding model.
    Sections {
        /// Corpus position of a single document (0-based).
        position: Option<usize>,
    },

    /// List intent keywords and their section labels, in evaluation order.
    Intents,

    /// Build the index and print corpus, model, and section coverage.
    Stats,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "research_desk=info,research_desk_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ask { query, json, raw } => {
            let format = if json {
                ask::OutputFormat::Json
            } else if raw {
                ask::OutputFormat::Raw
            } else {
                ask::OutputFormat::Text
            };
            ask::run_ask(&cfg, &query, format).await?;
        }
        Commands::Sections { position } => {
            inspect::run_sections(&cfg, position)?;
        }
        Commands::Intents => {
            inspect::run_intents(&cfg)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
