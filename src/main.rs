// SPDX-License-Identifier: MIT OR Apache-2.0

//! versefind - Locate scripture lines from noisy speech-to-text output
//!
//! Cleans machine transcriptions of recited Gurmukhi verses and ranks the
//! reference lines they most likely refer to, using an SQLite/FTS5 corpus
//! for exact lookups and multi-strategy fuzzy scoring otherwise.

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, OutputFormat};
use tracing_subscriber::EnvFilter;

use commands::search::{SearchMode, SearchRequest};
use versefind::config::{Config, ConfigOutputFormat};

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load();
    let format = cli.format.unwrap_or(match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    });
    let compact = cli.compact;
    let db = config.merge_database(cli.db);

    match cli.command {
        Commands::Clean { text, trace } => {
            commands::clean::run(&text, trace, format, compact)?;
        }
        Commands::Search {
            query,
            limit,
            min_similarity,
            window,
            exact,
            prefer_exact,
        } => {
            let mut options = config.match_options();
            if let Some(window) = window {
                options.window_cap = window;
            }
            let request = SearchRequest {
                query: &query,
                limit: config.merge_max_results(limit),
                min_similarity: min_similarity.unwrap_or(options.min_similarity),
                mode: SearchMode::from_flags(exact, prefer_exact),
                options,
            };
            commands::search::run(request, &db, format, compact)?;
        }
        Commands::Compare {
            left,
            right,
            normalize,
        } => {
            let options = config.match_options();
            commands::compare::run(&left, &right, normalize, &options, format, compact)?;
        }
        Commands::Load {
            file,
            skip_first,
            clear,
        } => {
            commands::load::run(&file, skip_first, clear, &db, format, compact)?;
        }
        Commands::Stats => {
            commands::stats::run(&db, format, compact)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "versefind", &mut std::io::stdout());
        }
    }

    Ok(())
}
