// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// versefind - Locate scripture lines from noisy transcriptions
///
/// Cleans speech-to-text output of recited Gurmukhi verses and ranks the
/// reference lines it most likely refers to.
#[derive(Parser, Debug)]
#[command(name = "versefind")]
#[command(
    author,
    version,
    about,
    long_about = None,
    override_usage = "versefind [OPTIONS] <COMMAND>",
    after_help = "Quickstart:\n  versefind load lines.txt\n  versefind s \"ਆਦ ਸਾਚ ਜਗਾਦ ਸਾਚ\"\n  versefind clean --trace \"ਸ਼ਿ ਸ਼ਿ ਸ਼ਿ\""
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Corpus database (defaults to config, then ./versefind.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a transcription and print the normalized query
    #[command(visible_aliases = ["c", "norm"])]
    Clean {
        /// Raw speech-to-text output
        text: String,

        /// Show the output of every normalizer stage
        #[arg(short, long)]
        trace: bool,
    },

    /// Find the reference lines a transcription refers to
    #[command(
        visible_aliases = ["s", "find"],
        after_help = "Examples:\n  versefind s \"ਆਦ ਸਾਚ ਜਗਾਦ ਸਾਚ\"\n  versefind search --exact \"ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ\"\n  versefind search --min-similarity 0.5 -m 3 \"...\""
    )]
    Search {
        /// Raw speech-to-text output
        query: String,

        /// Maximum number of results
        #[arg(
            short = 'm',
            long = "limit",
            visible_alias = "max-results",
            help_heading = "Core"
        )]
        limit: Option<usize>,

        /// Minimum similarity score (0.0 - 1.0) for fuzzy matches
        #[arg(short = 's', long, help_heading = "Core")]
        min_similarity: Option<f64>,

        /// Lines scanned by fuzzy matching
        #[arg(short = 'w', long, help_heading = "Core")]
        window: Option<usize>,

        /// Token index lookup only, no fuzzy matching
        #[arg(short = 'e', long, conflicts_with = "prefer_exact", help_heading = "Mode")]
        exact: bool,

        /// Try the token index first, fall back to fuzzy matching
        #[arg(long, help_heading = "Mode")]
        prefer_exact: bool,
    },

    /// Show every similarity score between two strings
    #[command(visible_aliases = ["cmp"])]
    Compare {
        left: String,
        right: String,

        /// Normalize both sides before scoring
        #[arg(short = 'n', long)]
        normalize: bool,
    },

    /// Load reference lines ("text (page-line)" per line) into the database
    #[command(visible_aliases = ["l", "ingest"])]
    Load {
        /// UTF-8 text file with one reference line per line
        file: PathBuf,

        /// Skip this many leading non-blank lines (headers, title page)
        #[arg(long, default_value = "0")]
        skip_first: usize,

        /// Remove existing lines before loading
        #[arg(long)]
        clear: bool,
    },

    /// Show corpus statistics
    Stats,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
