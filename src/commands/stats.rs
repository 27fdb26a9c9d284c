// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corpus statistics.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::open_store;
use crate::cli::OutputFormat;
use versefind::output::print_json;
use versefind::store::CorpusStats;

#[derive(Debug, Serialize)]
struct StatsOutput {
    database: String,
    #[serde(flatten)]
    stats: CorpusStats,
}

pub fn run(db: &Path, format: OutputFormat, compact: bool) -> Result<()> {
    let stats = open_store(db)?.stats()?;
    match format {
        OutputFormat::Json => print_json(
            &StatsOutput {
                database: db.display().to_string(),
                stats,
            },
            compact,
        )?,
        OutputFormat::Text => {
            println!("Database:       {}", db.display());
            println!("Lines:          {}", stats.total_lines);
            println!("Pages:          {}", stats.total_pages);
            println!("Raags:          {}", stats.unique_raags);
            println!("Authors:        {}", stats.unique_authors);
        }
    }
    Ok(())
}
