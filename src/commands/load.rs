// SPDX-License-Identifier: MIT OR Apache-2.0

//! Load reference lines from a text file into the corpus database.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::open_store;
use crate::cli::OutputFormat;
use versefind::ingest::read_reference_file;
use versefind::output::print_json;

/// Lines per insert transaction.
const BATCH_SIZE: usize = 500;

#[derive(Debug, Serialize)]
struct LoadOutput {
    file: String,
    database: String,
    cleared: usize,
    inserted: usize,
    total_lines: usize,
}

fn progress_bar(len: u64, format: OutputFormat) -> Result<ProgressBar> {
    if format == OutputFormat::Json {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%)")
            .context("invalid progress template")?
            .progress_chars("=>-"),
    );
    Ok(bar)
}

pub fn run(
    file: &Path,
    skip_first: usize,
    clear: bool,
    db: &Path,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let lines = read_reference_file(file, skip_first)?;
    let store = open_store(db)?;

    let cleared = if clear {
        store.clear().context("failed to clear corpus")?
    } else {
        0
    };

    let bar = progress_bar(lines.len() as u64, format)?;
    let mut inserted = 0;
    for batch in lines.chunks(BATCH_SIZE) {
        inserted += store
            .insert_lines(batch.iter().cloned())
            .context("failed to insert reference lines")?;
        bar.inc(batch.len() as u64);
    }
    bar.finish_and_clear();

    let total_lines = store.stats()?.total_lines;
    info!(inserted, total_lines, "load complete");

    let result = LoadOutput {
        file: file.display().to_string(),
        database: db.display().to_string(),
        cleared,
        inserted,
        total_lines,
    };
    match format {
        OutputFormat::Json => print_json(&result, compact)?,
        OutputFormat::Text => {
            if cleared > 0 {
                println!("Cleared {} existing line(s)", cleared);
            }
            println!(
                "Loaded {} line(s) from {} into {} ({} total)",
                result.inserted, result.file, result.database, result.total_lines
            );
        }
    }
    Ok(())
}
