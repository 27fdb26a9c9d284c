// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rank reference lines against a transcription.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use super::open_store;
use crate::cli::OutputFormat;
use versefind::errors::suggestions::{empty_corpus_suggestion, no_results_suggestion};
use versefind::output::{
    colorize_location, colorize_score, colorize_strategy, format_location, print_json,
};
use versefind::search::{MatchCandidate, MatchOptions, Matcher, SearchResult};

/// Which tiers of the matcher to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Fuzzy scoring over the window only
    Fuzzy,
    /// Token index only
    Exact,
    /// Token index, fuzzy when it finds nothing
    PreferExact,
}

impl SearchMode {
    pub fn from_flags(exact: bool, prefer_exact: bool) -> Self {
        if exact {
            Self::Exact
        } else if prefer_exact {
            Self::PreferExact
        } else {
            Self::Fuzzy
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    cleaned: &'a str,
    total: usize,
    candidates: &'a [MatchCandidate],
}

pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub limit: usize,
    pub min_similarity: f64,
    pub mode: SearchMode,
    pub options: MatchOptions,
}

pub fn run(
    request: SearchRequest<'_>,
    db: &Path,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let store = open_store(db)?;
    let matcher = Matcher::with_options(&store, request.options);
    let cleaned = matcher.normalizer().normalize(request.query);

    let (query, limit, min_similarity) = (request.query, request.limit, request.min_similarity);
    let result: SearchResult = match request.mode {
        SearchMode::Fuzzy => matcher.search(query, limit, true, min_similarity),
        SearchMode::Exact => matcher.search(query, limit, false, min_similarity),
        SearchMode::PreferExact => matcher.search_preferring_exact(query, limit, min_similarity),
    }
    .context("search failed")?;

    match format {
        OutputFormat::Json => {
            let payload = SearchOutput {
                query: request.query,
                cleaned: &cleaned,
                total: result.total,
                candidates: &result.candidates,
            };
            print_json(&payload, compact)?;
        }
        OutputFormat::Text => {
            if result.is_empty() {
                let corpus_empty = store.stats().map(|s| s.total_lines == 0).unwrap_or(false);
                if corpus_empty {
                    eprintln!("{}", empty_corpus_suggestion(&db.display().to_string()));
                } else {
                    eprintln!("{}", no_results_suggestion(request.query));
                }
                return Ok(());
            }

            println!("Cleaned: {}", cleaned);
            for candidate in &result.candidates {
                println!(
                    "{} {:<14} {:>8}  {}",
                    colorize_score(candidate.score),
                    colorize_strategy(candidate.strategy),
                    colorize_location(&format_location(&candidate.line)),
                    candidate.line.text
                );
            }
            println!(
                "\n{} of {} candidate(s)",
                result.candidates.len(),
                result.total
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_flag_wins() {
        assert_eq!(SearchMode::from_flags(true, false), SearchMode::Exact);
        assert_eq!(SearchMode::from_flags(false, true), SearchMode::PreferExact);
        assert_eq!(SearchMode::from_flags(false, false), SearchMode::Fuzzy);
    }
}
