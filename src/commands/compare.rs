// SPDX-License-Identifier: MIT OR Apache-2.0

//! Side-by-side similarity scores for two strings.

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use versefind::normalize::normalize;
use versefind::output::{colorize_score, print_json};
use versefind::search::MatchOptions;
use versefind::similarity::ScoreBreakdown;

#[derive(Debug, Serialize)]
struct CompareOutput<'a> {
    left: &'a str,
    right: &'a str,
    scores: &'a ScoreBreakdown,
    best: f64,
}

pub fn run(
    left: &str,
    right: &str,
    normalize_first: bool,
    options: &MatchOptions,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let (left, right) = if normalize_first {
        (normalize(left), normalize(right))
    } else {
        (left.to_string(), right.to_string())
    };
    let scores = ScoreBreakdown::compute(&left, &right, options);

    match format {
        OutputFormat::Json => {
            let payload = CompareOutput {
                left: &left,
                right: &right,
                scores: &scores,
                best: scores.best(),
            };
            print_json(&payload, compact)?;
        }
        OutputFormat::Text => {
            let edit_max = options.edit_distance_max_len;
            let ratio_max = options.ratio_max_len;
            let rows = [
                ("ngram", Some(scores.ngram), None),
                ("edit_distance", scores.edit_distance, Some(edit_max)),
                ("ratio", Some(scores.ratio), None),
                ("partial_ratio", scores.partial_ratio, Some(ratio_max)),
                ("token_sort_ratio", Some(scores.token_sort_ratio), None),
                ("token_set_ratio", Some(scores.token_set_ratio), None),
                ("weighted_ratio", scores.weighted_ratio, Some(ratio_max)),
            ];
            for (name, score, ceiling) in rows {
                match (score, ceiling) {
                    (Some(score), _) => println!("{:<18} {}", name, colorize_score(score)),
                    (None, Some(max)) => println!("{:<18} skipped (longer than {max} chars)", name),
                    (None, None) => println!("{:<18} -", name),
                }
            }
            println!("{:<18} {}", "best", colorize_score(scores.best()));
        }
    }
    Ok(())
}
