// SPDX-License-Identifier: MIT OR Apache-2.0

//! Show what the normalizer does to a transcription.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use versefind::normalize::{CleaningStats, CleaningStep, Normalizer};
use versefind::output::{print_json, use_colors};

#[derive(Debug, Serialize)]
struct CleanOutput<'a> {
    original: &'a str,
    cleaned: &'a str,
    stats: CleaningStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    passes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<&'a [CleaningStep]>,
}

pub fn run(text: &str, trace: bool, format: OutputFormat, compact: bool) -> Result<()> {
    let normalizer = Normalizer::default();
    let traced = trace.then(|| normalizer.normalize_traced(text));
    let cleaned = match &traced {
        Some(t) => t.output.clone(),
        None => normalizer.normalize(text),
    };
    let stats = CleaningStats::between(text, &cleaned);

    match format {
        OutputFormat::Json => {
            let payload = CleanOutput {
                original: text,
                cleaned: &cleaned,
                stats,
                passes: traced.as_ref().map(|t| t.passes),
                steps: traced.as_ref().map(|t| t.steps.as_slice()),
            };
            print_json(&payload, compact)?;
        }
        OutputFormat::Text => {
            println!("{}", cleaned);
            if let Some(traced) = traced {
                println!();
                for step in &traced.steps {
                    let label = format!("{}/{:<20}", step.pass + 1, step.stage.label());
                    let label = if use_colors() {
                        label.dimmed().to_string()
                    } else {
                        label
                    };
                    println!("{} {}", label, step.text);
                }
                println!();
                println!(
                    "Passes: {}  Characters: {} -> {}  Words: {} -> {}  Reduction: {:.2}%",
                    traced.passes,
                    stats.original_length,
                    stats.cleaned_length,
                    stats.original_words,
                    stats.cleaned_words,
                    stats.reduction_percent
                );
            }
        }
    }
    Ok(())
}
