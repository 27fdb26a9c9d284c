// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query normalizer - undoes known speech-to-text error patterns
//!
//! The pipeline runs a fixed sequence of [`Stage`]s. Some stages can expose a
//! pattern that an earlier stage would have rewritten (removing a halant can
//! create a new character run, dropping a stop word can make two conjunct
//! halves adjacent), so the whole pipeline is repeated until the text stops
//! changing. Every substitution shortens or keeps the text, which bounds the
//! number of passes in practice; [`MAX_PASSES`] is a hard stop.

pub mod stages;
pub mod tables;

use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

pub use stages::Stage;
pub use tables::NormalizerTables;

/// Upper bound on full pipeline passes.
pub const MAX_PASSES: usize = 8;

/// Deterministic query cleaner backed by an immutable table snapshot.
#[derive(Debug, Clone)]
pub struct Normalizer {
    tables: Arc<NormalizerTables>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            tables: NormalizerTables::shared_default(),
        }
    }
}

/// One recorded stage of a traced normalization.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningStep {
    pub pass: usize,
    pub stage: Stage,
    pub text: String,
}

/// Stage-by-stage record of a normalization.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningTrace {
    pub original: String,
    pub steps: Vec<CleaningStep>,
    pub passes: usize,
    pub output: String,
}

/// Size comparison between a raw query and its cleaned form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningStats {
    pub original_length: usize,
    pub cleaned_length: usize,
    pub original_words: usize,
    pub cleaned_words: usize,
    pub reduction_percent: f64,
}

impl CleaningStats {
    pub fn between(original: &str, cleaned: &str) -> Self {
        let original_length = original.chars().count();
        let cleaned_length = cleaned.chars().count();
        let reduction_percent = if original_length == 0 {
            0.0
        } else {
            let raw =
                (original_length as f64 - cleaned_length as f64) / original_length as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        };
        Self {
            original_length,
            cleaned_length,
            original_words: original.split_whitespace().count(),
            cleaned_words: cleaned.split_whitespace().count(),
            reduction_percent,
        }
    }
}

impl Normalizer {
    pub fn new(tables: NormalizerTables) -> Self {
        Self {
            tables: Arc::new(tables),
        }
    }

    pub fn tables(&self) -> &NormalizerTables {
        &self.tables
    }

    /// Clean `raw` into a canonical query string. Never fails.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = raw.to_string();
        for pass in 0..MAX_PASSES {
            let next = self.run_pass(&current, pass, None);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Like [`Normalizer::normalize`] but records every stage output.
    pub fn normalize_traced(&self, raw: &str) -> CleaningTrace {
        let mut steps = Vec::new();
        let mut current = raw.to_string();
        let mut passes = 0;
        for pass in 0..MAX_PASSES {
            passes = pass + 1;
            let next = self.run_pass(&current, pass, Some(&mut steps));
            if next == current {
                break;
            }
            current = next;
        }
        CleaningTrace {
            original: raw.to_string(),
            steps,
            passes,
            output: current,
        }
    }

    fn run_pass(
        &self,
        input: &str,
        pass: usize,
        mut steps: Option<&mut Vec<CleaningStep>>,
    ) -> String {
        let mut text = input.to_string();
        for stage in Stage::ALL {
            text = stage.apply(&text, &self.tables);
            trace!(pass, stage = stage.label(), text = %text, "normalizer stage");
            if let Some(steps) = steps.as_deref_mut() {
                steps.push(CleaningStep {
                    pass,
                    stage,
                    text: text.clone(),
                });
            }
        }
        text.trim().to_string()
    }

    /// New normalizer whose snapshot also maps `wrong` to `correct` at the
    /// character-sequence stage. `self` is left untouched.
    pub fn with_char_mapping(&self, wrong: &str, correct: &str) -> Self {
        self.derive(|tables| tables.insert_char_mapping(wrong, correct))
    }

    /// New normalizer whose snapshot also maps the word sequence `wrong`.
    pub fn with_word_mapping(&self, wrong: &str, correct: &str) -> Self {
        self.derive(|tables| tables.insert_word_mapping(wrong, correct))
    }

    /// New normalizer that also collapses stuttered runs of `particle`.
    pub fn with_repeated_particle(&self, particle: &str) -> Self {
        self.derive(|tables| tables.insert_particle(particle))
    }

    fn derive(&self, edit: impl FnOnce(&mut NormalizerTables) -> bool) -> Self {
        let mut tables = (*self.tables).clone();
        if edit(&mut tables) {
            Self::new(tables)
        } else {
            self.clone()
        }
    }
}

/// Normalize with the built-in tables.
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}
