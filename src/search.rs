// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered search over a reference corpus
//!
//! A raw query is normalized first. The exact path hands the cleaned text to
//! the store's token index. The fuzzy path fetches a bounded window of lines
//! and scores each one against every query variant with every similarity
//! primitive, keeping the best (score, strategy) per line.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::errors::{MatchError, Result};
use crate::normalize::Normalizer;
use crate::phonetic::ConfusionModel;
use crate::similarity::{
    bounded_phonetic_similarity, bounded_weighted_ratio, character_ngrams,
    edit_distance::DEFAULT_EDIT_DISTANCE_MAX_LEN, jaccard, ngram::DEFAULT_NGRAM_SIZE,
    ratio::DEFAULT_RATIO_MAX_LEN,
};
use crate::store::{CorpusStore, ReferenceLine};
use crate::variants::variants;

pub const MAX_LIMIT: usize = 1000;
pub const MAX_WINDOW_CAP: usize = 100_000;
pub const DEFAULT_WINDOW_CAP: usize = 500;
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.3;

/// Word-level matches only count above this 2-gram similarity.
pub const WORD_PARTIAL_FLOOR: f64 = 0.7;
const WORD_PARTIAL_NGRAM_SIZE: usize = 2;
/// Query words this short are too ambiguous for word-level matching.
const WORD_PARTIAL_MIN_CHARS: usize = 2;

/// Tunable knobs of the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Lines fetched from the store for fuzzy scoring.
    pub window_cap: usize,
    pub ngram_size: usize,
    /// Edit distance is skipped when either side is longer than this.
    pub edit_distance_max_len: usize,
    /// Weighted ratio is skipped when either side is longer than this.
    pub ratio_max_len: usize,
    /// Threshold used by callers that do not pass one explicitly.
    pub min_similarity: f64,
    /// Result count used by callers that do not pass one explicitly.
    pub limit: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            window_cap: DEFAULT_WINDOW_CAP,
            ngram_size: DEFAULT_NGRAM_SIZE,
            edit_distance_max_len: DEFAULT_EDIT_DISTANCE_MAX_LEN,
            ratio_max_len: DEFAULT_RATIO_MAX_LEN,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Which scorer produced a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Ngram,
    EditDistance,
    WeightedRatio,
    WordPartial,
}

impl MatchStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Ngram => "ngram",
            Self::EditDistance => "edit_distance",
            Self::WeightedRatio => "weighted_ratio",
            Self::WordPartial => "word_partial",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reference line with the best score any (variant, scorer) pair gave it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub line: ReferenceLine,
    pub score: f64,
    pub strategy: MatchStrategy,
    /// Query variant (or word pair) that produced the score.
    pub matched: String,
}

/// Ranked candidates plus the number that met the threshold before
/// truncation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub candidates: Vec<MatchCandidate>,
    pub total: usize,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Running best score for one line. The first evaluated score is always
/// taken; after that only strictly greater scores replace it.
struct Best {
    score: f64,
    strategy: MatchStrategy,
    matched: String,
}

fn offer(
    best: &mut Option<Best>,
    score: f64,
    strategy: MatchStrategy,
    matched: impl FnOnce() -> String,
) {
    if best.as_ref().map_or(true, |b| score > b.score) {
        *best = Some(Best {
            score,
            strategy,
            matched: matched(),
        });
    }
}

struct PreparedVariant {
    text: String,
    grams: HashSet<String>,
    /// Indices into `PreparedQuery::words` first seen in this variant.
    new_words: Vec<usize>,
}

struct PreparedWord {
    text: String,
    grams: HashSet<String>,
}

/// Query variants with their n-gram sets built once per search.
///
/// Each distinct word belongs to the first variant containing it; a repeat
/// can only offer a score the running best already holds.
struct PreparedQuery {
    variants: Vec<PreparedVariant>,
    words: Vec<PreparedWord>,
}

impl PreparedQuery {
    fn new(normalized: &str, ngram_size: usize) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut words = Vec::new();
        let variants = variants(normalized)
            .into_iter()
            .map(|text| {
                let mut new_words = Vec::new();
                for word in text.split_whitespace() {
                    let too_short = word.chars().count() <= WORD_PARTIAL_MIN_CHARS;
                    if too_short || !seen.insert(word.to_string()) {
                        continue;
                    }
                    new_words.push(words.len());
                    words.push(PreparedWord {
                        text: word.to_string(),
                        grams: character_ngrams(word, WORD_PARTIAL_NGRAM_SIZE),
                    });
                }
                PreparedVariant {
                    grams: character_ngrams(&text, ngram_size),
                    text,
                    new_words,
                }
            })
            .collect();
        Self { variants, words }
    }
}

/// Score `text` against every variant. Scorer order within a variant is
/// n-gram, edit distance, weighted ratio, then word-level partial.
fn score_line(
    text: &str,
    query: &PreparedQuery,
    options: &MatchOptions,
    model: &ConfusionModel,
) -> Option<Best> {
    let line_grams = character_ngrams(text, options.ngram_size);
    let line_words: Vec<(&str, HashSet<String>)> = text
        .split_whitespace()
        .map(|word| (word, character_ngrams(word, WORD_PARTIAL_NGRAM_SIZE)))
        .collect();
    let mut best = None;

    for variant in &query.variants {
        let ngram = jaccard(&variant.grams, &line_grams);
        offer(&mut best, ngram, MatchStrategy::Ngram, || variant.text.clone());

        if let Some(edit) =
            bounded_phonetic_similarity(&variant.text, text, model, options.edit_distance_max_len)
        {
            offer(&mut best, edit, MatchStrategy::EditDistance, || variant.text.clone());
        }

        if let Some(ratio) = bounded_weighted_ratio(&variant.text, text, options.ratio_max_len) {
            offer(&mut best, ratio, MatchStrategy::WeightedRatio, || variant.text.clone());
        }

        for word in variant.new_words.iter().map(|&i| &query.words[i]) {
            for (line_word, grams) in &line_words {
                let similarity = jaccard(&word.grams, grams);
                if similarity > WORD_PARTIAL_FLOOR {
                    offer(&mut best, similarity, MatchStrategy::WordPartial, || {
                        format!("{} → {line_word}", word.text)
                    });
                }
            }
        }
    }
    best
}

/// Query orchestrator over a [`CorpusStore`].
#[derive(Debug, Clone)]
pub struct Matcher<S> {
    store: S,
    normalizer: Normalizer,
    options: MatchOptions,
}

impl<S: CorpusStore> Matcher<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, MatchOptions::default())
    }

    pub fn with_options(store: S, options: MatchOptions) -> Self {
        Self {
            store,
            normalizer: Normalizer::default(),
            options,
        }
    }

    /// Replace the normalizer, e.g. one with extra mappings.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Search for `raw`.
    ///
    /// With `use_fuzzy == false` only the store's exact index is consulted.
    /// With `use_fuzzy == true` the window is scored and exact hits get no
    /// special treatment; see [`Matcher::search_preferring_exact`].
    pub fn search(
        &self,
        raw: &str,
        limit: usize,
        use_fuzzy: bool,
        min_similarity: f64,
    ) -> Result<SearchResult> {
        self.validate(limit, min_similarity)?;
        let normalized = self.normalizer.normalize(raw);
        if normalized.is_empty() {
            debug!("query normalized to nothing");
            return Ok(SearchResult::empty());
        }

        if use_fuzzy {
            self.fuzzy(&normalized, limit, min_similarity)
        } else {
            self.exact(&normalized, limit)
        }
    }

    /// Exact lookup first; the fuzzy path runs only when it finds nothing.
    pub fn search_preferring_exact(
        &self,
        raw: &str,
        limit: usize,
        min_similarity: f64,
    ) -> Result<SearchResult> {
        let exact = self.search(raw, limit, false, min_similarity)?;
        if !exact.is_empty() {
            return Ok(exact);
        }
        self.search(raw, limit, true, min_similarity)
    }

    fn validate(&self, limit: usize, min_similarity: f64) -> Result<()> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(MatchError::ResourceExceeded {
                what: "limit",
                value: limit,
                max: MAX_LIMIT,
            });
        }
        let cap = self.options.window_cap;
        if !(1..=MAX_WINDOW_CAP).contains(&cap) {
            return Err(MatchError::ResourceExceeded {
                what: "window_cap",
                value: cap,
                max: MAX_WINDOW_CAP,
            });
        }
        if !min_similarity.is_finite() || !(0.0..=1.0).contains(&min_similarity) {
            return Err(MatchError::InvalidInput(format!(
                "min_similarity must be within [0, 1], got {min_similarity}"
            )));
        }
        if self.options.ngram_size == 0 {
            return Err(MatchError::InvalidInput("ngram_size must be at least 1".to_string()));
        }
        Ok(())
    }

    fn exact(&self, normalized: &str, limit: usize) -> Result<SearchResult> {
        let (lines, total) = self.store.lookup_exact(normalized, limit, 0)?;
        debug!(query = normalized, hits = lines.len(), total, "exact search");
        let candidates = lines
            .into_iter()
            .map(|line| MatchCandidate {
                line,
                score: 1.0,
                strategy: MatchStrategy::Exact,
                matched: normalized.to_string(),
            })
            .collect();
        Ok(SearchResult { candidates, total })
    }

    fn fuzzy(&self, normalized: &str, limit: usize, min_similarity: f64) -> Result<SearchResult> {
        let window = self.store.fetch_window(self.options.window_cap)?;
        let query = PreparedQuery::new(normalized, self.options.ngram_size);
        let model = ConfusionModel::gurmukhi();
        let options = &self.options;

        let mut scored: Vec<(usize, MatchCandidate)> = window
            .into_par_iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let best = score_line(&line.text, &query, options, model)?;
                (best.score >= min_similarity).then(|| {
                    (
                        index,
                        MatchCandidate {
                            line,
                            score: best.score,
                            strategy: best.strategy,
                            matched: best.matched,
                        },
                    )
                })
            })
            .collect();

        scored.sort_by(|(ia, a), (ib, b)| b.score.total_cmp(&a.score).then(ia.cmp(ib)));
        let total = scored.len();
        scored.truncate(limit);

        debug!(
            query = normalized,
            variants = query.variants.len(),
            kept = total,
            returned = scored.len(),
            "fuzzy search"
        );
        Ok(SearchResult {
            candidates: scored.into_iter().map(|(_, candidate)| candidate).collect(),
            total,
        })
    }
}
