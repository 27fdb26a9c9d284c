// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character n-gram overlap (Jaccard) restricted to Gurmukhi code points.

use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Gurmukhi block. Spaces, punctuation and stray Latin are ignored.
pub const GURMUKHI_RANGE: RangeInclusive<char> = '\u{0A00}'..='\u{0A7F}';

/// Default n-gram window.
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// Distinct n-grams of the Gurmukhi characters in `text`.
///
/// A filtered text shorter than `n` (but not empty) yields itself as the
/// single gram, so short words still compare.
pub fn character_ngrams(text: &str, n: usize) -> HashSet<String> {
    let n = n.max(1);
    let filtered: Vec<char> = text.chars().filter(|c| GURMUKHI_RANGE.contains(c)).collect();
    if filtered.is_empty() {
        return HashSet::new();
    }
    if filtered.len() < n {
        return HashSet::from([filtered.iter().collect()]);
    }
    filtered.windows(n).map(|w| w.iter().collect()).collect()
}

/// Jaccard index of the two n-gram sets. Both empty is a perfect match,
/// exactly one empty is no match.
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f64 {
    jaccard(&character_ngrams(a, n), &character_ngrams(b, n))
}

/// Jaccard index of two gram sets built with [`character_ngrams`].
pub fn jaccard(left: &HashSet<String>, right: &HashSet<String>) -> f64 {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }
    let intersection = left.intersection(right).count();
    let union = left.len() + right.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
