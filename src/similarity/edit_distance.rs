// SPDX-License-Identifier: MIT OR Apache-2.0

//! Edit distance with cheap substitutions between confusable characters.

use crate::phonetic::ConfusionModel;

/// Substitution cost for a phonetically confusable pair.
pub const CONFUSABLE_SUBSTITUTION_COST: f64 = 0.5;

/// Default ceiling (in characters) above which callers skip this scorer.
pub const DEFAULT_EDIT_DISTANCE_MAX_LEN: usize = 200;

/// Weighted Levenshtein distance. Insert and delete cost 1.0; substitution
/// costs 0 for equal characters, 0.5 for confusable ones and 1.0 otherwise.
///
/// Quadratic in time; keeps only two rows of the table.
pub fn weighted_distance(a: &str, b: &str, model: &ConfusionModel) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len() as f64;
    }
    if b.is_empty() {
        return a.len() as f64;
    }

    let mut prev: Vec<f64> = (0..=b.len()).map(|j| j as f64).collect();
    let mut curr = vec![0.0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = (i + 1) as f64;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = if ca == cb {
                0.0
            } else if model.similar(ca, cb) {
                CONFUSABLE_SUBSTITUTION_COST
            } else {
                1.0
            };
            curr[j + 1] = (prev[j + 1] + 1.0)
                .min(curr[j] + 1.0)
                .min(prev[j] + substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / max(len)`, clamped to [0, 1]. Both empty scores 1.0.
pub fn phonetic_similarity(a: &str, b: &str, model: &ConfusionModel) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = weighted_distance(a, b, model);
    (1.0 - distance / max_len as f64).clamp(0.0, 1.0)
}

/// [`phonetic_similarity`] unless either side exceeds `max_len` characters.
pub fn bounded_phonetic_similarity(
    a: &str,
    b: &str,
    model: &ConfusionModel,
    max_len: usize,
) -> Option<f64> {
    if a.chars().count() > max_len || b.chars().count() > max_len {
        return None;
    }
    Some(phonetic_similarity(a, b, model))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> &'static ConfusionModel {
        ConfusionModel::gurmukhi()
    }

    #[test]
    fn plain_edits_cost_one() {
        assert_eq!(weighted_distance("kitten", "sitting", model()), 3.0);
        assert_eq!(weighted_distance("", "abc", model()), 3.0);
        assert_eq!(weighted_distance("abc", "", model()), 3.0);
    }

    #[test]
    fn confusable_substitution_costs_half() {
        assert_eq!(weighted_distance("ਕਰ", "ਗਰ", model()), 0.5);
        assert_eq!(weighted_distance("ਕਰ", "ਮਰ", model()), 1.0);
    }

    #[test]
    fn similarity_normalizes_by_longer_side() {
        let score = phonetic_similarity("ਕਰ", "ਗਰ", model());
        assert!((score - 0.75).abs() < 1e-9);
        assert_eq!(phonetic_similarity("", "", model()), 1.0);
        assert_eq!(phonetic_similarity("ਸਚੁ", "ਸਚੁ", model()), 1.0);
        assert_eq!(phonetic_similarity("ab", "xyz", model()), 0.0);
    }

    #[test]
    fn ceiling_skips_long_inputs() {
        let long = "ਕ".repeat(201);
        assert!(bounded_phonetic_similarity(&long, "ਕ", model(), 200).is_none());
        assert_eq!(bounded_phonetic_similarity("ਕ", "ਕ", model(), 200), Some(1.0));
    }
}
