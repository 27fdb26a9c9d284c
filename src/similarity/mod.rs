// SPDX-License-Identifier: MIT OR Apache-2.0

//! Similarity primitives. Every score is an `f64` in `[0, 1]`.

pub mod edit_distance;
pub mod ngram;
pub mod ratio;

use serde::Serialize;

use crate::phonetic::ConfusionModel;
use crate::search::MatchOptions;

pub use edit_distance::{bounded_phonetic_similarity, phonetic_similarity, weighted_distance};
pub use ngram::{character_ngrams, jaccard, ngram_similarity};
pub use ratio::{
    bounded_partial_ratio, bounded_weighted_ratio, partial_ratio, ratio, token_set_ratio,
    token_sort_ratio, weighted_ratio,
};

/// Every primitive applied to one pair of strings, for side-by-side
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub ngram: f64,
    /// `None` when either side is longer than the edit-distance ceiling.
    pub edit_distance: Option<f64>,
    pub ratio: f64,
    /// `None` when either side is longer than the ratio ceiling.
    pub partial_ratio: Option<f64>,
    pub token_sort_ratio: f64,
    pub token_set_ratio: f64,
    /// `None` when either side is longer than the ratio ceiling.
    pub weighted_ratio: Option<f64>,
}

impl ScoreBreakdown {
    pub fn compute(a: &str, b: &str, options: &MatchOptions) -> Self {
        Self {
            ngram: ngram_similarity(a, b, options.ngram_size),
            edit_distance: bounded_phonetic_similarity(
                a,
                b,
                ConfusionModel::gurmukhi(),
                options.edit_distance_max_len,
            ),
            ratio: ratio(a, b),
            partial_ratio: bounded_partial_ratio(a, b, options.ratio_max_len),
            token_sort_ratio: token_sort_ratio(a, b),
            token_set_ratio: token_set_ratio(a, b),
            weighted_ratio: bounded_weighted_ratio(a, b, options.ratio_max_len),
        }
    }

    /// Highest of the scores the matcher ranks by.
    pub fn best(&self) -> f64 {
        self.ngram
            .max(self.edit_distance.unwrap_or(0.0))
            .max(self.weighted_ratio.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn breakdown_of_identical_lines_is_all_ones() {
        let line = "ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥";
        let breakdown = ScoreBreakdown::compute(line, line, &MatchOptions::default());
        assert_eq!(breakdown.ngram, 1.0);
        assert_eq!(breakdown.edit_distance, Some(1.0));
        assert_eq!(breakdown.weighted_ratio, Some(1.0));
        assert_eq!(breakdown.best(), 1.0);
    }

    #[test]
    fn breakdown_skips_edit_distance_past_ceiling() {
        let options = MatchOptions {
            edit_distance_max_len: 3,
            ..MatchOptions::default()
        };
        let breakdown = ScoreBreakdown::compute("ਆਦਿ ਸਚੁ", "ਆਦਿ ਸਚੁ", &options);
        assert_eq!(breakdown.edit_distance, None);
        assert_eq!(breakdown.best(), 1.0);
    }

    #[test]
    fn breakdown_skips_partial_ratios_past_ceiling() {
        let options = MatchOptions {
            ratio_max_len: 5,
            ..MatchOptions::default()
        };
        let breakdown = ScoreBreakdown::compute("ਆਦਿ ਸਚੁ", "ਆਦਿ ਸਚੁ", &options);
        assert_eq!(breakdown.partial_ratio, None);
        assert_eq!(breakdown.weighted_ratio, None);
        assert_eq!(breakdown.ratio, 1.0);
        assert_eq!(breakdown.best(), 1.0);
    }

    proptest! {
        #[test]
        fn primitives_score_self_as_one(text in "[\u{0A05}-\u{0A39}\u{0A3E}-\u{0A4C} ]{1,30}") {
            let model = ConfusionModel::gurmukhi();
            prop_assert_eq!(ngram_similarity(&text, &text, 3), 1.0);
            prop_assert_eq!(phonetic_similarity(&text, &text, model), 1.0);
            prop_assert_eq!(weighted_ratio(&text, &text), 1.0);
        }

        #[test]
        fn primitives_stay_in_unit_interval(a in ".{0,24}", b in ".{0,24}") {
            let model = ConfusionModel::gurmukhi();
            for score in [
                ngram_similarity(&a, &b, 3),
                phonetic_similarity(&a, &b, model),
                weighted_ratio(&a, &b),
                token_set_ratio(&a, &b),
            ] {
                prop_assert!((0.0..=1.0).contains(&score));
            }
        }
    }
}
