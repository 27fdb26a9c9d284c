// SPDX-License-Identifier: MIT OR Apache-2.0

//! Individual pipeline stages. Every function here is pure and total.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::tables::{NormalizerTables, RepeatedParticle};

/// Tokens made only of three or more symbols (`॥॥॥`, `...`).
static SYMBOL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\w\s]{3,}$").expect("valid regex"));

/// Kept fraction of tokens below which stop-word removal is abandoned.
const STOP_WORD_FLOOR_NUM: usize = 3;
const STOP_WORD_FLOOR_DEN: usize = 10;

/// Decompose then recompose so visually identical input compares equal.
pub fn canonicalize_unicode(text: &str) -> String {
    text.nfd().nfc().collect()
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse stuttered characters.
///
/// Any character repeated three or more times becomes one occurrence. A
/// combining mark repeated twice or more also becomes one: a doubled vowel
/// sign or addak never occurs in valid text.
pub fn collapse_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1usize;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let keep = if run >= 3 || (run >= 2 && is_combining_mark(c)) {
            1
        } else {
            run
        };
        for _ in 0..keep {
            out.push(c);
        }
    }
    out
}

/// Replace known-wrong character sequences, longest match first, scanning
/// left to right without overlap. `mappings` must be sorted longest key first.
pub fn substitute_sequences(text: &str, mappings: &[(String, String)]) -> String {
    if mappings.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    'scan: while pos < text.len() {
        let rest = &text[pos..];
        for (wrong, correct) in mappings {
            if rest.starts_with(wrong.as_str()) {
                out.push_str(correct);
                pos += wrong.len();
                continue 'scan;
            }
        }
        // `pos` always sits on a char boundary: it only advances by whole
        // keys or whole chars.
        let c = rest.chars().next().unwrap_or_default();
        out.push(c);
        pos += c.len_utf8().max(1);
    }
    out
}

/// Replace known-wrong word sequences on token boundaries.
pub fn substitute_words(text: &str, mappings: &[(Vec<String>, String)]) -> String {
    if mappings.is_empty() {
        return text.to_string();
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    'scan: while i < tokens.len() {
        for (wrong, correct) in mappings {
            let end = i + wrong.len();
            if end <= tokens.len()
                && tokens[i..end]
                    .iter()
                    .zip(wrong)
                    .all(|(a, b)| *a == b.as_str())
            {
                if !correct.is_empty() {
                    out.push(correct.as_str());
                }
                i = end;
                continue 'scan;
            }
        }
        out.push(tokens[i]);
        i += 1;
    }
    out.join(" ")
}

/// Collapse a stuttered particle (`ਸ਼ਿ ਸ਼ਿ ਸ਼ਿ`) to one instance.
pub fn collapse_repeated_particles(text: &str, particles: &[RepeatedParticle]) -> String {
    let mut current = text.to_string();
    for entry in particles {
        if entry.pattern.is_match(&current) {
            current = entry
                .pattern
                .replace_all(&current, entry.particle.as_str())
                .into_owned();
        }
    }
    current
}

/// Drop single-character artifacts and symbol-only tokens.
pub fn drop_noise_tokens(text: &str, single_char_allow: &BTreeSet<String>) -> String {
    text.split_whitespace()
        .filter(|token| token.chars().count() > 1 || single_char_allow.contains(*token))
        .filter(|token| !SYMBOL_RUN.is_match(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove only the marks the transcription engine emits unreliably.
pub fn strip_unreliable_marks(text: &str, marks: &BTreeSet<char>) -> String {
    text.chars().filter(|c| !marks.contains(c)).collect()
}

/// Merge adjacent token pairs that belong to one consonant cluster.
pub fn rejoin_conjuncts(text: &str, pairs: &[(String, String)]) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len()
            && pairs
                .iter()
                .any(|(left, right)| tokens[i] == left.as_str() && tokens[i + 1] == right.as_str())
        {
            out.push(format!("{}{}", tokens[i], tokens[i + 1]));
            i += 2;
        } else {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }
    out.join(" ")
}

/// Remove function words unless fewer than 30% of the tokens would remain.
pub fn filter_stop_words(text: &str, stop_words: &BTreeSet<String>) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let kept: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|token| !stop_words.contains(*token))
        .collect();
    if kept.len() * STOP_WORD_FLOOR_DEN < tokens.len() * STOP_WORD_FLOOR_NUM {
        return text.to_string();
    }
    kept.join(" ")
}

/// The pipeline stages, in contract order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Unicode,
    Whitespace,
    RepeatedCharacters,
    CharacterMappings,
    WordMappings,
    RepeatedParticles,
    NoiseTokens,
    UnreliableMarks,
    Conjuncts,
    StopWords,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::Unicode,
        Stage::Whitespace,
        Stage::RepeatedCharacters,
        Stage::CharacterMappings,
        Stage::WordMappings,
        Stage::RepeatedParticles,
        Stage::NoiseTokens,
        Stage::UnreliableMarks,
        Stage::Conjuncts,
        Stage::StopWords,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Unicode => "unicode normalization",
            Stage::Whitespace => "whitespace normalization",
            Stage::RepeatedCharacters => "fix repeated characters",
            Stage::CharacterMappings => "character mappings",
            Stage::WordMappings => "word mappings",
            Stage::RepeatedParticles => "normalize repeated patterns",
            Stage::NoiseTokens => "aggressive cleaning",
            Stage::UnreliableMarks => "remove diacritics selectively",
            Stage::Conjuncts => "normalize conjuncts",
            Stage::StopWords => "extract content words",
        }
    }

    pub(crate) fn apply(self, text: &str, tables: &NormalizerTables) -> String {
        match self {
            Stage::Unicode => canonicalize_unicode(text),
            Stage::Whitespace => collapse_whitespace(text),
            Stage::RepeatedCharacters => collapse_runs(text),
            Stage::CharacterMappings => substitute_sequences(text, &tables.char_mappings),
            Stage::WordMappings => substitute_words(text, &tables.word_mappings),
            Stage::RepeatedParticles => {
                collapse_repeated_particles(text, &tables.repeated_particles)
            }
            Stage::NoiseTokens => drop_noise_tokens(text, &tables.single_char_allow),
            Stage::UnreliableMarks => strip_unreliable_marks(text, &tables.unreliable_marks),
            Stage::Conjuncts => rejoin_conjuncts(text, &tables.conjunct_pairs),
            Stage::StopWords => filter_stop_words(text, &tables.stop_words),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unicode_canonicalization_composes_nukta_forms_consistently() {
        // U+0A36 is a composition exclusion: NFC keeps it decomposed.
        assert_eq!(canonicalize_unicode("\u{0A36}"), "ਸ\u{0A3C}");
        assert_eq!(canonicalize_unicode("ਸ\u{0A3C}"), "ਸ\u{0A3C}");
    }

    #[test]
    fn whitespace_collapse_trims_and_squeezes() {
        assert_eq!(collapse_whitespace("  ਆਦਿ \t\n ਸਚੁ  "), "ਆਦਿ ਸਚੁ");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn runs_of_three_collapse_but_pairs_of_letters_survive() {
        assert_eq!(collapse_runs("ਆਆਆਦਿ"), "ਆਦਿ");
        assert_eq!(collapse_runs("ਨਨ"), "ਨਨ");
        assert_eq!(collapse_runs("aaab"), "ab");
    }

    #[test]
    fn doubled_combining_marks_collapse() {
        assert_eq!(collapse_runs("ਪੱੱਾਦ"), "ਪੱਾਦ");
        assert_eq!(collapse_runs("ਸਾਾਚ"), "ਸਾਚ");
    }

    #[test]
    fn sequence_substitution_prefers_longest_key() {
        let mappings = vec![
            ("abc".to_string(), "X".to_string()),
            ("ab".to_string(), "Y".to_string()),
        ];
        assert_eq!(substitute_sequences("abcab", &mappings), "XY");
        assert_eq!(substitute_sequences("zzz", &mappings), "zzz");
    }

    #[test]
    fn sequence_substitution_does_not_rescan_output() {
        let mappings = vec![("ab".to_string(), "a".to_string())];
        assert_eq!(substitute_sequences("abb", &mappings), "ab");
    }

    #[test]
    fn word_substitution_respects_token_boundaries() {
        let mappings = vec![(
            vec!["ਸੇਖ".to_string(), "ਮਾਰੇ".to_string()],
            "ਸੇਵਕ".to_string(),
        )];
        assert_eq!(substitute_words("ਗੁਰ ਸੇਖ ਮਾਰੇ ਨਾਮ", &mappings), "ਗੁਰ ਸੇਵਕ ਨਾਮ");
        assert_eq!(substitute_words("ਗੁਰਸੇਖ ਮਾਰੇ", &mappings), "ਗੁਰਸੇਖ ਮਾਰੇ");
    }

    #[test]
    fn noise_filter_keeps_allowed_single_characters() {
        let allow = set(&["ਸ", "ਤ", "ਨ"]);
        assert_eq!(drop_noise_tokens("ਕ ਸ ਨਾਮ ਤ", &allow), "ਸ ਨਾਮ ਤ");
    }

    #[test]
    fn noise_filter_drops_symbol_runs() {
        let allow = set(&[]);
        assert_eq!(drop_noise_tokens("ਨਾਮ ... ॥॥॥ ॥੧॥", &allow), "ਨਾਮ ॥੧॥");
    }

    #[test]
    fn only_halant_is_stripped() {
        let marks: BTreeSet<char> = ['\u{0A4D}'].into_iter().collect();
        assert_eq!(strip_unreliable_marks("ਤ੍ਰਿ", &marks), "ਤਰਿ");
        assert_eq!(strip_unreliable_marks("ਸਚੁ", &marks), "ਸਚੁ");
    }

    #[test]
    fn conjunct_pairs_merge_whole_tokens_only() {
        let pairs = vec![("ਸ".to_string(), "ਤ".to_string())];
        assert_eq!(rejoin_conjuncts("ਸ ਤ ਨਾਮ", &pairs), "ਸਤ ਨਾਮ");
        assert_eq!(rejoin_conjuncts("ਦਾਸ ਤੇਰਾ", &pairs), "ਦਾਸ ਤੇਰਾ");
    }

    #[test]
    fn stop_words_removed_when_enough_content_remains() {
        let stops = set(&["ਹੈ", "ਹੋ"]);
        assert_eq!(filter_stop_words("ਸਚੁ ਹੈ ਨਾਮ", &stops), "ਸਚੁ ਨਾਮ");
    }

    #[test]
    fn stop_word_floor_keeps_short_queries_intact() {
        let stops = set(&["ਹੈ", "ਹੋ"]);
        // 1 of 4 kept is 25%, below the floor.
        assert_eq!(filter_stop_words("ਹੈ ਹੋ ਹੈ ਨਾਮ", &stops), "ਹੈ ਹੋ ਹੈ ਨਾਮ");
        assert_eq!(filter_stop_words("ਹੈ", &stops), "ਹੈ");
    }

    #[test]
    fn stages_are_listed_in_contract_order() {
        assert_eq!(Stage::ALL.first(), Some(&Stage::Unicode));
        assert_eq!(Stage::ALL.last(), Some(&Stage::StopWords));
        assert_eq!(Stage::ALL.len(), 10);
    }
}
