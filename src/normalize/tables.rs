// SPDX-License-Identifier: MIT OR Apache-2.0

//! Substitution tables used by the normalizer.
//!
//! A [`NormalizerTables`] value is an immutable snapshot. Adding a mapping
//! produces a new snapshot; readers holding the old one are unaffected.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::stages::canonicalize_unicode;

/// Known-wrong character sequences and their corrected form.
const CHARACTER_MAPPINGS: &[(&str, &str)] = &[
    ("ਤ੍ਯ", "ਧਿ"),
    ("ਨਾਤ੍ਯਾਂ", "ਨਾ"),
    ("ਜਾਤ੍ਯ", "ਜਾ"),
    ("ਸਂਤਮ", "ਸੰਤ"),
    ("ਪਾਂ", "ਪਾ"),
    ("ਚਾਂ", "ਚਾ"),
    ("ਮਂ", "ਮ"),
    ("ਰਂ", "ਰ"),
];

/// Words the engine commonly splits or joins incorrectly.
const WORD_MAPPINGS: &[(&str, &str)] = &[
    ("ਸੇਖ ਮਾਰੇ", "ਸੇਵਕ"),
    ("ਤਾਰੀਆ ਚੁਂ", "ਤਾਰੀਐ"),
    ("ਸਾਤਰਾ ਮਾਰੇ", "ਸਤਿਗੁਰ"),
];

/// Short particles the engine stutters on.
const REPEATED_PARTICLES: &[&str] = &["ਸ\u{0A3C}ਿ", "ਚੁਂ"];

/// Single-character tokens that carry meaning and survive noise filtering.
const SINGLE_CHAR_ALLOW: &[&str] = &["ਸ", "ਤ", "ਨ"];

/// Marks the engine emits unreliably (virama / halant).
const UNRELIABLE_MARKS: &[char] = &['\u{0A4D}'];

/// Adjacent tokens that belong to one consonant cluster.
const CONJUNCT_PAIRS: &[(&str, &str)] = &[("ਸ", "ਤ"), ("ਗ", "ੁਰ"), ("ਪ", "ਰ")];

/// Function words that do not help matching.
const STOP_WORDS: &[&str] = &["ਹੈ", "ਹੋ", "ਨੈ", "ਤੇ", "ਦੇ", "ਨੂੰ"];

pub(crate) static DEFAULT_TABLES: Lazy<Arc<NormalizerTables>> =
    Lazy::new(|| Arc::new(NormalizerTables::builtin()));

/// A particle together with the pattern that matches its repeated runs.
#[derive(Debug, Clone)]
pub struct RepeatedParticle {
    pub particle: String,
    pub(crate) pattern: Regex,
}

impl RepeatedParticle {
    fn new(particle: &str) -> Option<Self> {
        let particle = canonicalize_unicode(particle.trim());
        if particle.is_empty() {
            return None;
        }
        let escaped = regex::escape(&particle);
        let pattern = Regex::new(&format!("{escaped}(?:\\s*{escaped})+")).ok()?;
        Some(Self { particle, pattern })
    }
}

/// Immutable snapshot of every table the pipeline consults.
#[derive(Debug, Clone)]
pub struct NormalizerTables {
    /// Sorted longest key first so the first hit is the longest match.
    pub(crate) char_mappings: Vec<(String, String)>,
    /// Keys pre-split into tokens, most tokens first.
    pub(crate) word_mappings: Vec<(Vec<String>, String)>,
    pub(crate) repeated_particles: Vec<RepeatedParticle>,
    pub(crate) single_char_allow: BTreeSet<String>,
    pub(crate) unreliable_marks: BTreeSet<char>,
    pub(crate) conjunct_pairs: Vec<(String, String)>,
    pub(crate) stop_words: BTreeSet<String>,
}

impl NormalizerTables {
    /// Tables for Gurmukhi speech-to-text output.
    pub fn builtin() -> Self {
        let mut tables = Self {
            char_mappings: Vec::new(),
            word_mappings: Vec::new(),
            repeated_particles: REPEATED_PARTICLES
                .iter()
                .filter_map(|p| RepeatedParticle::new(p))
                .collect(),
            single_char_allow: SINGLE_CHAR_ALLOW.iter().map(|s| canonicalize_unicode(s)).collect(),
            unreliable_marks: UNRELIABLE_MARKS.iter().copied().collect(),
            conjunct_pairs: CONJUNCT_PAIRS
                .iter()
                .map(|(a, b)| (canonicalize_unicode(a), canonicalize_unicode(b)))
                .collect(),
            stop_words: STOP_WORDS.iter().map(|s| canonicalize_unicode(s)).collect(),
        };
        for (wrong, correct) in CHARACTER_MAPPINGS {
            tables.insert_char_mapping(wrong, correct);
        }
        for (wrong, correct) in WORD_MAPPINGS {
            tables.insert_word_mapping(wrong, correct);
        }
        tables
    }

    /// Shared handle to the built-in snapshot.
    pub fn shared_default() -> Arc<NormalizerTables> {
        Arc::clone(&DEFAULT_TABLES)
    }

    pub fn char_mapping_count(&self) -> usize {
        self.char_mappings.len()
    }

    pub fn word_mapping_count(&self) -> usize {
        self.word_mappings.len()
    }

    pub fn particles(&self) -> impl Iterator<Item = &str> {
        self.repeated_particles.iter().map(|p| p.particle.as_str())
    }

    pub(crate) fn insert_char_mapping(&mut self, wrong: &str, correct: &str) -> bool {
        let wrong = canonicalize_unicode(wrong);
        if wrong.is_empty() {
            return false;
        }
        let correct = canonicalize_unicode(correct);
        self.char_mappings.retain(|(key, _)| key != &wrong);
        self.char_mappings.push((wrong, correct));
        self.char_mappings.sort_by(|(a, _), (b, _)| {
            b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b))
        });
        true
    }

    pub(crate) fn insert_word_mapping(&mut self, wrong: &str, correct: &str) -> bool {
        let key: Vec<String> = canonicalize_unicode(wrong)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if key.is_empty() {
            return false;
        }
        let correct = canonicalize_unicode(correct)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        self.word_mappings.retain(|(existing, _)| existing != &key);
        self.word_mappings.push((key, correct));
        self.word_mappings
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        true
    }

    pub(crate) fn insert_particle(&mut self, particle: &str) -> bool {
        let Some(entry) = RepeatedParticle::new(particle) else {
            return false;
        };
        if self
            .repeated_particles
            .iter()
            .any(|existing| existing.particle == entry.particle)
        {
            return false;
        }
        self.repeated_particles.push(entry);
        true
    }
}

impl Default for NormalizerTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_mappings_are_sorted_longest_first() {
        let tables = NormalizerTables::builtin();
        let lengths: Vec<usize> = tables
            .char_mappings
            .iter()
            .map(|(key, _)| key.chars().count())
            .collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn replacing_a_mapping_keeps_one_entry() {
        let mut tables = NormalizerTables::builtin();
        let before = tables.char_mapping_count();
        assert!(tables.insert_char_mapping("ਮਂ", "ਮੰ"));
        assert_eq!(tables.char_mapping_count(), before);
    }

    #[test]
    fn empty_keys_are_rejected() {
        let mut tables = NormalizerTables::builtin();
        assert!(!tables.insert_char_mapping("", "ਕ"));
        assert!(!tables.insert_word_mapping("   ", "ਕ"));
        assert!(!tables.insert_particle(" "));
    }

    #[test]
    fn duplicate_particles_are_ignored() {
        let mut tables = NormalizerTables::builtin();
        assert!(!tables.insert_particle("ਚੁਂ"));
        assert!(tables.insert_particle("ਵਾਹੁ"));
        assert_eq!(tables.particles().count(), 3);
    }
}
