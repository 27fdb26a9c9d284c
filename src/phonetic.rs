// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phonetic confusion model for Gurmukhi
//!
//! Characters that a speech-to-text engine routinely swaps for one another
//! are grouped together. Groups may overlap; two characters are similar when
//! the union of the groups each belongs to intersects.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

/// Hand-curated confusion groups.
const GURMUKHI_GROUPS: &[&[char]] = &[
    // Vowel signs: i / e / ai, u / uu, o / au
    &['ਿ', 'ੇ', 'ੈ'],
    &['ੁ', 'ੂ'],
    &['ੋ', 'ੌ'],
    // Nasalisation: bindi / tippi
    &['ਂ', 'ੰ'],
    // Voiced / unvoiced
    &['ਕ', 'ਗ'],
    &['ਤ', 'ਦ'],
    &['ਪ', 'ਬ'],
    // Unaspirated / aspirated
    &['ਕ', 'ਖ'],
    &['ਗ', 'ਘ'],
    &['ਚ', 'ਛ'],
    &['ਜ', 'ਝ'],
    &['ਟ', 'ਠ'],
    &['ਡ', 'ਢ'],
    &['ਤ', 'ਥ'],
    &['ਦ', 'ਧ'],
    &['ਪ', 'ਫ'],
    &['ਬ', 'ਭ'],
    // Sibilants and nukta forms
    &['ਸ', '\u{0A36}'], // sa / sha
    &['ਜ', '\u{0A5B}'], // ja / za
];

static GURMUKHI: Lazy<ConfusionModel> = Lazy::new(|| ConfusionModel::from_groups(GURMUKHI_GROUPS));

/// Immutable lookup table from a character to every character it may be
/// confused with (itself included).
#[derive(Debug, Clone)]
pub struct ConfusionModel {
    index: HashMap<char, BTreeSet<char>>,
}

impl ConfusionModel {
    /// Build a model from groups. Membership is made symmetric: each
    /// character maps to the union of all groups it appears in.
    pub fn from_groups(groups: &[&[char]]) -> Self {
        let mut index: HashMap<char, BTreeSet<char>> = HashMap::new();
        for group in groups {
            for &member in group.iter() {
                let entry = index.entry(member).or_default();
                entry.insert(member);
                entry.extend(group.iter().copied());
            }
        }
        Self { index }
    }

    /// The built-in Gurmukhi model.
    pub fn gurmukhi() -> &'static ConfusionModel {
        &GURMUKHI
    }

    /// Characters confusable with `c`, defaulting to `{c}` when untracked.
    pub fn variants(&self, c: char) -> BTreeSet<char> {
        self.index
            .get(&c)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([c]))
    }

    /// True when the confusion sets of `a` and `b` intersect.
    pub fn similar(&self, a: char, b: char) -> bool {
        if a == b {
            return true;
        }
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(left), Some(right)) => !left.is_disjoint(right),
            (Some(left), None) => left.contains(&b),
            (None, Some(right)) => right.contains(&a),
            (None, None) => false,
        }
    }

    /// Every tracked character, in code point order.
    pub fn tracked(&self) -> BTreeSet<char> {
        self.index.keys().copied().collect()
    }
}

/// [`ConfusionModel::variants`] on the built-in Gurmukhi model.
pub fn variants(c: char) -> BTreeSet<char> {
    GURMUKHI.variants(c)
}

/// [`ConfusionModel::similar`] on the built-in Gurmukhi model.
pub fn similar(a: char, b: char) -> bool {
    GURMUKHI.similar(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_character_is_its_own_group() {
        assert_eq!(variants('x'), BTreeSet::from(['x']));
        assert!(similar('x', 'x'));
        assert!(!similar('x', 'y'));
    }

    #[test]
    fn vowel_signs_are_confusable() {
        assert!(similar('ਿ', 'ੈ'));
        assert!(similar('ੈ', 'ਿ'));
        assert!(!similar('ਿ', 'ੁ'));
    }

    #[test]
    fn overlapping_groups_merge_membership() {
        let k = variants('ਕ');
        assert!(k.contains(&'ਗ'));
        assert!(k.contains(&'ਖ'));
        assert!(k.contains(&'ਕ'));
    }

    #[test]
    fn every_group_member_is_symmetric() {
        let model = ConfusionModel::gurmukhi();
        for group in GURMUKHI_GROUPS {
            for &a in group.iter() {
                assert!(model.variants(a).contains(&a));
                for &b in group.iter() {
                    assert!(model.similar(a, b), "{a} ~ {b}");
                    assert!(model.similar(b, a), "{b} ~ {a}");
                }
            }
        }
    }

    #[test]
    fn similarity_is_symmetric_over_all_tracked_pairs() {
        let model = ConfusionModel::gurmukhi();
        let tracked = model.tracked();
        for &a in &tracked {
            for &b in &tracked {
                assert_eq!(model.similar(a, b), model.similar(b, a));
            }
        }
    }
}
