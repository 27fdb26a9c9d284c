// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alternate renderings of a query that undo word-boundary errors.

use std::collections::HashSet;

/// Variants of `query`, original first.
///
/// Adds the letter-spaced form, the fully merged form and one form per
/// adjacent word pair merged. Later duplicates are skipped; an empty query
/// yields just itself.
pub fn variants(query: &str) -> Vec<String> {
    let mut out = vec![query.to_string()];
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return out;
    }

    let mut seen: HashSet<String> = HashSet::from([query.to_string()]);
    let mut push = |candidate: String| {
        if seen.insert(candidate.clone()) {
            out.push(candidate);
        }
    };

    let letter_spaced = words
        .iter()
        .map(|word| {
            word.chars()
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ");
    push(letter_spaced);
    push(words.concat());

    for i in 0..words.len().saturating_sub(1) {
        let mut merged: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        let next = merged.remove(i + 1);
        merged[i].push_str(&next);
        push(merged.join(" "));
    }
    out
}
