// SPDX-License-Identifier: MIT OR Apache-2.0

//! General-purpose fuzzy string ratios.
//!
//! All ratios are normalized Levenshtein similarities over characters,
//! combined the way interactive fuzzy finders usually weigh them.

use std::collections::BTreeSet;

/// Length ratio below which two strings count as comparable in size.
const COMPARABLE_LENGTH_RATIO: f64 = 1.5;
/// Length ratio at or above which partial matches are heavily discounted.
const LOPSIDED_LENGTH_RATIO: f64 = 8.0;
const PARTIAL_SCALE: f64 = 0.9;
const LOPSIDED_PARTIAL_SCALE: f64 = 0.6;
const TOKEN_SCALE: f64 = 0.95;

/// Default ceiling (in characters) above which callers skip [`weighted_ratio`].
pub const DEFAULT_RATIO_MAX_LEN: usize = 200;

/// Whole-string similarity.
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Best [`ratio`] of the shorter string against every same-length window of
/// the longer one.
///
/// Runs one Levenshtein per window, so the cost grows with
/// `len(long) * len(short)^2`. Callers scoring untrusted input go through
/// [`bounded_weighted_ratio`].
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 1.0 } else { 0.0 };
    }

    let width = short.len();
    let mut window = Vec::with_capacity(width);
    let mut best = 0.0_f64;
    for chars in long.windows(width) {
        window.clear();
        window.extend_from_slice(chars);
        let distance = strsim::generic_levenshtein(&short, &window);
        best = best.max(1.0 - distance as f64 / width as f64);
        if best >= 1.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// [`ratio`] after sorting whitespace tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Compares the shared tokens against each side's shared-plus-remaining
/// tokens, so a string that is a token subset of the other scores 1.0.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let shared = join(left.intersection(&right).copied().collect());
    let only_left = join(left.difference(&right).copied().collect());
    let only_right = join(right.difference(&left).copied().collect());

    let combine = |rest: &str| {
        if shared.is_empty() {
            rest.to_string()
        } else if rest.is_empty() {
            shared.clone()
        } else {
            format!("{shared} {rest}")
        }
    };
    let with_left = combine(&only_left);
    let with_right = combine(&only_right);

    let mut best = ratio(&with_left, &with_right);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared, &with_left))
            .max(ratio(&shared, &with_right));
    }
    best
}

fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Blend of the ratios above, picked by how different the lengths are.
///
/// Comparable lengths use the whole-string and token ratios; lopsided pairs
/// rely on partial matching, discounted more as the gap grows.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    match (len_a, len_b) {
        (0, 0) => return 1.0,
        (0, _) | (_, 0) => return 0.0,
        _ => {}
    }

    let base = ratio(a, b);
    let length_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;

    if length_ratio < COMPARABLE_LENGTH_RATIO {
        let tokens = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return base.max(tokens * TOKEN_SCALE).clamp(0.0, 1.0);
    }

    let scale = if length_ratio >= LOPSIDED_LENGTH_RATIO {
        LOPSIDED_PARTIAL_SCALE
    } else {
        PARTIAL_SCALE
    };
    base.max(partial_ratio(a, b) * scale)
        .max(partial_token_sort_ratio(a, b) * TOKEN_SCALE * scale)
        .clamp(0.0, 1.0)
}

/// [`weighted_ratio`] unless either side exceeds `max_len` characters.
pub fn bounded_weighted_ratio(a: &str, b: &str, max_len: usize) -> Option<f64> {
    if a.chars().count() > max_len || b.chars().count() > max_len {
        return None;
    }
    Some(weighted_ratio(a, b))
}

/// [`partial_ratio`] unless either side exceeds `max_len` characters.
pub fn bounded_partial_ratio(a: &str, b: &str, max_len: usize) -> Option<f64> {
    if a.chars().count() > max_len || b.chars().count() > max_len {
        return None;
    }
    Some(partial_ratio(a, b))
}
