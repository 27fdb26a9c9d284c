// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory corpus snapshot.

use std::collections::BTreeSet;

use super::{CorpusStats, CorpusStore, NewReferenceLine, ReferenceLine};
use crate::errors::StoreError;
use crate::normalize::Normalizer;

/// Lines held in a `Vec`, in insertion order. Exact lookup requires every
/// normalized query token to appear among the normalized line tokens.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    lines: Vec<ReferenceLine>,
    normalized: Vec<Vec<String>>,
    normalizer: Normalizer,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: impl IntoIterator<Item = NewReferenceLine>) -> Self {
        let mut store = Self::new();
        store.extend(lines);
        store
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_lines(texts.into_iter().map(NewReferenceLine::new))
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = NewReferenceLine>) {
        for new_line in lines {
            let id = self.lines.len() as i64 + 1;
            let tokens = self
                .normalizer
                .normalize(&new_line.text)
                .split_whitespace()
                .map(str::to_string)
                .collect();
            self.normalized.push(tokens);
            self.lines.push(new_line.into_line(id));
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn stats(&self) -> CorpusStats {
        let pages: BTreeSet<u32> = self.lines.iter().filter_map(|l| l.page).collect();
        let raags: BTreeSet<&str> = self.lines.iter().filter_map(|l| l.raag.as_deref()).collect();
        let authors: BTreeSet<&str> = self
            .lines
            .iter()
            .filter_map(|l| l.author.as_deref())
            .collect();
        CorpusStats {
            total_lines: self.lines.len(),
            total_pages: pages.len(),
            unique_raags: raags.len(),
            unique_authors: authors.len(),
        }
    }
}

impl CorpusStore for MemoryStore {
    fn lookup_exact(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<ReferenceLine>, usize), StoreError> {
        let wanted: Vec<String> = self
            .normalizer
            .normalize(query)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if wanted.is_empty() {
            return Ok((Vec::new(), 0));
        }

        let hits: Vec<&ReferenceLine> = self
            .lines
            .iter()
            .zip(&self.normalized)
            .filter(|(_, tokens)| wanted.iter().all(|w| tokens.contains(w)))
            .map(|(line, _)| line)
            .collect();
        let total = hits.len();
        let page = hits.into_iter().skip(offset).take(limit).cloned().collect();
        Ok((page, total))
    }

    fn fetch_window(&self, cap: usize) -> Result<Vec<ReferenceLine>, StoreError> {
        Ok(self.lines.iter().take(cap).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> MemoryStore {
        MemoryStore::from_lines([
            NewReferenceLine::new("ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥").at(1, 4),
            NewReferenceLine::new("ਹੈ ਭੀ ਸਚੁ ਨਾਨਕ ਹੋਸੀ ਭੀ ਸਚੁ ॥੧॥").at(1, 5),
            NewReferenceLine::new("ਸੋਚੈ ਸੋਚਿ ਨ ਹੋਵਈ ਜੇ ਸੋਚੀ ਲਖ ਵਾਰ ॥").at(1, 6),
        ])
    }

    #[test]
    fn ids_follow_insertion_order() {
        let store = corpus();
        let window = store.fetch_window(10).unwrap();
        let ids: Vec<i64> = window.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn exact_lookup_requires_every_token() {
        let store = corpus();
        let (hits, total) = store.lookup_exact("ਸਚੁ ਨਾਨਕ", 10, 0).unwrap();
        assert_eq!(total, 1);
        assert_eq!(hits[0].line, Some(5));

        let (hits, total) = store.lookup_exact("ਸਚੁ", 1, 1).unwrap();
        assert_eq!(total, 2);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, Some(5));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let (hits, total) = corpus().lookup_exact("  ", 10, 0).unwrap();
        assert!(hits.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn window_respects_cap() {
        assert_eq!(corpus().fetch_window(2).unwrap().len(), 2);
        assert!(MemoryStore::new().fetch_window(5).unwrap().is_empty());
    }

    #[test]
    fn stats_count_distinct_pages() {
        let stats = corpus().stats();
        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.total_pages, 1);
        assert_eq!(stats.unique_raags, 0);
    }
}
