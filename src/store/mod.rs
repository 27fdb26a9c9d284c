// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference corpus access
//!
//! The matcher only sees a corpus through [`CorpusStore`]. Two adapters ship
//! with the crate: an in-memory snapshot and a SQLite database with an FTS5
//! index for the exact path.

pub mod memory;
pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// One canonical scripture line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub id: i64,
    pub text: String,
    pub page: Option<u32>,
    pub line: Option<u32>,
    pub raag: Option<String>,
    pub author: Option<String>,
}

/// A line about to be inserted; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReferenceLine {
    pub text: String,
    pub page: Option<u32>,
    pub line: Option<u32>,
    pub raag: Option<String>,
    pub author: Option<String>,
}

impl NewReferenceLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, page: u32, line: u32) -> Self {
        self.page = Some(page);
        self.line = Some(line);
        self
    }

    fn into_line(self, id: i64) -> ReferenceLine {
        ReferenceLine {
            id,
            text: self.text,
            page: self.page,
            line: self.line,
            raag: self.raag,
            author: self.author,
        }
    }
}

/// Aggregate counts over a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub total_lines: usize,
    pub total_pages: usize,
    pub unique_raags: usize,
    pub unique_authors: usize,
}

/// Read-only view of a reference corpus.
pub trait CorpusStore: Send + Sync {
    /// Lines matching `query` exactly (every token present), best first.
    /// Returns the page of hits together with the total hit count.
    fn lookup_exact(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<ReferenceLine>, usize), StoreError>;

    /// Up to `cap` lines in a stable corpus order, for fuzzy scoring.
    fn fetch_window(&self, cap: usize) -> Result<Vec<ReferenceLine>, StoreError>;
}

impl<T: CorpusStore + ?Sized> CorpusStore for &T {
    fn lookup_exact(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<ReferenceLine>, usize), StoreError> {
        (**self).lookup_exact(query, limit, offset)
    }

    fn fetch_window(&self, cap: usize) -> Result<Vec<ReferenceLine>, StoreError> {
        (**self).fetch_window(cap)
    }
}
