// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types with helpful suggestions
//!
//! Empty or garbled query text is never an error: it is a valid,
//! low-relevance input and yields an empty result. Errors only come from
//! out-of-range knobs or from the storage collaborator.

use thiserror::Error;

/// Failure reported by a [`crate::store::CorpusStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors surfaced by the match orchestrator.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A caller-supplied knob is malformed (e.g. a NaN threshold).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The storage collaborator failed to serve a lookup or window fetch.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    /// A caller-supplied limit or window cap is outside the documented range.
    #[error("{what} = {value} is out of range (allowed 1..={max})")]
    ResourceExceeded {
        what: &'static str,
        value: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors raised while reading reference lines from disk.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Helper functions for creating helpful error messages
pub mod suggestions {
    /// Get suggestion for a database that has not been loaded yet
    pub fn empty_corpus_suggestion(db_path: &str) -> String {
        format!(
            "The corpus at '{}' is empty\n\n\
             Load reference lines first:\n\
             $ versefind load lines.txt\n\n\
             Or point at another database:\n\
             $ versefind --db /path/to/corpus.db search \"...\"",
            db_path
        )
    }

    /// Get suggestion for no results
    pub fn no_results_suggestion(query: &str) -> String {
        format!(
            "No results found for '{}'\n\n\
             Try:\n\
             - Lowering the threshold: --min-similarity 0.2\n\
             - Fuzzy search instead of --exact\n\
             - Checking the cleaned query: versefind clean \"{}\"",
            query, query
        )
    }
}
