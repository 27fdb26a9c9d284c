// SPDX-License-Identifier: MIT OR Apache-2.0

//! versefind - Locate scripture lines from noisy speech-to-text output
//!
//! Shared modules for the versefind CLI tool: the query normalizer, the
//! Gurmukhi confusion model, similarity primitives, query variants and the
//! tiered matcher, plus corpus storage and ingestion.

pub mod config;
pub mod errors;
pub mod ingest;
pub mod normalize;
pub mod output;
pub mod phonetic;
pub mod search;
pub mod similarity;
pub mod store;
pub mod variants;

pub use errors::{MatchError, StoreError};
pub use normalize::{normalize, Normalizer};
pub use search::{MatchCandidate, MatchOptions, MatchStrategy, Matcher, SearchResult};
pub use store::{CorpusStore, MemoryStore, ReferenceLine, SqliteStore};
