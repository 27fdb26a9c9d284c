// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed corpus with an FTS5 index for exact token lookup.
//!
//! Each line is stored twice: the display text as loaded and the output of
//! the query normalizer. The FTS5 index covers only the normalized column so
//! a cleaned query and a cleaned line tokenize the same way.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{CorpusStats, CorpusStore, NewReferenceLine, ReferenceLine};
use crate::errors::StoreError;
use crate::normalize::stages::canonicalize_unicode;
use crate::normalize::Normalizer;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Gurmukhi vowel signs and marks are category M; keeping `M*` in the token
/// character set stops the tokenizer from splitting words at every matra.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reference_line (
    id INTEGER PRIMARY KEY,
    text TEXT NOT NULL,
    normalized_text TEXT NOT NULL,
    page INTEGER,
    line INTEGER,
    raag TEXT,
    author TEXT
);
CREATE INDEX IF NOT EXISTS idx_reference_line_location ON reference_line(page, line);
CREATE VIRTUAL TABLE IF NOT EXISTS reference_fts USING fts5(
    normalized_text,
    content='reference_line',
    content_rowid='id',
    tokenize="unicode61 categories 'L* N* Co M*'"
);
CREATE TRIGGER IF NOT EXISTS reference_line_ai AFTER INSERT ON reference_line BEGIN
    INSERT INTO reference_fts(rowid, normalized_text) VALUES (new.id, new.normalized_text);
END;
CREATE TRIGGER IF NOT EXISTS reference_line_ad AFTER DELETE ON reference_line BEGIN
    INSERT INTO reference_fts(reference_fts, rowid, normalized_text)
        VALUES ('delete', old.id, old.normalized_text);
END;
CREATE TRIGGER IF NOT EXISTS reference_line_au AFTER UPDATE ON reference_line BEGIN
    INSERT INTO reference_fts(reference_fts, rowid, normalized_text)
        VALUES ('delete', old.id, old.normalized_text);
    INSERT INTO reference_fts(rowid, normalized_text) VALUES (new.id, new.normalized_text);
END;
"#;

const LINE_COLUMNS: &str = "r.id, r.text, r.page, r.line, r.raag, r.author";

/// Corpus stored in a single SQLite file.
///
/// The connection sits behind a `Mutex` so the store can be shared with the
/// matcher's worker threads. Lines and exact-lookup queries both go through
/// the built-in [`Normalizer`].
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    normalizer: Normalizer,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "opening corpus database");
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            normalizer: Normalizer::default(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert `lines` in one transaction. Returns the number inserted.
    pub fn insert_lines(
        &self,
        lines: impl IntoIterator<Item = NewReferenceLine>,
    ) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO reference_line (text, normalized_text, page, line, raag, author) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for line in lines {
                let text = canonicalize_unicode(line.text.trim());
                if text.is_empty() {
                    continue;
                }
                let normalized = self.normalizer.normalize(&text);
                stmt.execute(params![
                    text,
                    normalized,
                    line.page,
                    line.line,
                    line.raag,
                    line.author
                ])?;
                inserted += 1;
            }
        }
        tx.commit()?;
        debug!(inserted, "inserted reference lines");
        Ok(inserted)
    }

    /// Remove every line.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM reference_line", [])?;
        debug!(removed, "cleared corpus");
        Ok(removed)
    }

    pub fn line_by_location(
        &self,
        page: u32,
        line: u32,
    ) -> Result<Option<ReferenceLine>, StoreError> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                &format!(
                    "SELECT {LINE_COLUMNS} FROM reference_line r WHERE r.page = ?1 AND r.line = ?2 ORDER BY r.id LIMIT 1"
                ),
                params![page, line],
                row_to_line,
            )
            .optional()?;
        Ok(found)
    }

    pub fn stats(&self) -> Result<CorpusStats, StoreError> {
        let conn = self.lock()?;
        let stats = conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT page), COUNT(DISTINCT raag), COUNT(DISTINCT author) FROM reference_line",
            [],
            |row| {
                Ok(CorpusStats {
                    total_lines: row.get::<_, i64>(0)? as usize,
                    total_pages: row.get::<_, i64>(1)? as usize,
                    unique_raags: row.get::<_, i64>(2)? as usize,
                    unique_authors: row.get::<_, i64>(3)? as usize,
                })
            },
        )?;
        Ok(stats)
    }
}

fn row_to_line(row: &Row<'_>) -> rusqlite::Result<ReferenceLine> {
    Ok(ReferenceLine {
        id: row.get(0)?,
        text: row.get(1)?,
        page: row.get(2)?,
        line: row.get(3)?,
        raag: row.get(4)?,
        author: row.get(5)?,
    })
}

/// FTS5 expression requiring every token: each token becomes a quoted string
/// so punctuation and FTS operators in user text are taken literally.
/// Tokens with no letters or digits are dropped.
pub(crate) fn fts_match_expression(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .map(|token| format!("\"{}\"", token.replace('"', "\"\"")))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

impl CorpusStore for SqliteStore {
    fn lookup_exact(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<ReferenceLine>, usize), StoreError> {
        let Some(expression) = fts_match_expression(&self.normalizer.normalize(query)) else {
            return Ok((Vec::new(), 0));
        };
        let conn = self.lock()?;

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reference_fts WHERE reference_fts MATCH ?1",
            params![expression],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {LINE_COLUMNS} FROM reference_fts \
             JOIN reference_line r ON r.id = reference_fts.rowid \
             WHERE reference_fts MATCH ?1 \
             ORDER BY rank, r.id \
             LIMIT ?2 OFFSET ?3"
        ))?;
        let lines = stmt
            .query_map(
                params![expression, limit as i64, offset as i64],
                row_to_line,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(%expression, hits = lines.len(), total, "exact lookup");
        Ok((lines, total as usize))
    }

    fn fetch_window(&self, cap: usize) -> Result<Vec<ReferenceLine>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {LINE_COLUMNS} FROM reference_line r ORDER BY r.id LIMIT ?1"
        ))?;
        let lines = stmt
            .query_map(params![cap as i64], row_to_line)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }
}
