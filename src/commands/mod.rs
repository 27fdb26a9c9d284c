// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command runners - one module per subcommand

pub mod clean;
pub mod compare;
pub mod load;
pub mod search;
pub mod stats;

use anyhow::{Context, Result};
use std::path::Path;

use versefind::store::SqliteStore;

/// Open the corpus database, creating it if needed.
pub(crate) fn open_store(db: &Path) -> Result<SqliteStore> {
    SqliteStore::open(db)
        .with_context(|| format!("failed to open corpus database {}", db.display()))
}
