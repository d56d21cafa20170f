// ABOUTME: SQLite source database utilities for export and verification
// ABOUTME: Opens the local database read-only and exposes row and count readers

pub mod reader;

pub use reader::{count_rows, read_table_rows};

use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Open the local SQLite database for reading
///
/// The file must already exist; a missing path is reported before any work starts
/// instead of letting SQLite create an empty database. The connection is opened with
/// read-only flags and closes when dropped.
///
/// # Examples
///
/// ```no_run
/// # use d1_migrator::sqlite::open_source;
/// # fn example() -> anyhow::Result<()> {
/// let conn = open_source("data/games.db")?;
/// # Ok(())
/// # }
/// ```
pub fn open_source(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    if !path.exists() {
        bail!("SQLite database not found at {}", path.display());
    }

    tracing::debug!("Opening SQLite database {}", path.display());

    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open SQLite database {}", path.display()))
}
