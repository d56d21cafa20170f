// ABOUTME: Writes one INSERT batch file per migrated table
// ABOUTME: Processes tables in declared order and stops at the first failure

use super::inserts::generate_inserts;
use super::tables::MigrationTable;
use crate::sqlite::read_table_rows;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// A table whose statement file has been written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedTable {
    pub table: MigrationTable,
    pub row_count: usize,
    pub path: PathBuf,
}

/// Export a single table to `<output_dir>/<table>.sql`, overwriting any previous file
pub fn export_table(
    conn: &Connection,
    table: MigrationTable,
    output_dir: &Path,
) -> Result<ExportedTable> {
    let rows = read_table_rows(conn, table)?;
    let sql = generate_inserts(table.as_str(), &rows);
    let path = output_dir.join(table.file_name());

    std::fs::write(&path, sql)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(
        "Exported {} rows from {} to {}",
        rows.len(),
        table,
        path.display()
    );

    Ok(ExportedTable {
        table,
        row_count: rows.len(),
        path,
    })
}

/// Export every migrated table
///
/// Creates `output_dir` (recursively) if needed, then exports tables one at a time in
/// [`MigrationTable::ALL`] order. `on_table` is called after each file is written.
///
/// # Errors
///
/// The first table that cannot be read or written aborts the run. Files written for
/// earlier tables are left in place.
pub fn export_tables<F>(
    conn: &Connection,
    output_dir: &Path,
    mut on_table: F,
) -> Result<Vec<ExportedTable>>
where
    F: FnMut(&ExportedTable),
{
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output_dir.display()
        )
    })?;

    let mut exported = Vec::with_capacity(MigrationTable::ALL.len());

    for table in MigrationTable::ALL {
        let result = export_table(conn, table, output_dir)
            .with_context(|| format!("Export of table '{}' failed", table))?;
        on_table(&result);
        exported.push(result);
    }

    Ok(exported)
}
