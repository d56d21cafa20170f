// ABOUTME: Read-only queries against the SQLite source tables
// ABOUTME: Fetches every row of a table and counts rows for verification

use crate::migration::{MigrationTable, Row, SqlValue};
use anyhow::{Context, Result};
use rusqlite::Connection;

/// Read all rows of a table with `SELECT *`
///
/// Column names and order are taken from the statement, so every returned row has the
/// same shape.
pub fn read_table_rows(conn: &Connection, table: MigrationTable) -> Result<Vec<Row>> {
    tracing::debug!("Reading rows from '{}'", table);

    let sql = format!("SELECT * FROM \"{}\"", table.as_str());
    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("Failed to prepare query for table '{}'", table))?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt
        .query([])
        .with_context(|| format!("Failed to query table '{}'", table))?;

    let mut result = Vec::new();
    while let Some(source_row) = rows
        .next()
        .with_context(|| format!("Failed to read row from table '{}'", table))?
    {
        let mut row = Row::new();
        for (idx, column) in columns.iter().enumerate() {
            let value = source_row.get_ref(idx).with_context(|| {
                format!("Failed to read column '{}' of table '{}'", column, table)
            })?;
            row.push(column.as_str(), SqlValue::from(value));
        }
        result.push(row);
    }

    tracing::debug!("Read {} rows from '{}'", result.len(), table);

    Ok(result)
}

/// Count rows of a table with `SELECT COUNT(*)`
pub fn count_rows(conn: &Connection, table: MigrationTable) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) AS count FROM \"{}\"", table.as_str());

    conn.query_row(&sql, [], |row| row.get::<_, i64>(0))
        .with_context(|| format!("Failed to count rows in table '{}'", table))
}
