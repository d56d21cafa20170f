// ABOUTME: Generates D1-compatible INSERT statements from source rows
// ABOUTME: One statement per row, columns ordered by the first row of the table

use super::value::SqlValue;

/// One source row: column names paired with their values, in query order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.fields.push((column.into(), value.into()));
    }

    /// Column names in the order the row reports them
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Generate the INSERT batch for one table
///
/// Output is a header comment, one `INSERT INTO "<table>" ([col], ...) VALUES (...);` line
/// per row, and a trailing blank line. Column order comes from the first row and is
/// reused for every row; a column a later row does not report is written as `NULL`.
///
/// Returns an empty string when `rows` is empty.
///
/// # Examples
///
/// ```
/// # use d1_migrator::migration::{generate_inserts, Row};
/// let rows = vec![Row::new().with("id", 1_i64).with("text", "O'Brien")];
/// let sql = generate_inserts("notes", &rows);
/// assert_eq!(
///     sql,
///     "-- Data for table: notes\n\
///      INSERT INTO \"notes\" ([id], [text]) VALUES (1, 'O''Brien');\n\n"
/// );
/// ```
pub fn generate_inserts(table_name: &str, rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let columns: Vec<&str> = first.columns().collect();
    let column_list = columns
        .iter()
        .map(|col| format!("[{}]", col))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("-- Data for table: {}\n", table_name);

    for row in rows {
        let values = columns
            .iter()
            .map(|col| {
                row.get(col)
                    .map(SqlValue::to_sql_literal)
                    .unwrap_or_else(|| SqlValue::Null.to_sql_literal())
            })
            .collect::<Vec<_>>()
            .join(", ");

        sql.push_str(&format!(
            "INSERT INTO \"{}\" ({}) VALUES ({});\n",
            table_name, column_list, values
        ));
    }

    sql.push('\n');
    sql
}
