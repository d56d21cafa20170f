// ABOUTME: Scalar values read from SQLite and their SQL literal form
// ABOUTME: Escapes text with doubled single quotes and emits numbers and NULL unquoted

use rusqlite::types::ValueRef;

/// Scalar value of one column in one source row
///
/// Maps SQLite storage classes to literal kinds:
/// - NULL → `Null`
/// - INTEGER → `Integer`
/// - REAL → `Real`
/// - TEXT → `Text`
/// - BLOB → `Blob`
///
/// `Bool` never comes out of SQLite directly but is accepted so callers building rows by
/// hand get the 0/1 form SQLite itself uses.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Render the value as a literal usable inside a `VALUES (...)` list
    ///
    /// # Examples
    ///
    /// ```
    /// # use d1_migrator::migration::SqlValue;
    /// assert_eq!(SqlValue::Null.to_sql_literal(), "NULL");
    /// assert_eq!(SqlValue::Integer(42).to_sql_literal(), "42");
    /// assert_eq!(SqlValue::from("O'Brien").to_sql_literal(), "'O''Brien'");
    /// ```
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(f) => format_real(*f),
            SqlValue::Text(s) => quote_text(s),
            SqlValue::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
            // No binary encoding: blobs go out as (lossy) text
            SqlValue::Blob(bytes) => quote_text(&String::from_utf8_lossy(bytes)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

/// Escape a single value for a D1 `INSERT` statement
pub fn escape_value(value: &SqlValue) -> String {
    value.to_sql_literal()
}

fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn format_real(f: f64) -> String {
    if f.is_nan() {
        "NULL".to_string()
    } else if f.is_infinite() {
        // SQLite reads an overflowing literal back as +/-Inf
        (if f > 0.0 { "9e999" } else { "-9e999" }).to_string()
    } else {
        f.to_string()
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}
