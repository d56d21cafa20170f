// ABOUTME: Post-migration verification between SQLite and D1
// ABOUTME: Compares per-table row counts and runs a fixed battery of smoke-test queries

use super::tables::MigrationTable;
use crate::d1::QueryRunner;
use crate::sqlite::count_rows;
use rusqlite::Connection;
use serde_json::Value as JsonValue;

/// A named smoke-test query run against the destination only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleQuery {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Queries that must run on D1 once the schema, views and data are in place
pub const SAMPLE_QUERIES: [SampleQuery; 5] = [
    SampleQuery {
        name: "Game List View",
        sql: "SELECT COUNT(*) FROM game_list2",
    },
    SampleQuery {
        name: "Played Games View",
        sql: "SELECT COUNT(*) FROM played",
    },
    SampleQuery {
        name: "Winner Stats View",
        sql: "SELECT COUNT(*) FROM winner",
    },
    SampleQuery {
        name: "Recent Games",
        sql: "SELECT name, winner FROM played LIMIT 3",
    },
    SampleQuery {
        name: "Active Games",
        sql: "SELECT COUNT(*) FROM game_list2 WHERE status = 'Playing'",
    },
];

/// Outcome of counting one table on both sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    /// Both counts obtained; a failed destination query is recorded as 0
    Compared { source: i64, destination: i64 },
    /// The source count itself could not be read
    SourceError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCountResult {
    pub table: MigrationTable,
    pub outcome: CountOutcome,
}

impl TableCountResult {
    /// True only when both counts were read and are equal
    pub fn matches(&self) -> bool {
        matches!(
            self.outcome,
            CountOutcome::Compared { source, destination } if source == destination
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQueryResult {
    pub name: &'static str,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Everything one verification run found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub tables: Vec<TableCountResult>,
    pub samples: Vec<SampleQueryResult>,
}

impl VerificationReport {
    /// True when every table count matched; this alone decides the exit status
    pub fn counts_match(&self) -> bool {
        self.tables.iter().all(TableCountResult::matches)
    }

    /// True when every sample query returned output
    pub fn samples_passed(&self) -> bool {
        self.samples.iter().all(|s| s.succeeded)
    }

    pub fn mismatched_tables(&self) -> Vec<MigrationTable> {
        self.tables
            .iter()
            .filter(|r| !r.matches())
            .map(|r| r.table)
            .collect()
    }
}

/// Extract a row count from destination query output
///
/// JSON output (`wrangler --json`) is read structurally: the first numeric field of the
/// first result row. Anything else is scanned for the first run of decimal digits, which
/// tolerates wrangler's box-drawn table. Missing, empty or unparsable output yields 0.
///
/// # Examples
///
/// ```
/// # use d1_migrator::migration::parse_count;
/// assert_eq!(parse_count(Some("│ count │\n│   42  │")), 42);
/// assert_eq!(parse_count(Some(r#"[{"results":[{"count":7}],"success":true}]"#)), 7);
/// assert_eq!(parse_count(None), 0);
/// ```
pub fn parse_count(output: Option<&str>) -> i64 {
    let Some(output) = output.map(str::trim).filter(|o| !o.is_empty()) else {
        return 0;
    };

    if let Ok(json @ (JsonValue::Array(_) | JsonValue::Object(_))) =
        serde_json::from_str::<JsonValue>(output)
    {
        return count_from_json(&json).unwrap_or(0);
    }

    first_digit_run(output)
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn count_from_json(json: &JsonValue) -> Option<i64> {
    let statement = match json {
        JsonValue::Array(statements) => statements.first()?,
        other => other,
    };

    statement
        .get("results")?
        .as_array()?
        .first()?
        .as_object()?
        .values()
        .find_map(JsonValue::as_i64)
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Compare row counts for every migrated table
///
/// Tables are checked in declared order and every table is evaluated even after a
/// mismatch. A failing destination query is logged and counted as 0 rows.
pub async fn compare_counts<R: QueryRunner>(
    conn: &Connection,
    runner: &R,
) -> Vec<TableCountResult> {
    let mut results = Vec::with_capacity(MigrationTable::ALL.len());

    for table in MigrationTable::ALL {
        let source = match count_rows(conn, table) {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("Error verifying {}: {:#}", table, e);
                results.push(TableCountResult {
                    table,
                    outcome: CountOutcome::SourceError(format!("{:#}", e)),
                });
                continue;
            }
        };

        let sql = format!("SELECT COUNT(*) as count FROM {}", table.as_str());
        let output = match runner.run_query(&sql).await {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::error!("Error executing D1 query: {:#}", e);
                None
            }
        };
        let destination = parse_count(output.as_deref());

        results.push(TableCountResult {
            table,
            outcome: CountOutcome::Compared {
                source,
                destination,
            },
        });
    }

    results
}

/// Run the sample-query battery against the destination
///
/// A query succeeds when the driver exits cleanly with non-empty output; returned
/// values are not inspected.
pub async fn run_sample_queries<R: QueryRunner>(runner: &R) -> Vec<SampleQueryResult> {
    let mut results = Vec::with_capacity(SAMPLE_QUERIES.len());

    for query in SAMPLE_QUERIES {
        tracing::info!("Testing: {}", query.name);

        let result = match runner.run_query(query.sql).await {
            Ok(output) if !output.trim().is_empty() => SampleQueryResult {
                name: query.name,
                succeeded: true,
                error: None,
            },
            Ok(_) => SampleQueryResult {
                name: query.name,
                succeeded: false,
                error: Some("empty result".to_string()),
            },
            Err(e) => SampleQueryResult {
                name: query.name,
                succeeded: false,
                error: Some(format!("{:#}", e)),
            },
        };

        if result.succeeded {
            tracing::info!("  ✓ Success");
        } else {
            tracing::warn!(
                "  ✗ Failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
        }

        results.push(result);
    }

    results
}

/// Run count comparison followed by the sample-query battery
pub async fn verify_migration<R: QueryRunner>(
    conn: &Connection,
    runner: &R,
) -> VerificationReport {
    let tables = compare_counts(conn, runner).await;
    let samples = run_sample_queries(runner).await;
    VerificationReport { tables, samples }
}

/// Header line of the count comparison table
pub fn count_table_header() -> String {
    format!("{:<15}{:<10}{:<10}Status", "Table", "SQLite", "D1")
}

/// One fixed-width line of the count comparison table
pub fn format_count_row(result: &TableCountResult) -> String {
    match &result.outcome {
        CountOutcome::Compared {
            source,
            destination,
        } => {
            let status = if result.matches() {
                "✓ Match"
            } else {
                "✗ Mismatch"
            };
            format!(
                "{:<15}{:<10}{:<10}{}",
                result.table.as_str(),
                source,
                destination,
                status
            )
        }
        CountOutcome::SourceError(_) => format!(
            "{:<15}{:<10}{:<10}✗ Error",
            result.table.as_str(),
            "Error",
            "Error"
        ),
    }
}
