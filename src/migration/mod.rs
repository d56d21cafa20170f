// ABOUTME: Migration logic module
// ABOUTME: Value escaping, INSERT generation, table export, and count verification

pub mod export;
pub mod inserts;
pub mod tables;
pub mod value;
pub mod verify;

pub use export::{export_table, export_tables, ExportedTable};
pub use inserts::{generate_inserts, Row};
pub use tables::MigrationTable;
pub use value::{escape_value, SqlValue};
pub use verify::{
    compare_counts, count_table_header, format_count_row, parse_count, run_sample_queries,
    verify_migration, CountOutcome, SampleQuery, SampleQueryResult, TableCountResult,
    VerificationReport, SAMPLE_QUERIES,
};
