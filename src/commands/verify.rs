// ABOUTME: Verify command implementation - Validate the D1 migration
// ABOUTME: Compares table row counts with SQLite and smoke-tests D1 views

use crate::config::MigratorConfig;
use crate::d1::{QueryRunner, WranglerD1};
use crate::migration::{
    compare_counts, count_table_header, format_count_row, run_sample_queries, VerificationReport,
};
use crate::sqlite::open_source;
use crate::utils;
use anyhow::Result;
use rusqlite::Connection;

/// Verify the D1 migration against the local SQLite database
///
/// This command:
/// 1. Checks that wrangler is installed and the SQLite database exists
/// 2. Compares row counts for every migrated table between SQLite and D1
/// 3. Runs the sample-query battery against D1
/// 4. Prints a summary
///
/// # Errors
///
/// Returns an error if a precondition fails or if any table count does not match.
/// Sample-query failures are reported but do not fail the command.
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use d1_migrator::commands::verify;
/// # use d1_migrator::config::MigratorConfig;
/// # async fn example() -> Result<()> {
/// verify(&MigratorConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn verify(config: &MigratorConfig) -> Result<()> {
    tracing::info!("D1 Migration Verification");
    tracing::info!("=========================");
    tracing::info!("");

    utils::check_required_tools(&config.destination.wrangler)?;
    let conn = open_source(&config.source_db)?;
    let d1 = WranglerD1::new(&config.destination);

    let report = run_verification(&conn, &d1).await;
    summarize(&report)
}

/// Run both verification phases, logging results as they come in
pub async fn run_verification<R: QueryRunner>(
    conn: &Connection,
    runner: &R,
) -> VerificationReport {
    tracing::info!("Verifying table record counts...");
    tracing::info!("");
    tracing::info!("{}", count_table_header());
    tracing::info!("{}", "-".repeat(50));

    let tables = compare_counts(conn, runner).await;
    for result in &tables {
        if result.matches() {
            tracing::info!("{}", format_count_row(result));
        } else {
            tracing::error!("{}", format_count_row(result));
        }
    }

    tracing::info!("");
    tracing::info!("Testing sample queries...");
    tracing::info!("");

    let samples = run_sample_queries(runner).await;

    VerificationReport { tables, samples }
}

/// Log the summary and turn a count mismatch into an error
pub fn summarize(report: &VerificationReport) -> Result<()> {
    let passed_samples = report.samples.iter().filter(|s| s.succeeded).count();

    tracing::info!("");
    tracing::info!("========================================");
    tracing::info!("Verification Summary");
    tracing::info!("========================================");

    if report.samples_passed() {
        tracing::info!(
            "✓ Sample queries executed successfully ({}/{})",
            passed_samples,
            report.samples.len()
        );
    } else {
        tracing::warn!(
            "⚠ {}/{} sample queries failed (advisory only)",
            report.samples.len() - passed_samples,
            report.samples.len()
        );
        for sample in report.samples.iter().filter(|s| !s.succeeded) {
            tracing::warn!(
                "  - {}: {}",
                sample.name,
                sample.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if report.counts_match() {
        tracing::info!("✓ All table counts match between SQLite and D1");
        tracing::info!("");
        tracing::info!("✓ Migration verification passed!");
        tracing::info!("  Your D1 database is ready for use.");
        Ok(())
    } else {
        let mismatched = report.mismatched_tables();
        let names: Vec<&str> = mismatched.iter().map(|t| t.as_str()).collect();

        tracing::error!("✗ Some table counts do not match: {}", names.join(", "));
        tracing::info!("");
        tracing::info!("Please check the migration process and try again.");

        anyhow::bail!("{} table(s) failed verification", mismatched.len());
    }
}
