// ABOUTME: Export command implementation - SQLite to D1 statement files
// ABOUTME: Writes one INSERT batch per migrated table and prints the import steps

use crate::config::MigratorConfig;
use crate::d1::WranglerD1;
use crate::migration::{export_tables, ExportedTable, MigrationTable};
use crate::sqlite::open_source;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Schema and view migrations that must be applied before the data files
const SCHEMA_MIGRATIONS: [&str; 2] = ["0001_initial_schema.sql", "0002_create_views.sql"];

/// Export the SQLite source database as D1-compatible INSERT statements
///
/// This command:
/// 1. Opens the source database read-only (fails if the file is missing)
/// 2. Exports each migrated table to `<output_dir>/<table>.sql`
/// 3. Prints the wrangler commands that apply schema, views and data to D1
///
/// # Errors
///
/// Returns an error if the source database cannot be opened, the output directory
/// cannot be created, or any table fails to export. Tables exported before the
/// failure keep their files.
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use d1_migrator::commands::export;
/// # use d1_migrator::config::MigratorConfig;
/// # fn example() -> Result<()> {
/// export(&MigratorConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn export(config: &MigratorConfig) -> Result<()> {
    tracing::info!("Exporting data from SQLite to D1 format...");

    let conn = open_source(&config.source_db)?;

    let progress = ProgressBar::new(MigrationTable::ALL.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("##-"),
    );

    let result = export_tables(&conn, &config.output_dir, |exported| {
        progress.inc(1);
        progress.set_message(format!("Exported {}", exported.table));
    });

    match result {
        Ok(exported) => {
            progress.finish_with_message("Export complete");
            tracing::info!("✓ Export completed successfully!");
            let d1 = WranglerD1::new(&config.destination);
            log_next_steps(&d1, &config.output_dir, &exported);
            Ok(())
        }
        Err(e) => {
            progress.abandon_with_message("Export failed");
            Err(e).context("Export failed")
        }
    }
}

/// Location of the schema migrations, next to the data directory
fn schema_dir(output_dir: &Path) -> PathBuf {
    output_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Commands to apply schema, views and data to D1, in order
pub fn import_steps(
    d1: &WranglerD1,
    output_dir: &Path,
    exported: &[ExportedTable],
) -> Vec<String> {
    let schema_dir = schema_dir(output_dir);

    SCHEMA_MIGRATIONS
        .iter()
        .map(|file| d1.import_command(&schema_dir.join(file)))
        .chain(exported.iter().map(|t| d1.import_command(&t.path)))
        .collect()
}

fn log_next_steps(d1: &WranglerD1, output_dir: &Path, exported: &[ExportedTable]) {
    let steps = import_steps(d1, output_dir, exported);

    tracing::info!("");
    tracing::info!("Next steps:");
    for (idx, step) in steps.iter().take(SCHEMA_MIGRATIONS.len()).enumerate() {
        tracing::info!("{}. Run: {}", idx + 1, step);
    }
    tracing::info!("{}. Run data imports:", SCHEMA_MIGRATIONS.len() + 1);
    for step in steps.iter().skip(SCHEMA_MIGRATIONS.len()) {
        tracing::info!("   {}", step);
    }
}
