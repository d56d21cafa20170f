// ABOUTME: Destination query interface for the Cloudflare D1 database
// ABOUTME: Keeps the external wrangler driver behind a narrow query trait

pub mod wrangler;

pub use wrangler::WranglerD1;

use anyhow::Result;

/// Runs one SQL statement against the destination and returns its raw output
///
/// Count parsing and the sample-query battery only depend on this trait, so the
/// wrangler sub-process can be replaced by a direct client without touching them.
#[allow(async_fn_in_trait)]
pub trait QueryRunner {
    /// Execute `sql` and return the driver's trimmed standard output
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot be started or exits non-zero.
    async fn run_query(&self, sql: &str) -> Result<String>;
}
