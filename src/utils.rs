// ABOUTME: Utility functions for precondition checks
// ABOUTME: Verifies external tools are installed before any work starts

use anyhow::{bail, Result};
use which::which;

/// Check that the wrangler CLI is available
///
/// `binary` is looked up on `PATH` (or used as-is when it is a path).
///
/// # Errors
///
/// Returns an error with installation instructions if wrangler cannot be found.
///
/// # Examples
///
/// ```
/// # use d1_migrator::utils::check_required_tools;
/// let result = check_required_tools("no-such-wrangler-binary");
/// assert!(result.is_err());
/// ```
pub fn check_required_tools(binary: &str) -> Result<()> {
    if which(binary).is_err() {
        bail!(
            "Wrangler CLI not found ('{}'). Please install it first:\n\
             - npm install -g wrangler\n\
             - then authenticate with: wrangler login",
            binary
        );
    }

    tracing::debug!("Found wrangler CLI: {}", binary);
    Ok(())
}
