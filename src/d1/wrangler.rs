// ABOUTME: Wrapper for the wrangler CLI to run queries against D1
// ABOUTME: Builds `wrangler d1 execute` invocations and captures their output

use super::QueryRunner;
use crate::config::DestinationConfig;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::process::Command;

/// D1 database reached through `wrangler d1 execute`
#[derive(Debug, Clone)]
pub struct WranglerD1 {
    binary: String,
    database: String,
    remote: bool,
    json: bool,
}

impl WranglerD1 {
    pub fn new(destination: &DestinationConfig) -> Self {
        Self {
            binary: destination.wrangler.clone(),
            database: destination.database.clone(),
            remote: destination.remote,
            json: destination.json,
        }
    }

    fn location_flag(&self) -> &'static str {
        if self.remote {
            "--remote"
        } else {
            "--local"
        }
    }

    /// Arguments for running a single statement
    fn query_args(&self, sql: &str) -> Vec<String> {
        let mut args = vec![
            "d1".to_string(),
            "execute".to_string(),
            self.database.clone(),
            self.location_flag().to_string(),
        ];
        if self.json {
            args.push("--json".to_string());
        }
        args.push(format!("--command={}", sql));
        args
    }

    /// Shell line that applies a SQL file to this database
    pub fn import_command(&self, file: &Path) -> String {
        format!(
            "{} d1 execute {} {} --file={}",
            self.binary,
            self.database,
            self.location_flag(),
            file.display()
        )
    }
}

impl QueryRunner for WranglerD1 {
    async fn run_query(&self, sql: &str) -> Result<String> {
        tracing::debug!("Executing D1 query: {}", sql);

        let output = Command::new(&self.binary)
            .args(self.query_args(sql))
            .output()
            .await
            .with_context(|| format!("Failed to execute {}. Is wrangler installed?", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("wrangler d1 execute failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
