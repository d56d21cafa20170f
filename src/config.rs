// ABOUTME: Configuration for export and verification runs
// ABOUTME: Loads optional TOML settings and applies command-line overrides on top

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings shared by the export and verify commands
///
/// Every field has a default, so a config file only needs the values it changes:
///
/// ```toml
/// source_db = "data/games.db"
/// output_dir = "migrations/data"
///
/// [destination]
/// database = "games"
/// remote = true
/// wrangler = "wrangler"
/// json = false
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigratorConfig {
    /// Local SQLite database to read from
    pub source_db: PathBuf,
    /// Directory receiving one `<table>.sql` file per exported table
    pub output_dir: PathBuf,
    pub destination: DestinationConfig,
}

/// How the D1 destination is reached
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DestinationConfig {
    /// D1 database name passed to `wrangler d1 execute`
    pub database: String,
    /// Query the deployed database (`--remote`) rather than the local preview (`--local`)
    pub remote: bool,
    /// wrangler executable name or path
    pub wrangler: String,
    /// Ask wrangler for JSON output instead of its table rendering
    pub json: bool,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            source_db: PathBuf::from("data/games.db"),
            output_dir: PathBuf::from("migrations/data"),
            destination: DestinationConfig::default(),
        }
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            database: "games".to_string(),
            remote: true,
            wrangler: "wrangler".to_string(),
            json: false,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_db: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub database: Option<String>,
    pub wrangler: Option<String>,
    pub local: bool,
    pub json: bool,
}

impl MigratorConfig {
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(source_db) = overrides.source_db {
            self.source_db = source_db;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(database) = overrides.database {
            self.destination.database = database;
        }
        if let Some(wrangler) = overrides.wrangler {
            self.destination.wrangler = wrangler;
        }
        if overrides.local {
            self.destination.remote = false;
        }
        if overrides.json {
            self.destination.json = true;
        }
        self
    }
}

/// Parse configuration from TOML text
pub fn parse_config(contents: &str) -> Result<MigratorConfig> {
    toml::from_str(contents).context("Failed to parse migrator configuration")
}

/// Load configuration from a TOML file, or defaults when no path is given
///
/// An explicitly named file that cannot be read is an error.
pub fn load_config(path: Option<&Path>) -> Result<MigratorConfig> {
    let Some(path) = path else {
        tracing::debug!("No config file given, using defaults");
        return Ok(MigratorConfig::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    tracing::debug!("Loaded configuration from {}", path.display());

    parse_config(&contents).with_context(|| format!("Invalid config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.source_db, PathBuf::from("data/games.db"));
        assert_eq!(config.output_dir, PathBuf::from("migrations/data"));
        assert_eq!(config.destination.database, "games");
        assert!(config.destination.remote);
        assert!(!config.destination.json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            output_dir = "out"

            [destination]
            remote = false
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.source_db, PathBuf::from("data/games.db"));
        assert!(!config.destination.remote);
        assert_eq!(config.destination.wrangler, "wrangler");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_config("tables = [\"bgg\"]").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(dir.path().join("nope.toml").as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d1-migrator.toml");
        std::fs::write(&path, "[destination]\ndatabase = \"games-staging\"\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.destination.database, "games-staging");
    }

    #[test]
    fn test_overrides() {
        let config = MigratorConfig::default().apply_overrides(ConfigOverrides {
            source_db: Some(PathBuf::from("other.db")),
            database: Some("staging".to_string()),
            local: true,
            json: true,
            ..Default::default()
        });

        assert_eq!(config.source_db, PathBuf::from("other.db"));
        assert_eq!(config.output_dir, PathBuf::from("migrations/data"));
        assert_eq!(config.destination.database, "staging");
        assert!(!config.destination.remote);
        assert!(config.destination.json);
    }
}
