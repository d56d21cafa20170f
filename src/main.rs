// ABOUTME: CLI entry point for d1-migrator
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Args, Parser, Subcommand};
use d1_migrator::commands;
use d1_migrator::config::{self, ConfigOverrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "d1-migrator")]
#[command(about = "Migrate a local SQLite database to Cloudflare D1 and verify the result", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct SourceArgs {
    /// SQLite database to read from
    #[arg(long)]
    source_db: Option<PathBuf>,
}

#[derive(Args, Clone, Default)]
struct DestinationArgs {
    /// D1 database name
    #[arg(long)]
    database: Option<String>,
    /// Query the local D1 preview instead of the remote database
    #[arg(long)]
    local: bool,
    /// Request JSON output from wrangler and parse it structurally
    #[arg(long)]
    json: bool,
    /// wrangler executable to invoke
    #[arg(long)]
    wrangler: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export SQLite tables as D1-compatible INSERT statements
    Export {
        #[command(flatten)]
        source: SourceArgs,
        /// Directory receiving one <table>.sql file per table
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[command(flatten)]
        destination: DestinationArgs,
    },
    /// Compare row counts between SQLite and D1 and run sample queries
    Verify {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        destination: DestinationArgs,
    },
}

impl Commands {
    fn overrides(&self) -> ConfigOverrides {
        let (source, output_dir, destination) = match self {
            Commands::Export {
                source,
                output_dir,
                destination,
            } => (source, output_dir.clone(), destination),
            Commands::Verify {
                source,
                destination,
            } => (source, None, destination),
        };

        ConfigOverrides {
            source_db: source.source_db.clone(),
            output_dir,
            database: destination.database.clone(),
            wrangler: destination.wrangler.clone(),
            local: destination.local,
            json: destination.json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config =
        config::load_config(cli.config.as_deref())?.apply_overrides(cli.command.overrides());

    match cli.command {
        Commands::Export { .. } => commands::export(&config),
        Commands::Verify { .. } => commands::verify(&config).await,
    }
}
