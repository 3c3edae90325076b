//! pg-migration-apply CLI
//!
//! Entry point for the command-line tool.
//!
//! Exit codes:
//! - 0: All migration files skipped or applied
//! - 1: Run halted on a migration error (integrity mismatch, execution
//!   failure, ledger inconsistency, ...)
//! - 2: Tool error (config error, missing database URL, I/O error, etc.)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use pg_migration_apply::{Config, MigrateError, Migrator, ReportFormat};

/// Default config file name used when --config is not explicitly provided.
const DEFAULT_CONFIG_FILE: &str = "pg-migration-apply.toml";

#[derive(Parser, Debug)]
#[command(name = "pg-migration-apply")]
#[command(about = "Checksum-verified SQL migration applier for PostgreSQL", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the migration files
    #[arg(long)]
    location: Option<PathBuf>,

    /// Name of the ledger table
    #[arg(long)]
    table: Option<String>,

    /// Connection string for the target database
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Override report format (text, json)
    #[arg(long)]
    format: Option<String>,

    /// List skipped files in the text report
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(()) => {
            // exit 0 is implicit
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if err.downcast_ref::<MigrateError>().is_some() {
                std::process::exit(1);
            }
            std::process::exit(2);
        }
    }
}

/// Run one migration pass and print the report.
fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;

    let format = ReportFormat::parse(&config.cli.format)
        .context("unreachable: format validated with the config")?;

    let report = Migrator::new(config.clone()).run()?;

    match format {
        ReportFormat::Text => print!("{}", report.to_text(config.cli.verbose)),
        ReportFormat::Json => println!("{}", report.to_json().context("serialize report")?),
    }

    Ok(())
}

/// Load configuration from file and layer CLI overrides on top.
///
/// If `--config` is explicitly provided the file must exist. With the default
/// path, a missing file falls back to defaults with a warning.
fn build_config(args: &Args) -> Result<Config> {
    let mut config = load_config(&args.config)?;

    if let Some(ref location) = args.location {
        config.migrations.location = location.clone();
    }
    if let Some(ref table) = args.table {
        config.migrations.table = table.clone();
    }
    if let Some(ref url) = args.database_url {
        config.database.url = Some(url.clone());
    }
    if let Some(ref format) = args.format {
        config.cli.format = format.clone();
    }
    if args.verbose {
        config.cli.verbose = true;
    }

    // Overrides bypass from_file, so re-validate the merged result.
    config.validate().context("Invalid configuration")?;

    if config.database.url.is_none() {
        anyhow::bail!("No database URL configured; pass --database-url or set DATABASE_URL");
    }

    Ok(config)
}

fn load_config(config_path: &Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => {
            // User explicitly provided --config; file must exist.
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::from_file(path).context("Failed to load configuration")
        }
        None => {
            // Using default config path; missing file is OK.
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Config::from_file(&default_path).context("Failed to load configuration")
            } else {
                eprintln!(
                    "Warning: Config file {} not found, using defaults",
                    default_path.display()
                );
                Ok(Config::default())
            }
        }
    }
}
