//! Configuration file parsing
//!
//! Reads pg-migration-apply.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub migrations: MigrationsConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub cli: CliConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigrationsConfig {
    /// Directory holding the migration files
    #[serde(default = "default_location")]
    pub location: PathBuf,

    /// Name of the ledger table
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            table: default_table(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection string for the target database. Usually supplied via
    /// --database-url or DATABASE_URL rather than committed to the file.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// List skipped files in the text report
    #[serde(default)]
    pub verbose: bool,

    /// Report format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            format: default_format(),
        }
    }
}

fn default_location() -> PathBuf {
    PathBuf::from("./assets/sql")
}

fn default_table() -> String {
    "_db_migration".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !crate::ledger::is_valid_table_name(&self.migrations.table) {
            return Err(ConfigError::Validation(format!(
                "invalid ledger table name '{}': must be a plain SQL identifier",
                self.migrations.table
            )));
        }
        if crate::report::ReportFormat::parse(&self.cli.format).is_none() {
            return Err(ConfigError::Validation(format!(
                "invalid format value '{}'. Valid values: text, json",
                self.cli.format
            )));
        }
        Ok(())
    }
}
