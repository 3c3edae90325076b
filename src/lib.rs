//! pg-migration-apply: Checksum-verified SQL migration applier for PostgreSQL
//!
//! This library applies a directory of versioned SQL files to a database
//! exactly once each, in natural-sort order. Applied files are recorded in a
//! ledger table with their content checksums; a file that changes after it
//! was applied fails the run with an integrity error.

pub mod config;
pub mod db;
pub mod discover;
pub mod error;
pub mod fingerprint;
pub mod ledger;
pub mod reconcile;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use config::Config;
pub use discover::MigrationFile;
pub use error::MigrateError;
pub use ledger::{LedgerRecord, LedgerStore};
pub use reconcile::{FileOutcome, Outcome};
pub use report::{MigrationReport, ReportFormat};
pub use runner::Migrator;
