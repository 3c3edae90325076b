//! Crate-wide error taxonomy
//!
//! Every variant halts a migration run. Each carries the offending file or
//! table plus the underlying cause, so callers can log and exit non-zero
//! without string-matching on messages.

use crate::db::DbError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    /// The migration directory could not be listed.
    #[error("failed to read migration directory {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration file could not be read for hashing. An unreadable file is
    /// a hard failure, never an empty fingerprint.
    #[error("failed to read migration file {path}: {source}")]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target database could not be reached.
    #[error("database connection failed: {source}")]
    Connection {
        #[source]
        source: DbError,
    },

    /// Creating the ledger table or its unique index failed.
    #[error("failed to create ledger table {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: DbError,
    },

    /// A ledger lookup failed for a reason other than "no such record".
    #[error("ledger lookup for {name} failed: {source}")]
    Query {
        name: String,
        #[source]
        source: DbError,
    },

    /// The migration file's SQL failed to execute. The transaction rolled
    /// back; nothing was recorded.
    #[error("migration {name} failed to execute: {source}")]
    Execution {
        name: String,
        #[source]
        source: DbError,
    },

    /// The migration executed and committed, but its ledger record could not
    /// be written. The ledger is now inconsistent with the database and must
    /// be repaired by hand before re-running.
    #[error(
        "migration {name} ran but its ledger record was not written; \
         repair the ledger manually before re-running: {source}"
    )]
    Record {
        name: String,
        #[source]
        source: DbError,
    },

    /// An already-applied file no longer matches its recorded checksum.
    #[error(
        "checksum mismatch for {name}: file hashes to {actual} but the ledger \
         records {recorded}"
    )]
    Integrity {
        name: String,
        actual: String,
        recorded: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_message_names_both_checksums() {
        let err = MigrateError::Integrity {
            name: "v1.sql".to_string(),
            actual: "xyz".to_string(),
            recorded: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("v1.sql"), "message should name the file: {msg}");
        assert!(msg.contains("xyz"), "message should carry the current checksum: {msg}");
        assert!(msg.contains("abc"), "message should carry the stored checksum: {msg}");
    }

    #[test]
    fn test_record_message_demands_manual_repair() {
        let err = MigrateError::Record {
            name: "v2.sql".to_string(),
            source: DbError::Statement("insert failed".to_string()),
        };
        assert!(err.to_string().contains("repair the ledger manually"));
    }
}
