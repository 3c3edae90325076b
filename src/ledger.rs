//! Ledger store
//!
//! The ledger is the persisted table recording which migration files have
//! been applied and their checksums. One row per applied file, created
//! exactly once at apply time, never updated or deleted. The unique index on
//! `name` is what turns a cross-process double-apply race into a detectable
//! conflict.

use crate::db::DbError;

/// A persisted ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Store-assigned identity, monotonically increasing.
    pub sequence: i32,

    /// Migration file name; unique within the table.
    pub name: String,

    /// Checksum recorded when the file was applied.
    pub fingerprint: String,
}

/// Result of inserting a ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordResult {
    /// The record committed.
    Recorded,

    /// The unique index rejected the insert: a concurrent migrator recorded
    /// this name first. Callers re-check via [`LedgerStore::lookup`].
    Conflict,
}

/// Read/write access to the ledger table.
///
/// The table name is passed per call; implementations interpolate it into
/// statement text and must only accept names that pass
/// [`is_valid_table_name`].
pub trait LedgerStore {
    /// Idempotently create the ledger table and its unique index, inside one
    /// transaction. Failure rolls back fully; no partial schema.
    fn ensure_table(&mut self, table: &str) -> Result<(), DbError>;

    /// Point lookup by file name. `Ok(None)` means "never applied" and is
    /// not an error.
    fn lookup(&mut self, table: &str, name: &str) -> Result<Option<LedgerRecord>, DbError>;

    /// Insert a record for a just-applied file, inside its own transaction.
    /// A unique-constraint rejection surfaces as [`RecordResult::Conflict`].
    fn record(&mut self, table: &str, name: &str, fingerprint: &str)
    -> Result<RecordResult, DbError>;
}

/// Whether `name` is a plain SQL identifier safe to interpolate into
/// statement text.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// DDL for the ledger table. `sequence` is the store-assigned identity,
/// `name` the unique file name, `checksum` the recorded fingerprint.
pub(crate) fn create_table_sql(table: &str) -> String {
    format!(
        "create table if not exists {table} (\n\
         \x20   sequence serial primary key,\n\
         \x20   name varchar not null,\n\
         \x20   checksum varchar not null\n\
         );"
    )
}

/// DDL for the unique index on `name`.
pub(crate) fn create_index_sql(table: &str) -> String {
    format!("create unique index if not exists {table}_name on {table} (name asc);")
}

/// Parameterized point lookup; `$1` is the file name.
pub(crate) fn lookup_sql(table: &str) -> String {
    format!("select sequence, checksum from {table} where name = $1")
}

/// Parameterized insert; `$1` is the file name, `$2` the checksum.
pub(crate) fn insert_sql(table: &str) -> String {
    format!("insert into {table} (name, checksum) values ($1, $2)")
}
