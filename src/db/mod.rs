//! Database boundary
//!
//! The engine talks to a SQL-speaking store through two narrow traits:
//! [`SqlExecutor`] (defined here) runs arbitrary statement text, and
//! [`crate::ledger::LedgerStore`] covers the ledger table. The Postgres
//! implementation lives in [`postgres`]; tests substitute in-memory fakes.

pub mod postgres;

use thiserror::Error;

/// Errors crossing the database boundary.
///
/// Classification is by tagged variant, never by matching on message text;
/// the Postgres impl maps `SqlState` codes into these.
#[derive(Debug, Error)]
pub enum DbError {
    /// Could not reach or authenticate against the database.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A statement failed to execute; the surrounding transaction rolled back.
    #[error("statement failed: {0}")]
    Statement(String),

    /// An insert hit a unique constraint.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

/// Executes statement text transactionally.
pub trait SqlExecutor {
    /// Run `sql` as one statement batch inside a single transaction.
    /// Any failure rolls the whole batch back.
    fn execute(&mut self, sql: &str) -> Result<(), DbError>;
}
