//! Blocking Postgres implementation of the database boundary
//!
//! Wraps a [`postgres::Client`]. Every operation opens its own transaction
//! and commits or rolls back before returning; nothing spans two calls.

use crate::db::{DbError, SqlExecutor};
use crate::ledger::{self, LedgerRecord, LedgerStore, RecordResult};
use postgres::error::SqlState;
use postgres::{Client, NoTls};

/// One blocking connection to the target database.
pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    /// Connect to `url` (a libpq-style connection string).
    pub fn connect(url: &str) -> Result<Self, DbError> {
        let client =
            Client::connect(url, NoTls).map_err(|e| DbError::Connection(e.to_string()))?;
        Ok(Self { client })
    }
}

/// Classify a driver error by `SqlState`, not by message text.
fn map_pg_error(e: postgres::Error) -> DbError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        DbError::UniqueViolation(e.to_string())
    } else if e.is_closed() {
        DbError::Connection(e.to_string())
    } else {
        DbError::Statement(e.to_string())
    }
}

impl SqlExecutor for PgConnection {
    fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        let mut tx = self.client.transaction().map_err(map_pg_error)?;
        tx.batch_execute(sql).map_err(map_pg_error)?;
        tx.commit().map_err(map_pg_error)
    }
}

impl LedgerStore for PgConnection {
    fn ensure_table(&mut self, table: &str) -> Result<(), DbError> {
        let mut tx = self.client.transaction().map_err(map_pg_error)?;
        tx.batch_execute(&ledger::create_table_sql(table))
            .map_err(map_pg_error)?;
        tx.batch_execute(&ledger::create_index_sql(table))
            .map_err(map_pg_error)?;
        tx.commit().map_err(map_pg_error)
    }

    fn lookup(&mut self, table: &str, name: &str) -> Result<Option<LedgerRecord>, DbError> {
        let row = self
            .client
            .query_opt(&ledger::lookup_sql(table), &[&name])
            .map_err(map_pg_error)?;
        Ok(row.map(|row| LedgerRecord {
            sequence: row.get(0),
            name: name.to_string(),
            fingerprint: row.get(1),
        }))
    }

    fn record(
        &mut self,
        table: &str,
        name: &str,
        fingerprint: &str,
    ) -> Result<RecordResult, DbError> {
        let mut tx = self.client.transaction().map_err(map_pg_error)?;
        match tx.execute(&ledger::insert_sql(table), &[&name, &fingerprint]) {
            Ok(_) => {
                tx.commit().map_err(map_pg_error)?;
                Ok(RecordResult::Recorded)
            }
            Err(e) => match map_pg_error(e) {
                DbError::UniqueViolation(_) => Ok(RecordResult::Conflict),
                other => Err(other),
            },
        }
    }
}
