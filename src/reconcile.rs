//! Reconciliation engine
//!
//! The per-file decide-and-act loop: consult the ledger, then skip, apply, or
//! halt. Files are processed strictly in discovery order, so by naming
//! convention a file only runs after everything before it. The engine never
//! retries; every failure propagates and stops the run.

use crate::db::SqlExecutor;
use crate::discover::MigrationFile;
use crate::error::MigrateError;
use crate::ledger::{LedgerStore, RecordResult};
use serde::Serialize;
use strum_macros::Display;

/// What happened to one file during reconciliation. Failures are not
/// outcomes; they halt the run as [`MigrateError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    /// Newly executed and recorded in this run.
    Applied,

    /// Already in the ledger with a matching checksum; no action taken.
    Skipped,
}

/// Per-file reconciliation result, in application order.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub name: String,
    pub outcome: Outcome,
}

/// Reconcile `files` against the ledger in `table`, applying as needed.
///
/// `db` is the single database collaborator: ledger reads/writes via
/// [`LedgerStore`], file execution via [`SqlExecutor`]. Each file resolves to
/// exactly one of:
///
/// - no ledger record: execute the file's SQL in one transaction, then record
///   it in a second transaction (`Applied`);
/// - record present, checksum matches: no side effect (`Skipped`);
/// - record present, checksum differs: halt with [`MigrateError::Integrity`]
///   without touching later files.
///
/// A unique-constraint conflict on record means another migrator applied the
/// file concurrently: the ledger is re-read and the run continues only when
/// the stored checksum matches ours.
pub fn reconcile<D>(
    db: &mut D,
    table: &str,
    files: &[MigrationFile],
) -> Result<Vec<FileOutcome>, MigrateError>
where
    D: LedgerStore + SqlExecutor,
{
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        let existing = db
            .lookup(table, &file.name)
            .map_err(|e| MigrateError::Query {
                name: file.name.clone(),
                source: e,
            })?;

        let outcome = match existing {
            None => apply(db, table, file)?,
            Some(record) => {
                if record.fingerprint == file.fingerprint {
                    log::debug!(
                        "skipped existing migration {} (sequence {}, checksum {})",
                        file.name,
                        record.sequence,
                        record.fingerprint
                    );
                    Outcome::Skipped
                } else {
                    return Err(MigrateError::Integrity {
                        name: file.name.clone(),
                        actual: file.fingerprint.clone(),
                        recorded: record.fingerprint,
                    });
                }
            }
        };

        outcomes.push(FileOutcome {
            name: file.name.clone(),
            outcome,
        });
    }

    Ok(outcomes)
}

/// Execute one file and record it. Two transactions: execution commits first,
/// then the ledger insert. A crash between the two leaves the ledger behind
/// the database; that window is surfaced as [`MigrateError::Record`] and is
/// not auto-repaired.
fn apply<D>(db: &mut D, table: &str, file: &MigrationFile) -> Result<Outcome, MigrateError>
where
    D: LedgerStore + SqlExecutor,
{
    db.execute(&file.sql).map_err(|e| MigrateError::Execution {
        name: file.name.clone(),
        source: e,
    })?;

    match db.record(table, &file.name, &file.fingerprint) {
        Ok(RecordResult::Recorded) => {
            log::info!(
                "applied migration {} (checksum {})",
                file.name,
                file.fingerprint
            );
            Ok(Outcome::Applied)
        }
        Ok(RecordResult::Conflict) => resolve_conflict(db, table, file),
        Err(e) => Err(MigrateError::Record {
            name: file.name.clone(),
            source: e,
        }),
    }
}

/// A concurrent migrator recorded this file between our lookup and insert.
/// Re-read the ledger: a matching checksum means the file is applied and the
/// run can continue; anything else is unrecoverable.
fn resolve_conflict<D>(
    db: &mut D,
    table: &str,
    file: &MigrationFile,
) -> Result<Outcome, MigrateError>
where
    D: LedgerStore + SqlExecutor,
{
    let record = db
        .lookup(table, &file.name)
        .map_err(|e| MigrateError::Query {
            name: file.name.clone(),
            source: e,
        })?;

    match record {
        Some(record) if record.fingerprint == file.fingerprint => {
            log::warn!(
                "migration {} was recorded by a concurrent run; continuing",
                file.name
            );
            Ok(Outcome::Skipped)
        }
        Some(record) => Err(MigrateError::Integrity {
            name: file.name.clone(),
            actual: file.fingerprint.clone(),
            recorded: record.fingerprint,
        }),
        // Conflict on insert but no row on re-read: the ledger is in an
        // inconsistent state we cannot reason about.
        None => Err(MigrateError::Record {
            name: file.name.clone(),
            source: crate::db::DbError::UniqueViolation(
                "insert conflicted but no record found on re-check".to_string(),
            ),
        }),
    }
}
