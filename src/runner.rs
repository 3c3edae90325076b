//! Migration runner
//!
//! One end-to-end pass: ensure the ledger table exists, discover the files,
//! reconcile. [`Migrator`] is the convenience wrapper that connects to
//! Postgres from a [`Config`] and runs a pass.

use crate::config::Config;
use crate::db::SqlExecutor;
use crate::db::postgres::PgConnection;
use crate::discover::discover;
use crate::error::MigrateError;
use crate::ledger::LedgerStore;
use crate::reconcile::reconcile;
use crate::report::MigrationReport;
use std::path::Path;

/// Run one full pass against an already-open database collaborator.
///
/// Either every file ends up skipped or applied, or the first unrecoverable
/// error halts the pass and propagates with the offending file attached.
pub fn run<D>(db: &mut D, location: &Path, table: &str) -> Result<MigrationReport, MigrateError>
where
    D: LedgerStore + SqlExecutor,
{
    log::info!("migration run started: location {}, table {}", location.display(), table);

    db.ensure_table(table).map_err(|e| MigrateError::Schema {
        table: table.to_string(),
        source: e,
    })?;

    let files = discover(location)?;
    let outcomes = reconcile(db, table, &files)?;
    let report = MigrationReport { outcomes };

    log::info!(
        "migration run done: {} applied, {} skipped",
        report.applied(),
        report.skipped()
    );
    Ok(report)
}

/// Connects to the configured database and drives [`run`].
pub struct Migrator {
    config: Config,
}

impl Migrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Open a connection and run one pass.
    pub fn run(&self) -> Result<MigrationReport, MigrateError> {
        let url = self.config.database.url.as_deref().ok_or_else(|| {
            MigrateError::Connection {
                source: crate::db::DbError::Connection("no database URL configured".to_string()),
            }
        })?;
        let mut db = PgConnection::connect(url)
            .map_err(|e| MigrateError::Connection { source: e })?;
        run(
            &mut db,
            &self.config.migrations.location,
            &self.config.migrations.table,
        )
    }
}
