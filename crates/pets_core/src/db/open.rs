//! Connection ownership for the pets store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Run schema creation/upgrade before handing out the connection.
//!
//! # Invariants
//! - A `SchemaManager` only exists once migrations are fully applied.
//! - Read and write handles are the same connection; the split documents
//!   intent at call sites.

use super::migrations::{apply_migrations, current_user_version, MigrationOutcome};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owner of the SQLite connection and the `pets` table lifecycle.
#[derive(Debug)]
pub struct SchemaManager {
    conn: Connection,
    outcome: MigrationOutcome,
}

impl SchemaManager {
    /// Opens a SQLite database file, creating or upgrading the schema.
    ///
    /// Opening the same file again is idempotent.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    ///
    /// # Errors
    /// - `DbError::Sqlite` when the file cannot be opened or the table cannot
    ///   be created.
    /// - `DbError::UnsupportedSchemaVersion` when the file was written by a
    ///   newer schema.
    /// - `DbError::SchemaMismatch` when a `pets` table already exists without
    ///   the record columns.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        open_with("file", || Connection::open(path))
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> DbResult<Self> {
        open_with("memory", Connection::open_in_memory)
    }

    /// Read-oriented handle.
    pub fn readable(&self) -> &Connection {
        &self.conn
    }

    /// Write-oriented handle.
    pub fn writable(&self) -> &Connection {
        &self.conn
    }

    /// What the migration step did when this manager was opened.
    pub fn migration_outcome(&self) -> MigrationOutcome {
        self.outcome
    }

    /// Current on-disk schema version.
    pub fn schema_version(&self) -> DbResult<u32> {
        current_user_version(&self.conn)
    }

    /// Closes the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> DbResult<()> {
        self.conn.close().map_err(|(_, err)| DbError::Sqlite(err))?;
        info!("event=db_close module=db status=ok");
        Ok(())
    }
}

fn open_with<F>(mode: &str, connect: F) -> DbResult<SchemaManager>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(outcome) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={} schema={:?}",
                mode,
                started_at.elapsed().as_millis(),
                outcome
            );
            Ok(SchemaManager { conn, outcome })
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
