//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Create the schema on a fresh database and upgrade older ones atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - After migrating, the `pets` table carries every record column.
//! - Migrations only move forward; a database newer than this binary is
//!   rejected instead of downgraded.

use crate::db::{DbError, DbResult};
use crate::model::pet::{ALL_COLUMNS, TABLE_NAME};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_pets.sql"),
}];

/// Result of bringing a connection up to the latest schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Fresh database; every migration ran.
    Created { version: u32 },
    /// Existing database behind this binary; `on_upgrade` ran.
    Upgraded { from: u32, to: u32 },
    /// Nothing to do.
    UpToDate { version: u32 },
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        verify_pets_table(conn)?;
        return Ok(MigrationOutcome::UpToDate { version: latest });
    }

    let tx = conn.transaction()?;
    let outcome = if current_version == 0 {
        on_create(&tx)?;
        MigrationOutcome::Created { version: latest }
    } else {
        on_upgrade(&tx, current_version, latest)?;
        MigrationOutcome::Upgraded {
            from: current_version,
            to: latest,
        }
    };
    verify_pets_table(&tx)?;
    tx.commit()?;

    Ok(outcome)
}

/// Upgrade hook invoked when the on-disk schema is behind this binary.
///
/// Runs every registered migration in `(old_version, new_version]`. With a
/// single schema version there is never anything to run, but the hook is the
/// place later versions plug into.
pub fn on_upgrade(conn: &Connection, old_version: u32, new_version: u32) -> DbResult<()> {
    info!(
        "event=db_migrate module=db status=start kind=upgrade from={} to={}",
        old_version, new_version
    );
    run_range(conn, old_version, new_version)
}

fn on_create(conn: &Connection) -> DbResult<()> {
    let latest = latest_version();
    info!(
        "event=db_migrate module=db status=start kind=create to={}",
        latest
    );
    run_range(conn, 0, latest)
}

fn run_range(conn: &Connection, old_version: u32, new_version: u32) -> DbResult<()> {
    for migration in MIGRATIONS {
        if migration.version <= old_version || migration.version > new_version {
            continue;
        }

        conn.execute_batch(migration.sql)?;
        conn.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    Ok(())
}

/// Rejects a `pets` table that predates the tracked schema.
///
/// `CREATE TABLE IF NOT EXISTS` leaves such a table untouched, so a missing
/// column would otherwise only surface on the first read or write.
fn verify_pets_table(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({TABLE_NAME});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    let missing: Vec<String> = ALL_COLUMNS
        .iter()
        .filter(|column| !present.iter().any(|name| name == *column))
        .map(|column| column.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    error!(
        "event=db_migrate module=db status=error error_code=schema_mismatch table={} missing={}",
        TABLE_NAME,
        missing.join(",")
    );
    Err(DbError::SchemaMismatch {
        table: TABLE_NAME,
        missing,
    })
}

pub(crate) fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
