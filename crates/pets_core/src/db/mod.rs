//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Own the single SQLite connection backing the `pets` table.
//! - Apply schema migrations in deterministic, forward-only order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No pet data is read or written before migrations succeed.
//! - A failed open is fatal for the data layer and is reported as `DbError`,
//!   never as a per-call provider error.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::SchemaManager;

pub type DbResult<T> = Result<T, DbError>;

/// Fatal failure while opening the store or bringing its schema up to date.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; there is no downgrade path.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A table already on disk lacks columns the pet record needs.
    SchemaMismatch {
        table: &'static str,
        missing: Vec<String>,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "pets store failure: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "pets schema version {db_version} is newer than this build ({latest_supported})"
            ),
            Self::SchemaMismatch { table, missing } => write!(
                f,
                "existing table `{table}` is missing columns: {}",
                missing.join(", ")
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::SchemaMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
