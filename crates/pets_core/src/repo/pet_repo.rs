//! Pet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Turn validated payloads and selections into single SQL statements.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Only `ValidatedPayload` values reach write statements.
//! - Column names reaching SQL have been checked against the record contract
//!   by the caller; values are always bound, never formatted in.
//! - One call issues one statement; there are no multi-statement transactions.

use crate::db::SchemaManager;
use crate::model::pet::{COLUMN_ID, TABLE_NAME};
use crate::repo::query::{RowSet, Selection, SortOrder};
use crate::validation::ValidatedPayload;
use rusqlite::types::Value;
use rusqlite::params_from_iter;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// The store rejected or could not execute a statement.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    /// Persisted data does not satisfy the record contract.
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Storage operations behind the provider.
pub trait PetRepository {
    fn query_rows(
        &self,
        projection: &[&str],
        selection: &Selection,
        sort_order: Option<&SortOrder>,
    ) -> StorageResult<RowSet>;
    /// Inserts one row and returns its generated id.
    fn insert_row(&self, payload: &ValidatedPayload) -> StorageResult<i64>;
    fn update_rows(&self, payload: &ValidatedPayload, selection: &Selection)
        -> StorageResult<usize>;
    fn delete_rows(&self, selection: &Selection) -> StorageResult<usize>;
}

/// SQLite-backed pet repository borrowing the store's connection.
pub struct SqlitePetRepository<'db> {
    store: &'db SchemaManager,
}

impl<'db> SqlitePetRepository<'db> {
    pub fn new(store: &'db SchemaManager) -> Self {
        Self { store }
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn query_rows(
        &self,
        projection: &[&str],
        selection: &Selection,
        sort_order: Option<&SortOrder>,
    ) -> StorageResult<RowSet> {
        let mut sql = format!("SELECT {} FROM {TABLE_NAME}", projection.join(", "));
        push_where(&mut sql, selection);
        match sort_order {
            Some(order) => {
                sql.push_str(" ORDER BY ");
                sql.push_str(&order.to_sql());
            }
            None => sql.push_str(&format!(" ORDER BY {COLUMN_ID} ASC")),
        }

        let conn = self.store.readable();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(selection.args()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(projection.len());
            for index in 0..projection.len() {
                values.push(row.get::<_, Value>(index)?);
            }
            collected.push(values);
        }

        let columns = projection.iter().map(|column| column.to_string()).collect();
        Ok(RowSet::new(columns, collected))
    }

    fn insert_row(&self, payload: &ValidatedPayload) -> StorageResult<i64> {
        let columns: Vec<&str> = payload.columns().collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders});",
            columns.join(", ")
        );

        let conn = self.store.writable();
        conn.execute(&sql, params_from_iter(payload.values()))?;
        Ok(conn.last_insert_rowid())
    }

    fn update_rows(
        &self,
        payload: &ValidatedPayload,
        selection: &Selection,
    ) -> StorageResult<usize> {
        let assignments: Vec<String> = payload
            .columns()
            .map(|column| format!("{column} = ?"))
            .collect();
        let mut sql = format!("UPDATE {TABLE_NAME} SET {}", assignments.join(", "));
        push_where(&mut sql, selection);

        let changed = self.store.writable().execute(
            &sql,
            params_from_iter(payload.values().chain(selection.args())),
        )?;
        Ok(changed)
    }

    fn delete_rows(&self, selection: &Selection) -> StorageResult<usize> {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        push_where(&mut sql, selection);

        let changed = self
            .store
            .writable()
            .execute(&sql, params_from_iter(selection.args()))?;
        Ok(changed)
    }
}

fn push_where(sql: &mut String, selection: &Selection) {
    if let Some(clause) = selection.to_sql() {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
}
