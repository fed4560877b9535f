//! Selection, ordering and result snapshots.
//!
//! # Invariants
//! - Selections are conjunctions of column equalities; nothing else is
//!   expressible, so no caller text is ever spliced into SQL.
//! - A `RowSet` is a detached snapshot; it holds no statement or connection.

use crate::model::pet::{
    Gender, Pet, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT,
};
use crate::repo::pet_repo::{StorageError, StorageResult};
use rusqlite::types::Value;

/// Conjunction of `column = value` predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    conditions: Vec<(String, Value)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection matching exactly one row id.
    pub fn by_id(id: i64) -> Self {
        Self::new().and_eq(COLUMN_ID, id)
    }

    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|(column, _)| column.as_str())
    }

    /// `WHERE` body with one `?` per condition, or `None` when empty.
    pub(crate) fn to_sql(&self) -> Option<String> {
        if self.conditions.is_empty() {
            return None;
        }
        let clauses: Vec<String> = self
            .conditions
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect();
        Some(clauses.join(" AND "))
    }

    pub(crate) fn args(&self) -> impl Iterator<Item = &Value> {
        self.conditions.iter().map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub column: String,
    pub descending: bool,
}

impl SortOrder {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    pub(crate) fn to_sql(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{} {direction}", self.column)
    }
}

/// Read-only snapshot of a query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|values| values.get(index))
    }

    pub fn get_i64(&self, row: usize, column: &str) -> Option<i64> {
        match self.get(row, column)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_text(&self, row: usize, column: &str) -> Option<&str> {
        match self.get(row, column)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Materializes every row as a `Pet`.
    ///
    /// Requires a projection covering all columns and rejects rows whose
    /// stored values break the record contract.
    pub fn to_pets(&self) -> StorageResult<Vec<Pet>> {
        (0..self.rows.len()).map(|row| self.pet_at(row)).collect()
    }

    fn pet_at(&self, row: usize) -> StorageResult<Pet> {
        let id = self.require_i64(row, COLUMN_ID)?;
        let gender_code = self.require_i64(row, COLUMN_GENDER)?;
        let gender = Gender::from_i64(gender_code).ok_or_else(|| {
            StorageError::InvalidData(format!(
                "invalid gender `{gender_code}` in pets.gender for _id {id}"
            ))
        })?;

        Ok(Pet {
            id,
            name: self.require_text(row, COLUMN_NAME)?.to_string(),
            breed: self.require_text(row, COLUMN_BREED)?.to_string(),
            gender,
            weight: self.require_i64(row, COLUMN_WEIGHT)?,
        })
    }

    fn require_i64(&self, row: usize, column: &str) -> StorageResult<i64> {
        self.get_i64(row, column)
            .ok_or_else(|| missing_or_mistyped(column, "integer"))
    }

    fn require_text(&self, row: usize, column: &str) -> StorageResult<&str> {
        self.get_text(row, column)
            .ok_or_else(|| missing_or_mistyped(column, "text"))
    }
}

fn missing_or_mistyped(column: &str, expected: &str) -> StorageError {
    StorageError::InvalidData(format!(
        "column `{column}` is missing from the projection or is not {expected}"
    ))
}
