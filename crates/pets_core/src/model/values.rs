//! Write payloads.
//!
//! A payload maps column names to SQLite values. A column that was never put
//! is absent, which is different from one explicitly set to `NULL` or to a
//! default; partial updates rely on that difference.

use rusqlite::types::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetValues {
    entries: BTreeMap<String, Value>,
}

impl PetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: impl Into<String>, value: Value) {
        self.entries.insert(column.into(), value);
    }

    pub fn put_text(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.put(column, Value::Text(value.into()));
    }

    pub fn put_int(&mut self, column: impl Into<String>, value: i64) {
        self.put(column, Value::Integer(value));
    }

    pub fn put_null(&mut self, column: impl Into<String>) {
        self.put(column, Value::Null);
    }

    /// Builder form of `put_text`.
    pub fn with_text(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.put_text(column, value);
        self
    }

    /// Builder form of `put_int`.
    pub fn with_int(mut self, column: impl Into<String>, value: i64) -> Self {
        self.put_int(column, value);
        self
    }

    pub fn with_null(mut self, column: impl Into<String>) -> Self {
        self.put_null(column);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.entries.remove(column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }
}
