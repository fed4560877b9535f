//! Write payload validation.
//!
//! # Responsibility
//! - Check every field of an insert/update payload before storage sees it.
//! - Normalize the few values that have a storage default (`breed`, `weight`).
//!
//! # Invariants
//! - Validation never touches storage.
//! - A payload either validates completely or yields exactly one error; no
//!   partially validated payload escapes.
//! - Fields are checked in table column order, then unknown keys.

use crate::model::pet::{
    is_known_column, is_valid_gender, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME,
    COLUMN_WEIGHT,
};
use crate::model::values::PetValues;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    MissingRequired,
    InvalidEnum,
    OutOfRange,
    /// Value has the wrong SQLite storage class.
    InvalidType,
    /// Key is not a column of the pets table.
    UnknownField,
    /// Column is storage-owned and cannot be written.
    ImmutableField,
}

impl ValidationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequired => "missing required value",
            Self::InvalidEnum => "value outside the allowed set",
            Self::OutOfRange => "value out of range",
            Self::InvalidType => "value has the wrong type",
            Self::UnknownField => "unknown column",
            Self::ImmutableField => "column cannot be written",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.field, self.reason.as_str())
    }
}

impl Error for ValidationError {}

/// Payload that passed validation, in table column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedPayload {
    columns: Vec<(&'static str, Value)>,
}

impl ValidatedPayload {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(column, _)| *column)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|(_, value)| value)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Insert,
    Update,
}

/// Validates a full insert payload.
///
/// `name` and `gender` are required; `weight` must be `>= 0` when given and an
/// explicit `NULL` weight is dropped so the column default applies; `breed` is
/// free text and `NULL` becomes the empty string.
pub fn validate_for_insert(values: &PetValues) -> Result<ValidatedPayload, ValidationError> {
    validate(values, Mode::Insert)
}

/// Validates a partial update payload.
///
/// Same per-field rules as insert, applied only to fields present. An empty
/// payload validates to an empty `ValidatedPayload`.
pub fn validate_for_update(values: &PetValues) -> Result<ValidatedPayload, ValidationError> {
    validate(values, Mode::Update)
}

fn validate(values: &PetValues, mode: Mode) -> Result<ValidatedPayload, ValidationError> {
    let mut columns = Vec::with_capacity(values.len());

    if let Some(name) = check_name(values.get(COLUMN_NAME), mode)? {
        columns.push((COLUMN_NAME, name));
    }
    if let Some(breed) = check_breed(values.get(COLUMN_BREED))? {
        columns.push((COLUMN_BREED, breed));
    }
    if let Some(gender) = check_gender(values.get(COLUMN_GENDER), mode)? {
        columns.push((COLUMN_GENDER, gender));
    }
    if let Some(weight) = check_weight(values.get(COLUMN_WEIGHT))? {
        columns.push((COLUMN_WEIGHT, weight));
    }

    for (column, _) in values.iter() {
        if column == COLUMN_ID {
            return Err(ValidationError::new(column, ValidationReason::ImmutableField));
        }
        if !is_known_column(column) {
            return Err(ValidationError::new(column, ValidationReason::UnknownField));
        }
    }

    Ok(ValidatedPayload { columns })
}

fn check_name(value: Option<&Value>, mode: Mode) -> Result<Option<Value>, ValidationError> {
    match value {
        None if mode == Mode::Update => Ok(None),
        None | Some(Value::Null) => Err(missing(COLUMN_NAME)),
        Some(Value::Text(text)) if text.trim().is_empty() => Err(missing(COLUMN_NAME)),
        Some(Value::Text(text)) => Ok(Some(Value::Text(text.clone()))),
        Some(_) => Err(ValidationError::new(
            COLUMN_NAME,
            ValidationReason::InvalidType,
        )),
    }
}

fn check_breed(value: Option<&Value>) -> Result<Option<Value>, ValidationError> {
    match value {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(Value::Text(String::new()))),
        Some(Value::Text(text)) => Ok(Some(Value::Text(text.clone()))),
        Some(_) => Err(ValidationError::new(
            COLUMN_BREED,
            ValidationReason::InvalidType,
        )),
    }
}

fn check_gender(value: Option<&Value>, mode: Mode) -> Result<Option<Value>, ValidationError> {
    match value {
        None if mode == Mode::Update => Ok(None),
        None | Some(Value::Null) => Err(missing(COLUMN_GENDER)),
        Some(Value::Integer(code)) if is_valid_gender(*code) => Ok(Some(Value::Integer(*code))),
        Some(Value::Integer(_)) => Err(ValidationError::new(
            COLUMN_GENDER,
            ValidationReason::InvalidEnum,
        )),
        Some(_) => Err(ValidationError::new(
            COLUMN_GENDER,
            ValidationReason::InvalidType,
        )),
    }
}

fn check_weight(value: Option<&Value>) -> Result<Option<Value>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Integer(weight)) if *weight >= 0 => Ok(Some(Value::Integer(*weight))),
        Some(Value::Integer(_)) => Err(ValidationError::new(
            COLUMN_WEIGHT,
            ValidationReason::OutOfRange,
        )),
        Some(_) => Err(ValidationError::new(
            COLUMN_WEIGHT,
            ValidationReason::InvalidType,
        )),
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError::new(field, ValidationReason::MissingRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_column_order() {
        let values = PetValues::new()
            .with_int(COLUMN_WEIGHT, 3)
            .with_int(COLUMN_GENDER, 2)
            .with_text(COLUMN_NAME, "Mia");

        let payload = validate_for_insert(&values).unwrap();
        let columns: Vec<_> = payload.columns().collect();
        assert_eq!(columns, [COLUMN_NAME, COLUMN_GENDER, COLUMN_WEIGHT]);
    }

    #[test]
    fn null_breed_is_stored_as_empty_text() {
        let values = PetValues::new().with_null(COLUMN_BREED);
        let payload = validate_for_update(&values).unwrap();
        assert_eq!(
            payload.get(COLUMN_BREED),
            Some(&Value::Text(String::new()))
        );
    }

    #[test]
    fn null_weight_is_dropped() {
        let values = PetValues::new().with_null(COLUMN_WEIGHT);
        assert!(validate_for_update(&values).unwrap().is_empty());
    }
}
