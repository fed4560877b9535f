//! Pet record contract.
//!
//! # Responsibility
//! - Define the `pets` table layout and the gender domain.
//! - Provide the canonical addresses and resource type tags.
//!
//! # Invariants
//! - `ALL_COLUMNS` order matches the persisted column order.
//! - Gender codes are stable on disk: unknown=0, male=1, female=2.

use crate::model::uri::ContentUri;
use crate::model::values::PetValues;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Scheme shared by every pets address.
pub const CONTENT_SCHEME: &str = "content";
/// Namespace owning the pets resource type.
pub const CONTENT_AUTHORITY: &str = "com.example.pets";
/// Collection path segment appended to the authority.
pub const PATH_PETS: &str = "pets";

/// Name of the backing table.
pub const TABLE_NAME: &str = "pets";

/// Storage-assigned row id.
pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BREED: &str = "breed";
/// One of the `Gender` codes.
pub const COLUMN_GENDER: &str = "gender";
pub const COLUMN_WEIGHT: &str = "weight";

/// Every column, in table order.
pub const ALL_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_NAME,
    COLUMN_BREED,
    COLUMN_GENDER,
    COLUMN_WEIGHT,
];

/// Type tag for addresses naming the whole collection.
pub const CONTENT_LIST_TYPE: &str = "vnd.pets.cursor.dir/com.example.pets.pets";
/// Type tag for addresses naming exactly one pet.
pub const CONTENT_ITEM_TYPE: &str = "vnd.pets.cursor.item/com.example.pets.pets";

/// Returns whether `name` is a column of the pets table.
pub fn is_known_column(name: &str) -> bool {
    ALL_COLUMNS.contains(&name)
}

/// Address of the pets collection.
pub fn collection_uri() -> ContentUri {
    ContentUri::new(CONTENT_SCHEME, CONTENT_AUTHORITY, [PATH_PETS])
}

/// Address of one pet row.
pub fn item_uri(id: i64) -> ContentUri {
    collection_uri().with_appended_id(id)
}

/// Gender domain for `COLUMN_GENDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub const UNKNOWN: i64 = 0;
    pub const MALE: i64 = 1;
    pub const FEMALE: i64 = 2;

    /// Persisted integer code.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Unknown => Self::UNKNOWN,
            Self::Male => Self::MALE,
            Self::Female => Self::FEMALE,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            Self::UNKNOWN => Some(Self::Unknown),
            Self::MALE => Some(Self::Male),
            Self::FEMALE => Some(Self::Female),
            _ => None,
        }
    }

    /// Lowercase label used by the CLI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unknown" => Some(Self::Unknown),
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i64::deserialize(deserializer)?;
        Self::from_i64(code)
            .ok_or_else(|| D::Error::custom(format!("invalid gender code {code}")))
    }
}

/// Returns whether `value` is one of the three gender codes.
pub fn is_valid_gender(value: i64) -> bool {
    Gender::from_i64(value).is_some()
}

/// Fully materialized pet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Storage-assigned id; never reused.
    pub id: i64,
    pub name: String,
    /// Empty when the caller never supplied one.
    pub breed: String,
    pub gender: Gender,
    /// Unit-less, never negative.
    pub weight: i64,
}

impl Pet {
    /// Address of this row.
    pub fn uri(&self) -> ContentUri {
        item_uri(self.id)
    }

    /// Write payload carrying every column except `_id`.
    pub fn to_values(&self) -> PetValues {
        PetValues::new()
            .with_text(COLUMN_NAME, self.name.as_str())
            .with_text(COLUMN_BREED, self.breed.as_str())
            .with_int(COLUMN_GENDER, self.gender.as_i64())
            .with_int(COLUMN_WEIGHT, self.weight)
    }
}
