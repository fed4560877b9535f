//! Core data-access layer for the pets store.
//! This crate is the single source of truth for pet record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod router;
pub mod service;
pub mod validation;

pub use db::{DbError, DbResult, SchemaManager};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pet::{collection_uri, is_valid_gender, item_uri, Gender, Pet};
pub use model::uri::ContentUri;
pub use model::values::PetValues;
pub use repo::pet_repo::{PetRepository, SqlitePetRepository, StorageError, StorageResult};
pub use repo::query::{RowSet, Selection, SortOrder};
pub use router::{classify, PetUriMatcher, UriMatch};
pub use service::pet_provider::{
    ChangeObserver, PetProvider, ProviderError, ProviderResult, SqlitePetProvider,
};
pub use validation::{
    validate_for_insert, validate_for_update, ValidatedPayload, ValidationError,
    ValidationReason,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
