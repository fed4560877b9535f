//! URI-addressed CRUD entry point.
//!
//! # Responsibility
//! - Route each call by address shape, validate write payloads, then issue
//!   exactly one repository statement.
//! - Report failures as `ProviderError` without retrying or substituting
//!   defaults.
//!
//! # Invariants
//! - Item addresses always scope reads and writes to their own id; any
//!   caller selection passed alongside is discarded.
//! - Nothing reaches storage before routing and validation succeed.
//! - Observers hear about successful writes only.

use crate::db::SchemaManager;
use crate::model::pet::{
    is_known_column, item_uri, ALL_COLUMNS, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE,
};
use crate::model::uri::ContentUri;
use crate::model::values::PetValues;
use crate::repo::pet_repo::{PetRepository, SqlitePetRepository, StorageError};
use crate::repo::query::{RowSet, Selection, SortOrder};
use crate::router::{classify, UriMatch};
use crate::validation::{
    validate_for_insert, validate_for_update, ValidationError, ValidationReason,
};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Per-call failure returned by `PetProvider`.
#[derive(Debug)]
pub enum ProviderError {
    /// Address matches no route, or the route does not support the operation.
    UnsupportedUri(String),
    Validation(ValidationError),
    Storage(StorageError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedUri(uri) => write!(f, "unsupported uri: {uri}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedUri(_) => None,
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ProviderError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for ProviderError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Receives the address of every successful write.
pub trait ChangeObserver {
    fn on_change(&self, uri: &ContentUri);
}

impl<F> ChangeObserver for F
where
    F: Fn(&ContentUri),
{
    fn on_change(&self, uri: &ContentUri) {
        self(uri)
    }
}

/// CRUD dispatcher over a pet repository.
pub struct PetProvider<R: PetRepository> {
    repo: R,
    observer: Option<Box<dyn ChangeObserver>>,
}

/// Provider wired to the SQLite store.
pub type SqlitePetProvider<'db> = PetProvider<SqlitePetRepository<'db>>;

impl<'db> PetProvider<SqlitePetRepository<'db>> {
    /// Builds a provider borrowing `store` for every call.
    pub fn from_store(store: &'db SchemaManager) -> Self {
        Self::new(SqlitePetRepository::new(store))
    }
}

impl<R: PetRepository> PetProvider<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            observer: None,
        }
    }

    /// Attaches an observer notified after each successful write.
    pub fn with_observer(mut self, observer: Box<dyn ChangeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Reads rows addressed by `uri`.
    ///
    /// An empty `projection` selects every column. For item addresses the
    /// selection is replaced by the address id.
    pub fn query(
        &self,
        uri: &ContentUri,
        projection: &[&str],
        selection: Option<&Selection>,
        sort_order: Option<&SortOrder>,
    ) -> ProviderResult<RowSet> {
        let scope = scoped_selection(uri, selection)?;
        let projection = if projection.is_empty() {
            ALL_COLUMNS
        } else {
            projection
        };
        for column in projection {
            ensure_known_column(column)?;
        }
        if let Some(order) = sort_order {
            ensure_known_column(&order.column)?;
        }

        let rows = self
            .repo
            .query_rows(projection, &scope, sort_order)
            .inspect_err(|err| log_storage_error("pet_query", err))?;
        debug!(
            "event=pet_query module=provider status=ok rows={}",
            rows.len()
        );
        Ok(rows)
    }

    /// Inserts one validated row and returns its item address.
    pub fn insert(&self, uri: &ContentUri, values: &PetValues) -> ProviderResult<ContentUri> {
        match classify(uri) {
            UriMatch::Collection => {}
            UriMatch::Item(_) | UriMatch::Unrecognized => {
                return Err(unsupported("pet_insert", uri));
            }
        }

        let payload =
            validate_for_insert(values).inspect_err(log_validation_error("pet_insert"))?;
        let id = self
            .repo
            .insert_row(&payload)
            .inspect_err(|err| log_storage_error("pet_insert", err))?;

        debug!("event=pet_insert module=provider status=ok id={id}");
        self.notify(uri);
        Ok(item_uri(id))
    }

    /// Applies a partial update and returns the number of rows changed.
    ///
    /// An empty payload is a no-op returning 0 without touching storage.
    pub fn update(
        &self,
        uri: &ContentUri,
        values: &PetValues,
        selection: Option<&Selection>,
    ) -> ProviderResult<usize> {
        let scope = scoped_selection(uri, selection)?;
        let payload =
            validate_for_update(values).inspect_err(log_validation_error("pet_update"))?;
        if payload.is_empty() {
            debug!("event=pet_update module=provider status=ok rows=0 noop=true");
            return Ok(0);
        }

        let changed = self
            .repo
            .update_rows(&payload, &scope)
            .inspect_err(|err| log_storage_error("pet_update", err))?;

        debug!(
            "event=pet_update module=provider status=ok rows={} columns={}",
            changed,
            payload.len()
        );
        if changed > 0 {
            self.notify(uri);
        }
        Ok(changed)
    }

    /// Deletes addressed rows and returns how many went away.
    ///
    /// Deleting a row that does not exist returns 0.
    pub fn delete(&self, uri: &ContentUri, selection: Option<&Selection>) -> ProviderResult<usize> {
        let scope = scoped_selection(uri, selection)?;
        let changed = self
            .repo
            .delete_rows(&scope)
            .inspect_err(|err| log_storage_error("pet_delete", err))?;

        debug!("event=pet_delete module=provider status=ok rows={changed}");
        if changed > 0 {
            self.notify(uri);
        }
        Ok(changed)
    }

    /// Type tag for the address shape.
    pub fn get_type(&self, uri: &ContentUri) -> ProviderResult<&'static str> {
        match classify(uri) {
            UriMatch::Collection => Ok(CONTENT_LIST_TYPE),
            UriMatch::Item(_) => Ok(CONTENT_ITEM_TYPE),
            UriMatch::Unrecognized => Err(unsupported("pet_get_type", uri)),
        }
    }

    fn notify(&self, uri: &ContentUri) {
        if let Some(observer) = self.observer.as_ref() {
            observer.on_change(uri);
        }
    }
}

fn scoped_selection(uri: &ContentUri, selection: Option<&Selection>) -> ProviderResult<Selection> {
    match classify(uri) {
        UriMatch::Collection => {
            let selection = selection.cloned().unwrap_or_default();
            for column in selection.columns() {
                ensure_known_column(column)?;
            }
            Ok(selection)
        }
        UriMatch::Item(id) => Ok(Selection::by_id(id)),
        UriMatch::Unrecognized => Err(unsupported("pet_route", uri)),
    }
}

fn ensure_known_column(column: &str) -> ProviderResult<()> {
    if is_known_column(column) {
        return Ok(());
    }
    Err(ValidationError::new(column, ValidationReason::UnknownField).into())
}

fn unsupported(event: &str, uri: &ContentUri) -> ProviderError {
    warn!("event={event} module=provider status=error error_code=unsupported_uri");
    ProviderError::UnsupportedUri(uri.to_string())
}

fn log_validation_error(event: &'static str) -> impl Fn(&ValidationError) {
    move |err: &ValidationError| {
        warn!(
            "event={} module=provider status=error error_code=validation_failed field={} reason={:?}",
            event, err.field, err.reason
        );
    }
}

fn log_storage_error(event: &str, err: &StorageError) {
    warn!("event={event} module=provider status=error error_code=storage_failed error={err}");
}
