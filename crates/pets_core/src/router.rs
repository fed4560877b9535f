//! Address classification.
//!
//! # Responsibility
//! - Map any `ContentUri` onto the closed set of shapes the provider serves.
//!
//! # Invariants
//! - Classification is pure, deterministic and total.
//! - The item shape only applies when a numeric segment follows the
//!   collection path; otherwise the collection shape is tried.

use crate::model::pet::{CONTENT_AUTHORITY, CONTENT_SCHEME, PATH_PETS};
use crate::model::uri::{parse_id, ContentUri};

/// Shape of an address as seen by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriMatch {
    /// The whole pets collection.
    Collection,
    /// One pet by id.
    Item(i64),
    Unrecognized,
}

/// Matcher registered for one authority and one collection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetUriMatcher {
    authority: String,
    collection_path: String,
}

impl Default for PetUriMatcher {
    fn default() -> Self {
        Self::new(CONTENT_AUTHORITY, PATH_PETS)
    }
}

impl PetUriMatcher {
    pub fn new(authority: impl Into<String>, collection_path: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            collection_path: collection_path.into(),
        }
    }

    pub fn classify(&self, uri: &ContentUri) -> UriMatch {
        if uri.scheme() != CONTENT_SCHEME || uri.authority() != self.authority {
            return UriMatch::Unrecognized;
        }

        match uri.path_segments() {
            [collection] if *collection == self.collection_path => UriMatch::Collection,
            [collection, id] if *collection == self.collection_path => {
                parse_id(id).map_or(UriMatch::Unrecognized, UriMatch::Item)
            }
            _ => UriMatch::Unrecognized,
        }
    }
}

/// Classifies `uri` against the pets authority and collection path.
pub fn classify(uri: &ContentUri) -> UriMatch {
    PetUriMatcher::default().classify(uri)
}
