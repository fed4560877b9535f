//! Record contract for the pets store.
//!
//! # Responsibility
//! - Name the table, its columns and the allowed value domains.
//! - Build the canonical collection and item addresses.
//! - Carry write payloads as column -> value maps.
//!
//! # Invariants
//! - Column names here are the only names the provider accepts.
//! - `_id` is assigned by storage and never written by callers.

pub mod pet;
pub mod uri;
pub mod values;
