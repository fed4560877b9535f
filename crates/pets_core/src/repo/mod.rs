//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the provider dispatches to.
//! - Isolate SQLite statement building from routing and validation.
//!
//! # Invariants
//! - Repository writes only accept `ValidatedPayload`.
//! - Storage failures surface as `StorageError`, never as defaults.

pub mod pet_repo;
pub mod query;
