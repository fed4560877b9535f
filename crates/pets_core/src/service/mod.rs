//! Core use-case services.
//!
//! # Responsibility
//! - Expose the URI-addressed CRUD entry point external callers use.
//! - Keep callers decoupled from routing, validation and storage details.

pub mod pet_provider;
