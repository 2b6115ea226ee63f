//! Domain model for identities, categories and tasks.
//!
//! # Responsibility
//! - Define the records persisted as JSON collections.
//! - Provide editor-level validation rules for user input.
//!
//! # Invariants
//! - Serialized field names are camelCase and stable across releases.
//! - Ids are opaque strings; uniqueness within one scope is the only contract.

pub mod category;
pub mod identity;
pub mod task;
pub mod validation;
