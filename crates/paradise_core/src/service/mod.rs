//! Core use-case services.
//!
//! # Responsibility
//! - Own mutable session and task scope state behind explicit store objects.
//! - Persist through an injected [`KeyValueStore`](crate::storage::KeyValueStore).
//! - Keep presentation layers decoupled from storage details.

pub mod app;
pub mod identity_store;
pub mod reminder;
pub mod task_store;
