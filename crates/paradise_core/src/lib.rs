//! Core domain logic for Procrastinator's Paradise.
//! This crate is the single source of truth for account, task and category
//! invariants; presentation layers only call into it.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::category::{
    default_categories, Category, CategoryDraft, CategoryIcon, CategoryId, CategoryPatch,
};
pub use model::identity::{Identity, Session};
pub use model::task::{Task, TaskDraft, TaskId, TaskPatch};
pub use model::validation::{validate_registration, ValidationError};
pub use service::app::{Paradise, ParadiseError, ParadiseResult};
pub use service::identity_store::{IdentityError, IdentityResult, IdentityStore};
pub use service::reminder::OverdueReminder;
pub use service::task_store::{TaskStore, TaskStoreError, TaskStoreResult};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageKeys,
    StorageResult,
};
pub use view::filter::{is_overdue, tab_counts, visible_tasks, TabCounts, TabSelector};

/// Minimal health-check API for host integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
