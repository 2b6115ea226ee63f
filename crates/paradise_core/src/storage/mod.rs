//! Key-value persistence adapter.
//!
//! # Responsibility
//! - Define the synchronous `get/set/remove` contract stores persist through.
//! - Derive the string keys under which each collection is stored.
//! - Encode/decode JSON values at the adapter boundary.
//!
//! # Invariants
//! - Values are opaque strings to adapters; only stores interpret JSON.
//! - `remove` of an absent key is not an error.
//! - Writes replace the whole value stored under a key.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Adapter-level failure while reading or writing persisted entries.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Persisted value under `key` is not valid for the expected shape.
    InvalidData { key: String, message: String },
    /// Value could not be encoded before writing under `key`.
    Encode { key: String, message: String },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted value for `{key}`: {message}")
            }
            Self::Encode { key, message } => {
                write!(f, "failed to encode value for `{key}`: {message}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData { .. } | Self::Encode { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Key layout for all persisted entries, optionally under a namespace prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageKeys {
    namespace: String,
}

impl StorageKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identity_list(&self) -> String {
        format!("{}identity_list", self.namespace)
    }

    pub fn current_session(&self) -> String {
        format!("{}current_session", self.namespace)
    }

    pub fn tasks(&self, username: &str) -> String {
        format!("{}tasks_{username}", self.namespace)
    }

    pub fn categories(&self, username: &str) -> String {
        format!("{}categories_{username}", self.namespace)
    }

    pub fn last_overdue_reminder(&self) -> String {
        format!("{}last_overdue_reminder", self.namespace)
    }
}

/// Reads and decodes a JSON value; `Ok(None)` when the key is absent.
pub fn read_json<T, S>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StorageError::InvalidData {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Encodes `value` as JSON and writes it under `key`.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|err| StorageError::Encode {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::{read_json, write_json, MemoryKeyValueStore, StorageError, StorageKeys};
    use super::KeyValueStore;

    #[test]
    fn keys_are_scoped_by_username_and_namespace() {
        let keys = StorageKeys::default();
        assert_eq!(keys.tasks("alice"), "tasks_alice");
        assert_eq!(keys.categories("alice"), "categories_alice");
        assert_eq!(keys.identity_list(), "identity_list");

        let prefixed = StorageKeys::new("procrastinator_");
        assert_eq!(prefixed.current_session(), "procrastinator_current_session");
        assert_eq!(prefixed.tasks("bob"), "procrastinator_tasks_bob");
    }

    #[test]
    fn read_json_reports_corrupt_values_with_key() {
        let store = MemoryKeyValueStore::new();
        store.set("tasks_alice", "{not json").unwrap();

        let err = read_json::<Vec<String>, _>(&store, "tasks_alice").unwrap_err();
        assert!(matches!(err, StorageError::InvalidData { ref key, .. } if key == "tasks_alice"));
    }

    #[test]
    fn json_helpers_roundtrip_and_absent_is_none() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(read_json::<Vec<u32>, _>(&store, "missing").unwrap(), None);

        write_json(&store, "numbers", &vec![1_u32, 2, 3]).unwrap();
        assert_eq!(
            read_json::<Vec<u32>, _>(&store, "numbers").unwrap(),
            Some(vec![1, 2, 3])
        );
    }
}
