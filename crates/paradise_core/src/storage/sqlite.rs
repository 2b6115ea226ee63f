//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist adapter entries in the `kv_entries` table.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - The connection must come from `db::open_db*` so migrations are applied.
//! - `set` is an upsert; `updated_at` tracks the last write in epoch millis.

use super::{KeyValueStore, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value adapter over a borrowed, migrated connection.
#[derive(Clone, Copy)]
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
