//! Throttled overdue-task nudges.
//!
//! # Invariants
//! - Fires again only once more than [`OVERDUE_REMINDER_INTERVAL_MINUTES`]
//!   have passed since it last fired.
//! - A missing or unreadable last-fired timestamp counts as "never fired".
//! - Writes only when it fires.

use crate::model::task::Task;
use crate::storage::{write_json, KeyValueStore, StorageKeys, StorageResult};
use crate::view::filter::is_overdue;
use chrono::{DateTime, Duration, Utc};
use log::info;

pub const OVERDUE_REMINDER_INTERVAL_MINUTES: i64 = 60;

pub struct OverdueReminder<S: KeyValueStore> {
    storage: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> OverdueReminder<S> {
    pub fn new(storage: S, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    /// Returns the first overdue task when a reminder is due and records it.
    pub fn check<'a>(
        &self,
        tasks: &'a [Task],
        now: DateTime<Utc>,
    ) -> StorageResult<Option<&'a Task>> {
        let Some(overdue) = tasks.iter().find(|task| is_overdue(task, now)) else {
            return Ok(None);
        };

        if let Some(last_fired) = self.last_fired()? {
            if now - last_fired <= Duration::minutes(OVERDUE_REMINDER_INTERVAL_MINUTES) {
                return Ok(None);
            }
        }

        write_json(&self.storage, &self.keys.last_overdue_reminder(), &now)?;
        info!(
            "event=overdue_reminder module=reminder status=ok task_id={}",
            overdue.id
        );
        Ok(Some(overdue))
    }

    fn last_fired(&self) -> StorageResult<Option<DateTime<Utc>>> {
        let raw = self.storage.get(&self.keys.last_overdue_reminder())?;
        Ok(raw.and_then(|value| serde_json::from_str(&value).ok()))
    }
}
