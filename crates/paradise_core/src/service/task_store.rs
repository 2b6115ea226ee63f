//! Task/category store scoped to one identity.
//!
//! # Responsibility
//! - Own the task and category collections of the loaded identity.
//! - Persist the whole affected collection after every mutation.
//!
//! # Invariants
//! - Task ids and category ids are unique within the loaded scope.
//! - A category referenced by any task is never deleted.
//! - Mutations build the next collection, persist it, then swap it in, so a
//!   failed write leaves memory unchanged.
//! - Unknown ids are silent no-ops reported as `false`/`None`, not errors.
//! - Without a loaded scope, mutations stay in memory.

use crate::clock::{Clock, SystemClock};
use crate::model::category::{default_categories, Category, CategoryDraft, CategoryPatch};
use crate::model::task::{Task, TaskDraft, TaskPatch};
use crate::storage::{read_json, write_json, KeyValueStore, StorageError, StorageKeys};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

#[derive(Debug)]
pub enum TaskStoreError {
    /// Category still referenced by `task_count` tasks.
    CategoryInUse {
        category_id: String,
        task_count: usize,
    },
    Storage(StorageError),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryInUse {
                category_id,
                task_count,
            } => write!(
                f,
                "category {category_id} is used by {task_count} task(s)"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CategoryInUse { .. } => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for TaskStoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    keys: StorageKeys,
    clock: Box<dyn Clock>,
    scope: Option<String>,
    tasks: Vec<Task>,
    categories: Vec<Category>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Creates an unscoped store with default keys and the system clock.
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, StorageKeys::default(), SystemClock)
    }

    pub fn with_options(storage: S, keys: StorageKeys, clock: impl Clock + 'static) -> Self {
        Self {
            storage,
            keys,
            clock: Box::new(clock),
            scope: None,
            tasks: Vec::new(),
            categories: default_categories(),
        }
    }

    /// Username whose collections are loaded, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn get_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Replaces in-memory state with the collections stored for `username`.
    ///
    /// Seeds and persists the default categories when none are stored.
    pub fn load_for_identity(&mut self, username: &str) -> TaskStoreResult<()> {
        let tasks: Vec<Task> =
            read_json(&self.storage, &self.keys.tasks(username))?.unwrap_or_default();

        let categories_key = self.keys.categories(username);
        let seeded;
        let categories: Vec<Category> = match read_json(&self.storage, &categories_key)? {
            Some(stored) => {
                seeded = false;
                stored
            }
            None => {
                let defaults = default_categories();
                write_json(&self.storage, &categories_key, &defaults)?;
                seeded = true;
                defaults
            }
        };

        info!(
            "event=scope_load module=tasks status=ok username={} task_count={} category_count={} seeded_defaults={}",
            username,
            tasks.len(),
            categories.len(),
            seeded
        );
        self.scope = Some(username.to_string());
        self.tasks = tasks;
        self.categories = categories;
        Ok(())
    }

    /// Drops the loaded scope: no tasks, default categories, nothing written.
    pub fn reset(&mut self) {
        self.scope = None;
        self.tasks.clear();
        self.categories = default_categories();
    }

    /// Appends a task with a fresh id and both timestamps set to now.
    pub fn add_task(&mut self, draft: TaskDraft) -> TaskStoreResult<Task> {
        let task = draft.into_task(new_id(), self.clock.now());
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit_tasks(next)?;

        info!(
            "event=task_add module=tasks status=ok task_id={} category_id={}",
            task.id, task.category_id
        );
        Ok(task)
    }

    /// Merges `patch` into the task. Returns `false` when `id` is unknown.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> TaskStoreResult<bool> {
        let Some(index) = self.task_index(id) else {
            return Ok(false);
        };

        let now = self.clock.now();
        let mut next = self.tasks.clone();
        patch.apply_to(&mut next[index], now);
        self.commit_tasks(next)?;

        info!("event=task_update module=tasks status=ok task_id={id}");
        Ok(true)
    }

    /// Removes the task permanently. Returns `false` when `id` is unknown.
    pub fn delete_task(&mut self, id: &str) -> TaskStoreResult<bool> {
        let Some(index) = self.task_index(id) else {
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit_tasks(next)?;

        info!("event=task_delete module=tasks status=ok task_id={id}");
        Ok(true)
    }

    /// Flips completion and returns the new state, or `None` for unknown ids.
    pub fn toggle_completion(&mut self, id: &str) -> TaskStoreResult<Option<bool>> {
        let Some(index) = self.task_index(id) else {
            return Ok(None);
        };

        let now = self.clock.now();
        let mut next = self.tasks.clone();
        let task = &mut next[index];
        task.completed = !task.completed;
        task.updated_at = now;
        let completed = task.completed;
        self.commit_tasks(next)?;

        info!("event=task_toggle module=tasks status=ok task_id={id} completed={completed}");
        Ok(Some(completed))
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> TaskStoreResult<Category> {
        let category = draft.into_category(new_id());
        let mut next = self.categories.clone();
        next.push(category.clone());
        self.commit_categories(next)?;

        info!(
            "event=category_add module=tasks status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    /// Merges `patch` into the category. Returns `false` when `id` is unknown.
    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> TaskStoreResult<bool> {
        let Some(index) = self.categories.iter().position(|category| category.id == id) else {
            return Ok(false);
        };

        let mut next = self.categories.clone();
        patch.apply_to(&mut next[index]);
        self.commit_categories(next)?;

        info!("event=category_update module=tasks status=ok category_id={id}");
        Ok(true)
    }

    /// Removes an unreferenced category. Returns `false` when `id` is unknown.
    ///
    /// # Errors
    /// - `CategoryInUse` when any loaded task references `id`; nothing changes.
    pub fn delete_category(&mut self, id: &str) -> TaskStoreResult<bool> {
        let task_count = self
            .tasks
            .iter()
            .filter(|task| task.category_id == id)
            .count();
        if task_count > 0 {
            warn!(
                "event=category_delete module=tasks status=error error_code=category_in_use category_id={} task_count={}",
                id, task_count
            );
            return Err(TaskStoreError::CategoryInUse {
                category_id: id.to_string(),
                task_count,
            });
        }

        let Some(index) = self.categories.iter().position(|category| category.id == id) else {
            return Ok(false);
        };

        let mut next = self.categories.clone();
        next.remove(index);
        self.commit_categories(next)?;

        info!("event=category_delete module=tasks status=ok category_id={id}");
        Ok(true)
    }

    fn task_index(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn commit_tasks(&mut self, next: Vec<Task>) -> TaskStoreResult<()> {
        if let Some(username) = &self.scope {
            write_json(&self.storage, &self.keys.tasks(username), &next)?;
        }
        self.tasks = next;
        Ok(())
    }

    fn commit_categories(&mut self, next: Vec<Category>) -> TaskStoreResult<()> {
        if let Some(username) = &self.scope {
            write_json(&self.storage, &self.keys.categories(username), &next)?;
        }
        self.categories = next;
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
