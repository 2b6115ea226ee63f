//! Application facade wiring identity changes to task scopes.
//!
//! # Responsibility
//! - Run editor validation before input reaches the stores.
//! - Reload the task scope on every session change and reset it on logout.
//! - Expose the derived task views for the signed-in identity.
//!
//! # Invariants
//! - The loaded task scope always belongs to the current session, if any.
//! - Task and category mutations require a session.

use crate::clock::{Clock, SystemClock};
use crate::model::category::{Category, CategoryDraft, CategoryPatch};
use crate::model::identity::Session;
use crate::model::task::{Task, TaskDraft, TaskPatch};
use crate::model::validation::{validate_registration, ValidationError};
use crate::service::identity_store::{IdentityError, IdentityStore};
use crate::service::reminder::OverdueReminder;
use crate::service::task_store::{TaskStore, TaskStoreError};
use crate::storage::{KeyValueStore, StorageError, StorageKeys};
use crate::view::filter::{self, TabCounts, TabSelector};
use chrono::{DateTime, Local, TimeZone};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ParadiseResult<T> = Result<T, ParadiseError>;

/// Facade error surfaced to presentation callers.
#[derive(Debug)]
pub enum ParadiseError {
    Validation(ValidationError),
    /// Task/category operation attempted while signed out.
    NotAuthenticated,
    Identity(IdentityError),
    Tasks(TaskStoreError),
    Storage(StorageError),
}

impl Display for ParadiseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotAuthenticated => write!(f, "no signed-in identity"),
            Self::Identity(err) => write!(f, "{err}"),
            Self::Tasks(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParadiseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotAuthenticated => None,
            Self::Identity(err) => Some(err),
            Self::Tasks(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ParadiseError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<IdentityError> for ParadiseError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<TaskStoreError> for ParadiseError {
    fn from(value: TaskStoreError) -> Self {
        Self::Tasks(value)
    }
}

impl From<StorageError> for ParadiseError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Signed-in to-do workspace over one shared key-value store.
pub struct Paradise<S: KeyValueStore + Clone> {
    identity: IdentityStore<S>,
    tasks: TaskStore<S>,
    reminder: OverdueReminder<S>,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore + Clone> Paradise<S> {
    /// Opens the workspace, restoring any persisted session and its scope.
    pub fn open(storage: S, keys: StorageKeys) -> ParadiseResult<Self> {
        Self::open_with_clock(storage, keys, SystemClock)
    }

    pub fn open_with_clock<C: Clock + Clone + 'static>(
        storage: S,
        keys: StorageKeys,
        clock: C,
    ) -> ParadiseResult<Self> {
        let mut app = Self {
            identity: IdentityStore::with_options(storage.clone(), keys.clone(), clock.clone()),
            tasks: TaskStore::with_options(storage.clone(), keys.clone(), clock.clone()),
            reminder: OverdueReminder::new(storage, keys),
            clock: Box::new(clock),
        };

        if let Some(session) = app.identity.restore_session()? {
            app.enter_scope(&session.username)?;
        }
        Ok(app)
    }

    pub fn session(&self) -> Option<&Session> {
        self.identity.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    /// Validates sign-up input, registers, and loads the new scope.
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> ParadiseResult<Session> {
        validate_registration(username, password, display_name)?;
        let session = self.identity.register(username, password, display_name)?;
        self.enter_scope(&session.username)?;
        Ok(session)
    }

    pub fn login(&mut self, username: &str, password: &str) -> ParadiseResult<Session> {
        let session = self.identity.login(username, password)?;
        self.enter_scope(&session.username)?;
        Ok(session)
    }

    pub fn logout(&mut self) -> ParadiseResult<()> {
        self.identity.logout()?;
        self.tasks.reset();
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn categories(&self) -> &[Category] {
        self.tasks.categories()
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.get_task(id)
    }

    pub fn get_category(&self, id: &str) -> Option<&Category> {
        self.tasks.get_category(id)
    }

    /// Adds a validated task; an empty category falls back to the first one.
    pub fn add_task(&mut self, mut draft: TaskDraft) -> ParadiseResult<Task> {
        self.require_session()?;
        draft.validate()?;
        if draft.category_id.is_empty() {
            if let Some(first) = self.tasks.categories().first() {
                draft.category_id = first.id.clone();
            }
        }
        Ok(self.tasks.add_task(draft)?)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> ParadiseResult<bool> {
        self.require_session()?;
        patch.validate()?;
        Ok(self.tasks.update_task(id, patch)?)
    }

    pub fn delete_task(&mut self, id: &str) -> ParadiseResult<bool> {
        self.require_session()?;
        Ok(self.tasks.delete_task(id)?)
    }

    pub fn toggle_completion(&mut self, id: &str) -> ParadiseResult<Option<bool>> {
        self.require_session()?;
        Ok(self.tasks.toggle_completion(id)?)
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> ParadiseResult<Category> {
        self.require_session()?;
        draft.validate()?;
        Ok(self.tasks.add_category(draft)?)
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> ParadiseResult<bool> {
        self.require_session()?;
        patch.validate()?;
        Ok(self.tasks.update_category(id, patch)?)
    }

    pub fn delete_category(&mut self, id: &str) -> ParadiseResult<bool> {
        self.require_session()?;
        Ok(self.tasks.delete_category(id)?)
    }

    /// Visible tasks evaluated against the local calendar.
    pub fn visible_tasks(&self, query: &str, tab: TabSelector) -> Vec<&Task> {
        let now = self.clock.now().with_timezone(&Local);
        self.visible_tasks_at(query, tab, &now)
    }

    pub fn visible_tasks_at<Tz: TimeZone>(
        &self,
        query: &str,
        tab: TabSelector,
        now: &DateTime<Tz>,
    ) -> Vec<&Task> {
        filter::visible_tasks(self.tasks.tasks(), query, tab, now)
    }

    pub fn tab_counts(&self, query: &str) -> TabCounts {
        let now = self.clock.now().with_timezone(&Local);
        filter::tab_counts(self.tasks.tasks(), query, &now)
    }

    /// First overdue task when an hourly reminder is due.
    pub fn check_overdue(&self) -> ParadiseResult<Option<&Task>> {
        Ok(self.reminder.check(self.tasks.tasks(), self.clock.now())?)
    }

    /// Loads `username`'s scope, signing out entirely if it cannot be read.
    fn enter_scope(&mut self, username: &str) -> ParadiseResult<()> {
        let Err(err) = self.tasks.load_for_identity(username) else {
            return Ok(());
        };
        warn!(
            "event=scope_load module=app status=error username={} error={}",
            username, err
        );
        self.tasks.reset();
        if let Err(logout_err) = self.identity.logout() {
            warn!(
                "event=auth_logout module=app status=error username={} error={}",
                username, logout_err
            );
        }
        Err(err.into())
    }

    fn require_session(&self) -> ParadiseResult<()> {
        if self.identity.is_authenticated() {
            Ok(())
        } else {
            Err(ParadiseError::NotAuthenticated)
        }
    }
}
