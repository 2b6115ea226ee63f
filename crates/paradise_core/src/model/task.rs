//! Task model.
//!
//! # Invariants
//! - `id` is unique within one identity's task collection.
//! - `updated_at` is refreshed on every mutation, including completion toggles.
//! - `category_id` should name a category in the same scope; stores do not
//!   enforce it on write.

use super::category::CategoryId;
use super::validation::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: CategoryId,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl TaskDraft {
    /// Incomplete, undated draft with an empty description.
    pub fn new(title: impl Into<String>, category_id: impl Into<CategoryId>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category_id: category_id.into(),
            due_date: None,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTaskTitle);
        }
        Ok(())
    }

    pub(crate) fn into_task(self, id: TaskId, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            due_date: self.due_date,
            completed: self.completed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` fields are left untouched.
///
/// `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) if title.trim().is_empty() => Err(ValidationError::BlankTaskTitle),
            _ => Ok(()),
        }
    }

    pub(crate) fn apply_to(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskDraft, TaskPatch};
    use crate::model::validation::ValidationError;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn blank_titles_are_rejected() {
        assert_eq!(
            TaskDraft::new("   ", "1").validate(),
            Err(ValidationError::BlankTaskTitle)
        );
        let patch = TaskPatch {
            title: Some("\t".to_string()),
            ..TaskPatch::default()
        };
        assert_eq!(patch.validate(), Err(ValidationError::BlankTaskTitle));
        assert_eq!(TaskPatch::default().validate(), Ok(()));
    }

    #[test]
    fn patch_merges_fields_and_can_clear_due_date() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut task = TaskDraft::new("Buy milk", "1")
            .with_due_date(created + Duration::days(1))
            .into_task("t1".to_string(), created);

        let later = created + Duration::hours(2);
        TaskPatch {
            description: Some("2 litres".to_string()),
            due_date: Some(None),
            ..TaskPatch::default()
        }
        .apply_to(&mut task, later);

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2 litres");
        assert_eq!(task.due_date, None);
        assert_eq!(task.created_at, created);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn serialized_shape_uses_camel_case_and_null_due_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let task: Task = TaskDraft::new("Nap", "2").into_task("t1".to_string(), now);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["categoryId"], "2");
        assert!(json["dueDate"].is_null());
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
    }
}
