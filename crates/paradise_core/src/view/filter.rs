//! Search, tab filtering and display ordering for task lists.
//!
//! # Invariants
//! - Output order: incomplete before completed, then dated tasks by
//!   ascending due date, then undated tasks in their original order.
//! - Calendar-day comparisons use the time zone of the supplied `now`.

use crate::model::task::Task;
use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Tab a task list is viewed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TabSelector {
    #[default]
    All,
    /// Due on the current calendar day.
    Today,
    /// Due after now and not today.
    Upcoming,
    Completed,
}

impl TabSelector {
    pub const ALL: [TabSelector; 4] = [Self::All, Self::Today, Self::Upcoming, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
        }
    }

    /// Whether `task` belongs to this tab at instant `now`.
    pub fn matches<Tz: TimeZone>(self, task: &Task, now: &DateTime<Tz>) -> bool {
        match self {
            Self::All => true,
            Self::Today => task.due_date.is_some_and(|due| is_same_day(due, now)),
            Self::Upcoming => task.due_date.is_some_and(|due| {
                due > now.with_timezone(&Utc) && !is_same_day(due, now)
            }),
            Self::Completed => task.completed,
        }
    }
}

impl Display for TabSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabSelector {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "upcoming" => Ok(Self::Upcoming),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unknown tab `{other}`; expected all|today|upcoming|completed"
            )),
        }
    }
}

/// Task counts per tab for one search query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabCounts {
    pub all: usize,
    pub today: usize,
    pub upcoming: usize,
    pub completed: usize,
}

impl TabCounts {
    pub fn get(&self, tab: TabSelector) -> usize {
        match tab {
            TabSelector::All => self.all,
            TabSelector::Today => self.today,
            TabSelector::Upcoming => self.upcoming,
            TabSelector::Completed => self.completed,
        }
    }
}

/// Applies search, tab filter and display ordering.
///
/// A blank `query` matches every task; otherwise the trimmed query is
/// matched case-insensitively against title and description.
pub fn visible_tasks<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    query: &str,
    tab: TabSelector,
    now: &DateTime<Tz>,
) -> Vec<&'a Task> {
    let needle = normalize_query(query);
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| matches_query(task, needle.as_deref()))
        .filter(|task| tab.matches(task, now))
        .collect();
    // `sort_by` is stable, which keeps undated tasks in insertion order.
    visible.sort_by(|left, right| display_order(left, right));
    visible
}

/// Counts the search matches falling into each tab.
pub fn tab_counts<Tz: TimeZone>(tasks: &[Task], query: &str, now: &DateTime<Tz>) -> TabCounts {
    let needle = normalize_query(query);
    let mut counts = TabCounts::default();
    for task in tasks
        .iter()
        .filter(|task| matches_query(task, needle.as_deref()))
    {
        counts.all += 1;
        counts.today += usize::from(TabSelector::Today.matches(task, now));
        counts.upcoming += usize::from(TabSelector::Upcoming.matches(task, now));
        counts.completed += usize::from(task.completed);
    }
    counts
}

/// Incomplete and due strictly before `now`.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < now)
}

fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn matches_query(task: &Task, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

fn is_same_day<Tz: TimeZone>(due: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    due.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

fn display_order(left: &Task, right: &Task) -> Ordering {
    left.completed
        .cmp(&right.completed)
        .then_with(|| match (left.due_date, right.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
