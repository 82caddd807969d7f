//! Filtered and sorted list projection.
//!
//! # Invariants
//! - Sorting is stable in both directions: equal keys keep input order.
//! - A missing deadline compares as later than every concrete date, in both
//!   directions. Ascending puts undated tasks last, descending puts them
//!   first.

use crate::model::task::Task;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Completion filter for the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    CreatedAt,
    Priority,
    Assignee,
    Deadline,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Priority => "priority",
            Self::Assignee => "assignee",
            Self::Deadline => "deadline",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" => Some(Self::CreatedAt),
            "priority" => Some(Self::Priority),
            "assignee" => Some(Self::Assignee),
            "deadline" => Some(Self::Deadline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort key plus direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortKey::CreatedAt, SortDirection::Desc)
    }
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Parses the compact `<key>-<asc|desc>` form, e.g. `deadline-asc`.
    pub fn parse(value: &str) -> Option<Self> {
        let (key, direction) = value.trim().split_once('-')?;
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return None,
        };
        Some(Self::new(SortKey::parse(key)?, direction))
    }

    /// Total order between two tasks for this key and direction, without the stability
    /// tiebreak (the caller's stable sort supplies it).
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = match self.key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Priority => a.priority.weight().cmp(&b.priority.weight()),
            SortKey::Assignee => compare_case_insensitive(&a.assignee, &b.assignee),
            SortKey::Deadline => compare_deadlines(a.deadline, b.deadline),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl Display for SortSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}-{direction}", self.key.as_str())
    }
}

/// Computes the presentation order: filter, then stable sort.
pub fn project(tasks: &[Task], filter: TaskFilter, sort: SortSpec) -> Vec<Task> {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect();
    // `sort_by` is stable, which keeps insertion order for equal keys.
    visible.sort_by(|a, b| sort.compare(a, b));
    visible
}

/// Whether an open task's deadline (taken as midnight UTC) has passed.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    if task.completed {
        return false;
    }
    task.deadline
        .is_some_and(|deadline| deadline.and_time(NaiveTime::MIN).and_utc() < now)
}

fn compare_deadlines(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
