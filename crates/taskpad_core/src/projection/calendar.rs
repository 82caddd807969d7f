//! Calendar projection and period summary.
//!
//! # Invariants
//! - Only tasks with a deadline produce an event; one event per such task.
//! - Event color depends on priority alone (fixed palette).
//! - Re-projection is a full recompute; callers replace all events at once.

use crate::model::task::{Priority, Task, TaskId};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const HIGH_PRIORITY_COLOR: &str = "#f44336";
pub const MEDIUM_PRIORITY_COLOR: &str = "#ff9800";
pub const LOW_PRIORITY_COLOR: &str = "#4caf50";
pub const DEFAULT_EVENT_COLOR: &str = "#26a69a";

/// One all-day calendar entry derived from a task deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Same as the source task id.
    pub id: TaskId,
    pub title: String,
    pub date: NaiveDate,
    pub color: &'static str,
    pub all_day: bool,
}

/// Deadline count over a half-open date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub task_count: usize,
}

pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => HIGH_PRIORITY_COLOR,
        Priority::Medium => MEDIUM_PRIORITY_COLOR,
        Priority::Low => LOW_PRIORITY_COLOR,
        Priority::Unspecified => DEFAULT_EVENT_COLOR,
    }
}

/// Projects every dated task to an event, in collection order.
pub fn project_events(tasks: &[Task]) -> Vec<CalendarEvent> {
    tasks
        .iter()
        .filter_map(|task| {
            task.deadline.map(|date| CalendarEvent {
                id: task.id.clone(),
                title: task.title.clone(),
                date,
                color: priority_color(task.priority),
                all_day: true,
            })
        })
        .collect()
}

/// Counts tasks whose deadline falls in `[start, end)`.
pub fn count_in_range(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> usize {
    tasks
        .iter()
        .filter_map(|task| task.deadline)
        .filter(|deadline| *deadline >= start && *deadline < end)
        .count()
}

pub fn summarize_period(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> PeriodSummary {
    PeriodSummary {
        start,
        end,
        task_count: count_in_range(tasks, start, end),
    }
}

/// `[first day of month, first day of next month)`. `None` for an invalid
/// month or a year outside chrono's range.
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// Month range containing `date`.
pub fn month_containing(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    month_range(date.year(), date.month())
}
