use chrono::{DateTime, Utc};
use serde::Serialize;

use taskpad_core::{is_overdue, CalendarEvent, PeriodSummary, Task};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedTask<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub overdue: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView<'a> {
    pub summary: &'a PeriodSummary,
    pub events: &'a [CalendarEvent],
}

pub fn listed_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<ListedTask<'_>> {
    tasks
        .iter()
        .map(|task| ListedTask {
            task,
            overdue: is_overdue(task, now),
        })
        .collect()
}

pub fn format_task_list(tasks: &[Task], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for task in tasks {
        let check = if task.completed { "x" } else { " " };
        let priority = if task.priority.as_str().is_empty() {
            "-"
        } else {
            task.priority.as_str()
        };
        out.push_str(&format!("[{check}] {}  {}  ({priority})", task.id, task.title));
        if let Some(deadline) = task.deadline {
            out.push_str(&format!("  due {deadline}"));
        }
        if is_overdue(task, now) {
            out.push_str("  OVERDUE");
        }
        if !task.assignee.is_empty() {
            out.push_str(&format!("  @{}", task.assignee));
        }
        if !task.note.is_empty() {
            out.push_str("  [note]");
        }
        out.push('\n');
    }
    out
}

pub fn format_calendar(summary: &PeriodSummary, events: &[CalendarEvent]) -> String {
    let mut out = format!(
        "{} .. {}: {} task(s) due\n",
        summary.start, summary.end, summary.task_count
    );
    for event in events {
        out.push_str(&format!(
            "{}  {}  {}  {}\n",
            event.date, event.color, event.id, event.title
        ));
    }
    out
}
