//! Quick-note panel bound to the current selection.
//!
//! # Invariants
//! - Every edit is written through to the repository immediately; there is
//!   no debounce or batching.
//! - With nothing selected the panel is disabled and edits are ignored.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoResult, TaskRepository};
use crate::selection::SelectionController;
use crate::store::TaskStore;

/// Read model for the note panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePanel {
    pub task_id: Option<TaskId>,
    /// Title of the task the note belongs to, for the panel header.
    pub task_title: Option<String>,
    pub text: String,
    pub enabled: bool,
}

impl NotePanel {
    fn disabled() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Builds the panel for the current selection.
pub fn current_note(selection: &SelectionController, tasks: &[Task]) -> NotePanel {
    let Some(id) = selection.selected_id() else {
        return NotePanel::disabled();
    };
    match tasks.iter().find(|task| &task.id == id) {
        Some(task) => NotePanel {
            task_id: Some(task.id.clone()),
            task_title: Some(task.title.clone()),
            text: task.note.clone(),
            enabled: true,
        },
        None => NotePanel::disabled(),
    }
}

/// Handles one edit event. Returns whether anything was written.
pub fn on_edit<S: TaskStore>(
    selection: &SelectionController,
    repo: &mut TaskRepository<S>,
    text: &str,
) -> RepoResult<bool> {
    let Some(id) = selection.selected_id() else {
        return Ok(false);
    };
    repo.set_note(id, text)?;
    Ok(true)
}
