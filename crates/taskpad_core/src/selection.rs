//! Current-task selection.
//!
//! # Responsibility
//! - Hold the "currently selected task" as a weak reference by id.
//!
//! # Invariants
//! - Selection never keeps a task alive; deleting the selected task clears it.
//! - A filter change always clears selection. Sort changes, and the selected
//!   task being filtered out of view, never do.
//! - A failed `select` leaves the previous state untouched.

use crate::model::task::{Task, TaskId};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Empty,
    Selected(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    TaskNotFound(TaskId),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "cannot select missing task: {id}"),
        }
    }
}

impl Error for SelectionError {}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&TaskId> {
        match &self.state {
            SelectionState::Selected(id) => Some(id),
            SelectionState::Empty => None,
        }
    }

    pub fn is_selected(&self, id: &TaskId) -> bool {
        self.selected_id() == Some(id)
    }

    /// Selects `id` if it exists in `tasks`.
    pub fn select(&mut self, tasks: &[Task], id: &TaskId) -> Result<(), SelectionError> {
        if !tasks.iter().any(|task| &task.id == id) {
            return Err(SelectionError::TaskNotFound(id.clone()));
        }
        self.transition(SelectionState::Selected(id.clone()), "select");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.transition(SelectionState::Empty, "clear");
    }

    pub fn on_task_deleted(&mut self, id: &TaskId) {
        if self.is_selected(id) {
            self.transition(SelectionState::Empty, "task_deleted");
        }
    }

    pub fn on_filter_changed(&mut self) {
        self.transition(SelectionState::Empty, "filter_changed");
    }

    /// Clears a selection whose task is no longer in `tasks`.
    pub fn reconcile(&mut self, tasks: &[Task]) {
        let dangling = self
            .selected_id()
            .is_some_and(|id| !tasks.iter().any(|task| &task.id == id));
        if dangling {
            self.transition(SelectionState::Empty, "dangling");
        }
    }

    fn transition(&mut self, next: SelectionState, reason: &str) {
        if self.state != next {
            debug!(
                "event=selection_change module=selection status=ok reason={reason} selected={}",
                matches!(next, SelectionState::Selected(_))
            );
        }
        self.state = next;
    }
}
