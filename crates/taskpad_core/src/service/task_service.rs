//! Task use-case service.
//!
//! # Responsibility
//! - Expose create/update/toggle/delete plus selection, filter and sort.
//! - Keep selection consistent with the collection after every mutation.
//! - Serve projections recomputed from the current snapshot.
//!
//! # Invariants
//! - Every mutation goes through `TaskRepository` and is durable before the
//!   call returns.
//! - Projections are never cached here; each read recomputes.
//! - Deleting the selected task clears selection; changing the filter always
//!   clears selection.
//! - After `reload` the selection never points at a missing task.

use crate::clock::SystemClock;
use crate::ids::UuidIdGenerator;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use crate::projection::calendar::{project_events, summarize_period, CalendarEvent, PeriodSummary};
use crate::projection::view::{project, SortSpec, TaskFilter};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::selection::{SelectionController, SelectionError, SelectionState};
use crate::service::note_editor::{self, NotePanel};
use crate::store::{SqliteTaskStore, TaskStore};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Required title missing.
    Validation(TaskValidationError),
    /// Operation referenced a task id that does not exist.
    TaskNotFound(TaskId),
    /// Store or data failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<SelectionError> for TaskServiceError {
    fn from(value: SelectionError) -> Self {
        match value {
            SelectionError::TaskNotFound(id) => Self::TaskNotFound(id),
        }
    }
}

/// Filter and sort chosen by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: TaskFilter,
    pub sort: SortSpec,
}

/// Orchestrator over the repository, selection and view state.
pub struct TaskService<S: TaskStore> {
    repo: TaskRepository<S>,
    selection: SelectionController,
    view: ViewState,
}

impl TaskService<SqliteTaskStore> {
    /// Opens a SQLite-backed service with wall-clock time and UUID ids.
    pub fn open_sqlite(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let store = SqliteTaskStore::open(path).map_err(RepoError::from)?;
        let repo = TaskRepository::open(
            store,
            Box::new(SystemClock),
            Box::new(UuidIdGenerator),
        )?;
        Ok(Self::new(repo))
    }
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(repo: TaskRepository<S>) -> Self {
        Self::with_view(repo, ViewState::default())
    }

    pub fn with_view(repo: TaskRepository<S>, view: ViewState) -> Self {
        Self {
            repo,
            selection: SelectionController::new(),
            view,
        }
    }

    pub fn repository(&self) -> &TaskRepository<S> {
        &self.repo
    }

    /// Re-reads the store, e.g. after another writer changed it, and drops
    /// a selection whose task is gone.
    pub fn reload(&mut self) -> ServiceResult<usize> {
        let count = self.repo.reload()?;
        self.selection.reconcile(self.repo.list());
        Ok(count)
    }

    pub fn create_task(&mut self, input: NewTask) -> ServiceResult<TaskId> {
        Ok(self.repo.create(input)?)
    }

    pub fn update_task(&mut self, id: &TaskId, patch: &TaskPatch) -> ServiceResult<()> {
        Ok(self.repo.update(id, patch)?)
    }

    /// Returns the new `completed` state.
    pub fn toggle_task(&mut self, id: &TaskId) -> ServiceResult<bool> {
        Ok(self.repo.toggle_completed(id)?)
    }

    /// Idempotent. Returns `false` when the id was already absent.
    pub fn delete_task(&mut self, id: &TaskId) -> ServiceResult<bool> {
        let removed = self.repo.delete(id)?;
        self.selection.on_task_deleted(id);
        Ok(removed)
    }

    pub fn select_task(&mut self, id: &TaskId) -> ServiceResult<()> {
        Ok(self.selection.select(self.repo.list(), id)?)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.view.filter = filter;
        self.selection.on_filter_changed();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.view.sort = sort;
    }

    /// Full collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        self.repo.list()
    }

    pub fn visible_tasks(&self) -> Vec<Task> {
        project(self.repo.list(), self.view.filter, self.view.sort)
    }

    pub fn calendar_events(&self) -> Vec<CalendarEvent> {
        project_events(self.repo.list())
    }

    /// Deadline count over `[start, end)`.
    pub fn period_summary(&self, start: NaiveDate, end: NaiveDate) -> PeriodSummary {
        summarize_period(self.repo.list(), start, end)
    }

    pub fn note_panel(&self) -> NotePanel {
        note_editor::current_note(&self.selection, self.repo.list())
    }

    /// Writes the note of the selected task. No-op without a selection.
    pub fn edit_note(&mut self, text: &str) -> ServiceResult<bool> {
        Ok(note_editor::on_edit(&self.selection, &mut self.repo, text)?)
    }
}
