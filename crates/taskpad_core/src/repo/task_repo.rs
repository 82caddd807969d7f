//! Canonical task collection with write-through persistence.
//!
//! # Responsibility
//! - Own the ordered task collection and every mutation of it.
//! - Persist the full collection after each successful mutation.
//!
//! # Invariants
//! - A mutation is staged on a copy and committed to memory only after
//!   `TaskStore::save_all` succeeds.
//! - Ids are unique across the collection.
//! - `modified_at` is bumped on every mutation and never moves backwards.
//! - Deleting an absent id is a successful no-op.

use crate::clock::Clock;
use crate::ids::IdGenerator;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use crate::store::{StoreError, TaskStore};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task mutations and loading.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    NotFound(TaskId),
    Store(StoreError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Owner of the canonical task collection.
pub struct TaskRepository<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl<S: TaskStore> TaskRepository<S> {
    /// Loads the stored collection and takes ownership of the store.
    ///
    /// Stored records with a blank title or a repeated id are dropped with a
    /// warning; the first occurrence of an id wins.
    pub fn open(
        store: S,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> RepoResult<Self> {
        let loaded = store.load_all()?;
        let tasks = sanitize_loaded(loaded);
        info!(
            "event=repo_open module=repo status=ok task_count={}",
            tasks.len()
        );
        Ok(Self {
            store,
            tasks,
            clock,
            ids,
        })
    }

    /// Read-only snapshot of the collection in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the in-memory collection with what the store holds now.
    /// Returns the number of tasks kept. On a storage error the current
    /// collection stays in place.
    pub fn reload(&mut self) -> RepoResult<usize> {
        let loaded = self.store.load_all()?;
        self.tasks = sanitize_loaded(loaded);
        info!(
            "event=repo_reload module=repo status=ok task_count={}",
            self.tasks.len()
        );
        Ok(self.tasks.len())
    }

    /// Validates input, appends a new task and persists.
    pub fn create(&mut self, input: NewTask) -> RepoResult<TaskId> {
        input.validate()?;

        let id = self.ids.next_id();
        if self.contains(&id) {
            return Err(RepoError::InvalidData(format!(
                "id generator produced duplicate task id `{id}`"
            )));
        }

        let task = Task::create(id.clone(), input, self.clock.now())?;
        let mut staged = self.tasks.clone();
        staged.push(task);
        self.commit(staged, "task_create")?;

        info!(
            "event=task_create module=repo status=ok task_id={} task_count={}",
            id,
            self.tasks.len()
        );
        Ok(id)
    }

    /// Applies a partial edit and persists.
    pub fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> RepoResult<()> {
        self.mutate(id, "task_update", |task| Ok(task.apply_patch(patch)?))
    }

    /// Flips `completed` and persists. Returns the new state.
    pub fn toggle_completed(&mut self, id: &TaskId) -> RepoResult<bool> {
        self.mutate(id, "task_toggle", |task| {
            task.completed = !task.completed;
            Ok(task.completed)
        })
    }

    /// Overwrites the free-text note and persists.
    pub fn set_note(&mut self, id: &TaskId, text: &str) -> RepoResult<()> {
        self.mutate(id, "task_note", |task| {
            task.note = text.to_string();
            Ok(())
        })
    }

    /// Removes a task. Returns `false` when the id was already absent.
    pub fn delete(&mut self, id: &TaskId) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=task_delete module=repo status=noop task_id={id}");
            return Ok(false);
        };

        let mut staged = self.tasks.clone();
        staged.remove(index);
        self.commit(staged, "task_delete")?;

        info!(
            "event=task_delete module=repo status=ok task_id={} task_count={}",
            id,
            self.tasks.len()
        );
        Ok(true)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn mutate<T>(
        &mut self,
        id: &TaskId,
        event: &'static str,
        apply: impl FnOnce(&mut Task) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let index = self
            .position(id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;
        let now = self.clock.now();

        let mut staged = self.tasks.clone();
        let task = &mut staged[index];
        let output = apply(task)?;
        task.touch(now);
        self.commit(staged, event)?;

        debug!("event={event} module=repo status=ok task_id={id}");
        Ok(output)
    }

    fn commit(&mut self, staged: Vec<Task>, event: &'static str) -> RepoResult<()> {
        if let Err(err) = self.store.save_all(&staged) {
            error!(
                "event={event} module=repo status=error error_code=store_write_failed error={err}"
            );
            return Err(err.into());
        }
        self.tasks = staged;
        Ok(())
    }
}

fn sanitize_loaded(loaded: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(loaded.len());
    for task in loaded {
        if task.validate().is_err() {
            warn!(
                "event=repo_open module=repo status=skip reason=invalid_title task_id={}",
                task.id
            );
            continue;
        }
        if !seen.insert(task.id.clone()) {
            warn!(
                "event=repo_open module=repo status=skip reason=duplicate_id task_id={}",
                task.id
            );
            continue;
        }
        tasks.push(task);
    }
    tasks
}
