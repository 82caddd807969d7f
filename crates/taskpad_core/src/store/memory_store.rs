//! In-process task store.
//!
//! Holds the encoded blob rather than live records so every load goes
//! through the same codec as the SQLite store.
//!
//! Clones share one backing blob. A caller can keep a handle after moving
//! the store into a repository, to inject write failures or to act as a
//! second writer.

use super::{decode_or_empty, encode_tasks, StoreError, StoreResult, TaskStore};
use crate::model::task::Task;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryState {
    blob: Option<String>,
    fail_writes: bool,
    save_count: usize,
}

/// Volatile store with switchable write failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a pre-existing raw blob.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let store = Self::default();
        store.state.borrow_mut().blob = Some(blob.into());
        store
    }

    /// Makes every following `save_all` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    pub fn blob(&self) -> Option<String> {
        self.state.borrow().blob.clone()
    }

    /// Number of successful writes across all clones.
    pub fn save_count(&self) -> usize {
        self.state.borrow().save_count
    }
}

impl TaskStore for MemoryTaskStore {
    fn load_all(&self) -> StoreResult<Vec<Task>> {
        let state = self.state.borrow();
        Ok(decode_or_empty(state.blob.as_deref(), "memory"))
    }

    fn save_all(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(StoreError::Unavailable(
                "memory store write failure is enabled".to_string(),
            ));
        }
        state.blob = Some(encode_tasks(tasks)?);
        state.save_count += 1;
        Ok(())
    }
}
