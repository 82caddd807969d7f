//! Core domain logic for Taskpad.
//! This crate is the single source of truth for task invariants and for the
//! list, note and calendar views derived from the task collection.

pub mod clock;
pub mod config;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod selection;
pub mod service;
pub mod store;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskValidationError};
pub use projection::calendar::{
    count_in_range, month_range, project_events, CalendarEvent, PeriodSummary,
};
pub use projection::view::{is_overdue, project, SortDirection, SortKey, SortSpec, TaskFilter};
pub use repo::task_repo::{RepoError, RepoResult, TaskRepository};
pub use selection::{SelectionController, SelectionError, SelectionState};
pub use service::note_editor::NotePanel;
pub use service::task_service::{ServiceResult, TaskService, TaskServiceError, ViewState};
pub use store::{MemoryTaskStore, SqliteTaskStore, StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
