//! Durable task store contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract for the single serialized task collection.
//! - Own the blob codec (`serde_json`, camelCase task records).
//!
//! # Invariants
//! - The whole collection lives under one fixed key (`COLLECTION_KEY`).
//! - `load_all` yields an empty collection when the key is missing or the
//!   blob is not a JSON array; it errors only when storage itself fails.
//! - Records are decoded one by one. A record that does not decode is
//!   skipped and its siblings survive.
//! - `decode_tasks(encode_tasks(c)) == c` for every collection `c`.

use crate::db::DbError;
use crate::model::task::Task;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryTaskStore;
pub use sqlite_store::SqliteTaskStore;

/// Key under which the serialized collection is stored.
pub const COLLECTION_KEY: &str = "tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable store failures.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Collection could not be serialized.
    Encode(serde_json::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Storage refused the write.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task collection: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store connection is not migrated: expected schema {expected_version}, found {actual_version}"
            ),
            Self::Unavailable(message) => write!(f, "task store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous durable store for the ordered task collection.
pub trait TaskStore {
    /// Loads the stored collection in insertion order.
    fn load_all(&self) -> StoreResult<Vec<Task>>;
    /// Replaces the stored collection. Durable once this returns `Ok`.
    fn save_all(&mut self, tasks: &[Task]) -> StoreResult<()>;
}

/// Serializes the collection into the blob format.
pub fn encode_tasks(tasks: &[Task]) -> StoreResult<String> {
    serde_json::to_string(tasks).map_err(StoreError::Encode)
}

/// Parses the blob format.
///
/// Fails only when the blob is not a JSON array. Array elements that do not
/// decode as a task are skipped with a warning.
pub fn decode_tasks(blob: &str) -> Result<Vec<Task>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(blob)?;
    let mut tasks = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let record_id = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        match serde_json::from_value::<Task>(record) {
            Ok(task) => tasks.push(task),
            // Error text can quote field values, so only position and id are logged.
            Err(err) => warn!(
                "event=store_load module=store status=skip reason=invalid_record index={} task_id={} category={:?}",
                index,
                record_id,
                err.classify()
            ),
        }
    }
    Ok(tasks)
}

/// Decodes a stored blob, degrading to an empty collection on bad contents.
pub(crate) fn decode_or_empty(blob: Option<&str>, source: &str) -> Vec<Task> {
    let Some(blob) = blob else {
        info!("event=store_load module=store status=empty source={source}");
        return Vec::new();
    };

    match decode_tasks(blob) {
        Ok(tasks) => {
            info!(
                "event=store_load module=store status=ok source={source} task_count={}",
                tasks.len()
            );
            tasks
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=invalid source={source} blob_bytes={} error={}",
                blob.len(),
                err
            );
            Vec::new()
        }
    }
}
