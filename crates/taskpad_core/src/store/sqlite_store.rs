//! SQLite-backed task store.
//!
//! # Invariants
//! - The collection is one row of `kv_store`, keyed by `COLLECTION_KEY`.
//! - `save_all` is a single upsert; the row is replaced atomically.

use super::{decode_or_empty, encode_tasks, StoreError, StoreResult, TaskStore, COLLECTION_KEY};
use crate::db::migrations::{current_version, latest_version};
use crate::db::open_db;
use crate::model::task::Task;
use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable store on a migrated SQLite connection.
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Wraps a connection that already went through `db::open_db*`.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let actual_version = current_version(&conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    /// Opens (creating if needed) the database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn read_blob(&self) -> StoreResult<Option<String>> {
        let blob = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [COLLECTION_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }
}

impl TaskStore for SqliteTaskStore {
    fn load_all(&self) -> StoreResult<Vec<Task>> {
        let blob = self.read_blob()?;
        Ok(decode_or_empty(blob.as_deref(), "sqlite"))
    }

    fn save_all(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let blob = encode_tasks(tasks)?;
        let result = self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![COLLECTION_KEY, blob],
        );

        if let Err(err) = result {
            error!(
                "event=store_save module=store status=error source=sqlite task_count={} error={}",
                tasks.len(),
                err
            );
            return Err(err.into());
        }
        Ok(())
    }
}
