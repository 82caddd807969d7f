//! Domain model for the task collection.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one task shape for list, note and calendar projections.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Completed tasks stay in the collection; only views exclude them.

pub mod task;
