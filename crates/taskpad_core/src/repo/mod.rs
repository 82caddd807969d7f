//! Repository layer over the durable task store.
//!
//! # Responsibility
//! - Own the canonical collection and its lifetime rules.
//! - Isolate store and codec details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate input before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to store transport errors.

pub mod task_repo;
