//! Pure projections over the canonical task collection.
//!
//! # Responsibility
//! - Compute the filtered/sorted list view and calendar events.
//!
//! # Invariants
//! - Projections never mutate their input and never cache output; every
//!   call recomputes from the snapshot it is given.

pub mod calendar;
pub mod view;
