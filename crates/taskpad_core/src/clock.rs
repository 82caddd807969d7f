//! Injectable time source.
//!
//! # Responsibility
//! - Supply `created_at`/`modified_at` timestamps to the repository.
//! - Keep core behavior deterministic under test.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for task timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for Rc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock: every `now()` returns the current instant and then
/// advances it by `step`.
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    /// Moves the clock to `at`, including backwards.
    pub fn set(&self, at: DateTime<Utc>) {
        self.next.set(at);
    }

    /// Returns the instant the next `now()` call will report.
    pub fn peek(&self) -> DateTime<Utc> {
        self.next.get()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}
