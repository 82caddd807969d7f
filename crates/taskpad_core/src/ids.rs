//! Injectable task identity generators.

use crate::model::task::TaskId;
use std::cell::Cell;
use uuid::Uuid;

/// Produces task ids. Implementations must never repeat an id.
pub trait IdGenerator {
    fn next_id(&self) -> TaskId;
}

/// Random v4 UUID ids. Default for real stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> TaskId {
        TaskId::new(Uuid::new_v4().to_string())
    }
}

/// Predictable `<prefix>-<n>` ids, starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Cell::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> TaskId {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        TaskId::new(format!("{}-{next}", self.prefix))
    }
}
