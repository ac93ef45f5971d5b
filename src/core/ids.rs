use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::domain::RecordId;

/// Source of record identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RecordId;
}

/// Random v4 UUIDs drawn from the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> RecordId {
        RecordId::from(Uuid::new_v4())
    }
}

/// Deterministic ids `1, 2, 3, ...` encoded as UUIDs.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the sequence so the first id is `start + 1`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> RecordId {
        let value = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        RecordId::from(Uuid::from_u128(u128::from(value)))
    }
}
