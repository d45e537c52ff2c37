//! Key/value persistence slots.
//!
//! A slot holds one serialized document per key. The store rewrites the whole
//! document after each mutation, so implementations only need whole-value
//! reads and writes.

pub mod file;
pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStateSlot;
pub use in_memory::InMemoryStateSlot;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Named string storage.
pub trait StateSlot: Send + Sync {
    /// `Ok(None)` when nothing has been stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, SlotError>;

    fn save(&self, key: &str, value: &str) -> Result<(), SlotError>;

    /// Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), SlotError>;
}

impl<S> StateSlot for Arc<S>
where
    S: StateSlot + ?Sized,
{
    fn load(&self, key: &str) -> Result<Option<String>, SlotError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SlotError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        (**self).remove(key)
    }
}
