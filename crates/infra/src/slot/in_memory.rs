use std::collections::HashMap;
use std::sync::RwLock;

use super::{SlotError, StateSlot};

/// In-memory slot for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStateSlot {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryStateSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slot = Self::new();
        if let Ok(mut map) = slot.inner.write() {
            map.insert(key.into(), value.into());
        }
        slot
    }
}

impl StateSlot for InMemoryStateSlot {
    fn load(&self, key: &str) -> Result<Option<String>, SlotError> {
        let map = self.inner.read().map_err(|_| SlotError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let mut map = self.inner.write().map_err(|_| SlotError::Poisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        let mut map = self.inner.write().map_err(|_| SlotError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}
