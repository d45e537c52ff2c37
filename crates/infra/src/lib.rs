//! Infrastructure layer: persistence slots, configuration and the store
//! that ties the inventory domain to them.

pub mod config;
pub mod slot;
pub mod store;


pub use config::StoreConfig;
pub use slot::{FileStateSlot, InMemoryStateSlot, SlotError, StateSlot};
pub use store::{InventoryStore, STORAGE_VERSION};
