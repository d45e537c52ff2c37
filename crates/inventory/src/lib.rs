//! Inventory store domain (columns, products, activity history).
//!
//! This crate contains the store's rules implemented as deterministic,
//! in-memory logic with no IO or logging. `stockroom-infra`
//! wires it to a persistence slot and a change bus.

pub mod change;
pub mod command;
pub mod history;
pub mod seed;
pub mod state;
pub mod transfer;
pub mod view;

pub use change::{Containers, StoreChange};
pub use command::{CommandContext, InventoryCommand};
pub use history::{HistoryAction, HistoryDraft, HistoryEntry};
pub use state::InventoryState;
pub use transfer::{InventoryDocument, TransferError};
pub use view::{ProductQuery, SortConfig, SortDirection, visible_columns};
