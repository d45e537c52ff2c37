//! `stockroom-core`: shared building blocks for the inventory domain.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_by_id, position_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{ColumnId, HistoryId, ProductId};
