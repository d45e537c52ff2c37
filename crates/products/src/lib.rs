//! Product catalog schema and records.
//!
//! Columns describe how product attributes are displayed and edited; products
//! are open-ended field maps keyed by column id. Nothing here enforces the
//! column schema on write: values are interpreted against the current columns
//! when they are read.

pub mod column;
pub mod field;
pub mod product;

pub use column::{Cell, Column, ColumnDraft, ColumnPatch, ColumnType, DEFAULT_COLUMN_WIDTH};
pub use field::FieldValue;
pub use product::{Fields, Product, RESERVED_KEYS};
