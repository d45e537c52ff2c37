use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ColumnId, ProductId};
use stockroom_products::{Column, ColumnDraft, ColumnPatch, Fields};

use crate::history::HistoryDraft;
use crate::transfer::InventoryDocument;

/// Who issued a command, and when.
///
/// Handling is deterministic apart from freshly generated ids; timestamps and
/// the history `user` always come from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
}

impl CommandContext {
    pub fn new(actor: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            actor: actor.into(),
            occurred_at,
        }
    }
}

/// Every mutation the inventory store accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddColumn(ColumnDraft),
    UpdateColumn {
        column_id: ColumnId,
        patch: ColumnPatch,
    },
    RemoveColumn {
        column_id: ColumnId,
    },
    ReorderColumns(Vec<Column>),
    AddProduct(Fields),
    UpdateProduct {
        product_id: ProductId,
        patch: Fields,
    },
    RemoveProduct {
        product_id: ProductId,
    },
    RemoveProducts {
        product_ids: Vec<ProductId>,
    },
    DuplicateProduct {
        product_id: ProductId,
    },
    AddHistory(HistoryDraft),
    ClearHistory,
    ImportData(InventoryDocument),
}

impl InventoryCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            InventoryCommand::AddColumn(_) => "add_column",
            InventoryCommand::UpdateColumn { .. } => "update_column",
            InventoryCommand::RemoveColumn { .. } => "remove_column",
            InventoryCommand::ReorderColumns(_) => "reorder_columns",
            InventoryCommand::AddProduct(_) => "add_product",
            InventoryCommand::UpdateProduct { .. } => "update_product",
            InventoryCommand::RemoveProduct { .. } => "remove_product",
            InventoryCommand::RemoveProducts { .. } => "remove_products",
            InventoryCommand::DuplicateProduct { .. } => "duplicate_product",
            InventoryCommand::AddHistory(_) => "add_history",
            InventoryCommand::ClearHistory => "clear_history",
            InventoryCommand::ImportData(_) => "import_data",
        }
    }
}
