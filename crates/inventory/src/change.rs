use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ColumnId, HistoryId, ProductId};
use stockroom_events::Event;

/// Which of the store's containers a change touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Containers {
    pub columns: bool,
    pub products: bool,
    pub history: bool,
}

impl Containers {
    pub const COLUMNS: Self = Self { columns: true, products: false, history: false };
    pub const PRODUCTS_AND_HISTORY: Self = Self { columns: false, products: true, history: true };
    pub const HISTORY: Self = Self { columns: false, products: false, history: true };
    pub const ALL: Self = Self { columns: true, products: true, history: true };
}

/// Notification published after an effective store mutation.
///
/// No-op mutations (unknown ids) produce no change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreChange {
    ColumnAdded {
        column_id: ColumnId,
        occurred_at: DateTime<Utc>,
    },
    ColumnUpdated {
        column_id: ColumnId,
        occurred_at: DateTime<Utc>,
    },
    ColumnRemoved {
        column_id: ColumnId,
        occurred_at: DateTime<Utc>,
    },
    ColumnsReordered {
        occurred_at: DateTime<Utc>,
    },
    ProductAdded {
        product_id: ProductId,
        history_id: HistoryId,
        occurred_at: DateTime<Utc>,
    },
    ProductUpdated {
        product_id: ProductId,
        history_id: HistoryId,
        occurred_at: DateTime<Utc>,
    },
    ProductsRemoved {
        product_ids: Vec<ProductId>,
        history_id: HistoryId,
        occurred_at: DateTime<Utc>,
    },
    ProductDuplicated {
        source_id: ProductId,
        product_id: ProductId,
        history_id: HistoryId,
        occurred_at: DateTime<Utc>,
    },
    HistoryRecorded {
        history_id: HistoryId,
        occurred_at: DateTime<Utc>,
    },
    HistoryCleared {
        occurred_at: DateTime<Utc>,
    },
    DataImported {
        product_count: usize,
        history_id: HistoryId,
        occurred_at: DateTime<Utc>,
    },
}

impl StoreChange {
    pub fn touches(&self) -> Containers {
        match self {
            StoreChange::ColumnAdded { .. }
            | StoreChange::ColumnUpdated { .. }
            | StoreChange::ColumnRemoved { .. }
            | StoreChange::ColumnsReordered { .. } => Containers::COLUMNS,
            StoreChange::ProductAdded { .. }
            | StoreChange::ProductUpdated { .. }
            | StoreChange::ProductsRemoved { .. }
            | StoreChange::ProductDuplicated { .. } => Containers::PRODUCTS_AND_HISTORY,
            StoreChange::HistoryRecorded { .. } | StoreChange::HistoryCleared { .. } => {
                Containers::HISTORY
            }
            StoreChange::DataImported { .. } => Containers::ALL,
        }
    }

    /// History entry written alongside this change, if any.
    pub fn history_id(&self) -> Option<&HistoryId> {
        match self {
            StoreChange::ProductAdded { history_id, .. }
            | StoreChange::ProductUpdated { history_id, .. }
            | StoreChange::ProductsRemoved { history_id, .. }
            | StoreChange::ProductDuplicated { history_id, .. }
            | StoreChange::HistoryRecorded { history_id, .. }
            | StoreChange::DataImported { history_id, .. } => Some(history_id),
            _ => None,
        }
    }
}

impl Event for StoreChange {
    fn event_type(&self) -> &'static str {
        match self {
            StoreChange::ColumnAdded { .. } => "inventory.column.added",
            StoreChange::ColumnUpdated { .. } => "inventory.column.updated",
            StoreChange::ColumnRemoved { .. } => "inventory.column.removed",
            StoreChange::ColumnsReordered { .. } => "inventory.columns.reordered",
            StoreChange::ProductAdded { .. } => "inventory.product.added",
            StoreChange::ProductUpdated { .. } => "inventory.product.updated",
            StoreChange::ProductsRemoved { .. } => "inventory.products.removed",
            StoreChange::ProductDuplicated { .. } => "inventory.product.duplicated",
            StoreChange::HistoryRecorded { .. } => "inventory.history.recorded",
            StoreChange::HistoryCleared { .. } => "inventory.history.cleared",
            StoreChange::DataImported { .. } => "inventory.data.imported",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StoreChange::ColumnAdded { occurred_at, .. }
            | StoreChange::ColumnUpdated { occurred_at, .. }
            | StoreChange::ColumnRemoved { occurred_at, .. }
            | StoreChange::ColumnsReordered { occurred_at }
            | StoreChange::ProductAdded { occurred_at, .. }
            | StoreChange::ProductUpdated { occurred_at, .. }
            | StoreChange::ProductsRemoved { occurred_at, .. }
            | StoreChange::ProductDuplicated { occurred_at, .. }
            | StoreChange::HistoryRecorded { occurred_at, .. }
            | StoreChange::HistoryCleared { occurred_at }
            | StoreChange::DataImported { occurred_at, .. } => *occurred_at,
        }
    }
}
