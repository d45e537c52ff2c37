//! The inventory store: state + persistence slot + change bus.
//!
//! ```text
//! method call
//!   ↓
//! 1. Stamp a CommandContext (configured actor, now)
//!   ↓
//! 2. InventoryState::handle (pure; None = no-op)
//!   ↓
//! 3. Save the full state to the slot (failures are logged, not returned)
//!   ↓
//! 4. Publish the StoreChange to subscribers
//! ```
//!
//! No-op commands stop after step 2: nothing is saved or published.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use stockroom_core::{ColumnId, HistoryId, ProductId};
use stockroom_events::{Event, EventBus, InMemoryEventBus, Subscription};
use stockroom_inventory::transfer::{export_file_name, export_json, parse_import};
use stockroom_inventory::{
    CommandContext, HistoryDraft, HistoryEntry, InventoryCommand, InventoryDocument,
    InventoryState, ProductQuery, StoreChange, TransferError,
};
use stockroom_products::{Column, ColumnDraft, ColumnPatch, Fields, Product};

use crate::config::StoreConfig;
use crate::slot::{FileStateSlot, StateSlot};

/// Layout version of the persisted payload.
pub const STORAGE_VERSION: u32 = 0;

/// `{"state": {...}, "version": 0}`
#[derive(Debug, Serialize, Deserialize)]
struct Persisted<T> {
    state: T,
    version: u32,
}

/// Single owner of the inventory state.
///
/// Every method completes its state change, save and notification before
/// returning. Wrap the store yourself to share it across threads.
#[derive(Debug)]
pub struct InventoryStore<S> {
    state: InventoryState,
    slot: S,
    bus: InMemoryEventBus<StoreChange>,
    config: StoreConfig,
}

impl<S: StateSlot> InventoryStore<S> {
    /// Hydrate from the configured slot, falling back to seed data when the
    /// slot is empty or unreadable.
    pub fn open(slot: S, config: StoreConfig) -> Self {
        let state = hydrate(&slot, &config.storage_key);
        info!(
            key = %config.storage_key,
            columns = state.columns().len(),
            products = state.products().len(),
            history = state.history().len(),
            "inventory store opened"
        );

        Self {
            state,
            slot,
            bus: InMemoryEventBus::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    /// Receive every change published after this call.
    pub fn subscribe(&self) -> Subscription<StoreChange> {
        self.bus.subscribe()
    }

    // Reads

    pub fn columns(&self) -> &[Column] {
        self.state.columns()
    }

    pub fn products(&self) -> &[Product] {
        self.state.products()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.state.history()
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.state.column(id)
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.state.product(id)
    }

    pub fn is_system_column(&self, id: &ColumnId) -> bool {
        self.state.is_system_column(id)
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        self.state.visible_columns()
    }

    pub fn orphaned_fields<'a>(&'a self, product: &'a Product) -> Vec<&'a str> {
        self.state.orphaned_fields(product)
    }

    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        self.state.query(query)
    }

    // Columns

    pub fn add_column(&mut self, draft: ColumnDraft) -> Option<ColumnId> {
        match self.dispatch(InventoryCommand::AddColumn(draft))? {
            StoreChange::ColumnAdded { column_id, .. } => Some(column_id),
            _ => None,
        }
    }

    /// Returns whether a column was updated.
    pub fn update_column(&mut self, column_id: ColumnId, patch: ColumnPatch) -> bool {
        self.dispatch(InventoryCommand::UpdateColumn { column_id, patch })
            .is_some()
    }

    /// Returns whether a column was removed. System columns are kept.
    pub fn remove_column(&mut self, column_id: ColumnId) -> bool {
        if self.state.is_system_column(&column_id) {
            debug!(column_id = %column_id, "system column kept");
        }
        self.dispatch(InventoryCommand::RemoveColumn { column_id })
            .is_some()
    }

    pub fn reorder_columns(&mut self, columns: Vec<Column>) {
        self.dispatch(InventoryCommand::ReorderColumns(columns));
    }

    // Products

    pub fn add_product(&mut self, fields: Fields) -> Option<ProductId> {
        match self.dispatch(InventoryCommand::AddProduct(fields))? {
            StoreChange::ProductAdded { product_id, .. } => Some(product_id),
            _ => None,
        }
    }

    /// Returns whether a product was updated.
    pub fn update_product(&mut self, product_id: ProductId, patch: Fields) -> bool {
        self.dispatch(InventoryCommand::UpdateProduct { product_id, patch })
            .is_some()
    }

    /// Returns whether a product was removed.
    pub fn remove_product(&mut self, product_id: ProductId) -> bool {
        self.dispatch(InventoryCommand::RemoveProduct { product_id })
            .is_some()
    }

    /// Returns how many of `product_ids` were present and removed.
    pub fn remove_products(&mut self, product_ids: Vec<ProductId>) -> usize {
        match self.dispatch(InventoryCommand::RemoveProducts { product_ids }) {
            Some(StoreChange::ProductsRemoved { product_ids, .. }) => product_ids.len(),
            _ => 0,
        }
    }

    /// Returns the id of the copy.
    pub fn duplicate_product(&mut self, product_id: ProductId) -> Option<ProductId> {
        match self.dispatch(InventoryCommand::DuplicateProduct { product_id })? {
            StoreChange::ProductDuplicated { product_id, .. } => Some(product_id),
            _ => None,
        }
    }

    // History

    pub fn add_history(&mut self, draft: HistoryDraft) -> Option<HistoryId> {
        self.dispatch(InventoryCommand::AddHistory(draft))
            .and_then(|change| change.history_id().cloned())
    }

    pub fn clear_history(&mut self) {
        self.dispatch(InventoryCommand::ClearHistory);
    }

    // Import / export

    /// Replace columns and products wholesale. Returns the imported product count.
    pub fn import_data(&mut self, document: InventoryDocument) -> usize {
        match self.dispatch(InventoryCommand::ImportData(document)) {
            Some(StoreChange::DataImported { product_count, .. }) => product_count,
            _ => 0,
        }
    }

    /// Parse a backup and import it. On failure the state is left untouched.
    pub fn import_json(&mut self, text: &str) -> Result<usize, TransferError> {
        let document = parse_import(text).inspect_err(|err| {
            warn!(error = %err, "import rejected");
        })?;
        Ok(self.import_data(document))
    }

    pub fn export_document(&self) -> InventoryDocument {
        self.state.export_document()
    }

    pub fn export_json(&self) -> Result<String, TransferError> {
        export_json(&self.state.export_document())
    }

    /// Write a backup file into `dir` and return its path.
    pub fn export_to_dir(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let json = self.export_json().context("failed to encode inventory export")?;

        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export directory at {:?}", dir))?;
        let path = dir.join(export_file_name(Utc::now()));
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write inventory export to {:?}", path))?;

        info!(path = %path.display(), products = self.state.products().len(), "inventory exported");
        Ok(path)
    }
}

impl InventoryStore<FileStateSlot> {
    /// Open the store on a file slot in `config.data_dir`.
    pub fn open_file(config: StoreConfig) -> Self {
        let slot = FileStateSlot::new(&config.data_dir);
        Self::open(slot, config)
    }

    /// [`InventoryStore::open_file`] with [`StoreConfig::from_env`].
    pub fn open_default() -> Self {
        Self::open_file(StoreConfig::from_env())
    }
}

impl<S: StateSlot> InventoryStore<S> {
    fn context(&self) -> CommandContext {
        CommandContext::new(self.config.actor.clone(), Utc::now())
    }

    fn dispatch(&mut self, command: InventoryCommand) -> Option<StoreChange> {
        let name = command.name();
        let ctx = self.context();

        let Some(change) = self.state.handle(command, &ctx) else {
            debug!(command = name, "command had no effect");
            return None;
        };
        debug!(command = name, event_type = change.event_type(), "command applied");

        self.persist();

        if let Err(err) = self.bus.publish(change.clone()) {
            warn!(event_type = change.event_type(), error = ?err, "failed to publish store change");
        }

        Some(change)
    }

    fn persist(&self) {
        let payload = Persisted {
            state: &self.state,
            version: STORAGE_VERSION,
        };

        let text = match serde_json::to_string(&payload) {
            Ok(text) => text,
            Err(err) => {
                error!(key = %self.config.storage_key, error = %err, "failed to encode inventory state");
                return;
            }
        };

        if let Err(err) = self.slot.save(&self.config.storage_key, &text) {
            error!(key = %self.config.storage_key, error = %err, "failed to persist inventory state");
        }
    }
}

fn hydrate<S: StateSlot>(slot: &S, key: &str) -> InventoryState {
    let seed = || InventoryState::seeded(Utc::now());

    let text = match slot.load(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!(key, "slot empty, using seed data");
            return seed();
        }
        Err(err) => {
            warn!(key, error = %err, "failed to read slot, using seed data");
            return seed();
        }
    };

    match serde_json::from_str::<Persisted<InventoryState>>(&text) {
        Ok(persisted) if persisted.version == STORAGE_VERSION => persisted.state,
        Ok(persisted) => {
            warn!(key, version = persisted.version, "unsupported slot version, using seed data");
            seed()
        }
        Err(err) => {
            warn!(key, error = %err, "corrupt slot contents, using seed data");
            seed()
        }
    }
}
