use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ColumnId, HistoryId, ProductId, find_by_id, position_by_id};
use stockroom_products::{Column, ColumnDraft, ColumnPatch, Fields, Product};

use crate::change::StoreChange;
use crate::command::{CommandContext, InventoryCommand};
use crate::history::{HistoryAction, HistoryEntry};
use crate::seed::{seed_columns, seed_products};
use crate::transfer::InventoryDocument;
use crate::view::{ProductQuery, visible_columns};

/// The store's three containers.
///
/// All mutation goes through [`InventoryState::handle`]. Handling never fails:
/// commands that name an unknown id are no-ops and return `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    columns: Vec<Column>,
    products: Vec<Product>,
    history: Vec<HistoryEntry>,
}

impl InventoryState {
    pub fn new(columns: Vec<Column>, products: Vec<Product>, history: Vec<HistoryEntry>) -> Self {
        Self {
            columns,
            products,
            history,
        }
    }

    /// Default columns, sample products and an empty history.
    pub fn seeded(at: DateTime<Utc>) -> Self {
        Self::new(seed_columns(), seed_products(at), Vec::new())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        find_by_id(&self.columns, id)
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        find_by_id(&self.products, id)
    }

    /// Unknown ids are not system columns.
    pub fn is_system_column(&self, id: &ColumnId) -> bool {
        self.column(id).is_some_and(Column::is_system)
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        visible_columns(&self.columns)
    }

    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        query.apply(&self.products)
    }

    /// Field keys on `product` that no current column displays.
    pub fn orphaned_fields<'a>(&'a self, product: &'a Product) -> Vec<&'a str> {
        product.orphaned_fields(self.columns.iter().map(|c| c.id.as_str()))
    }

    /// Snapshot of columns and products for a backup file.
    pub fn export_document(&self) -> InventoryDocument {
        InventoryDocument {
            products: self.products.clone(),
            columns: self.columns.clone(),
        }
    }

    pub fn handle(&mut self, command: InventoryCommand, ctx: &CommandContext) -> Option<StoreChange> {
        match command {
            InventoryCommand::AddColumn(draft) => Some(self.handle_add_column(draft, ctx)),
            InventoryCommand::UpdateColumn { column_id, patch } => {
                self.handle_update_column(column_id, patch, ctx)
            }
            InventoryCommand::RemoveColumn { column_id } => self.handle_remove_column(column_id, ctx),
            InventoryCommand::ReorderColumns(columns) => {
                self.columns = columns;
                Some(StoreChange::ColumnsReordered {
                    occurred_at: ctx.occurred_at,
                })
            }
            InventoryCommand::AddProduct(fields) => Some(self.handle_add_product(fields, ctx)),
            InventoryCommand::UpdateProduct { product_id, patch } => {
                self.handle_update_product(product_id, patch, ctx)
            }
            InventoryCommand::RemoveProduct { product_id } => {
                self.handle_remove_product(product_id, ctx)
            }
            InventoryCommand::RemoveProducts { product_ids } => {
                self.handle_remove_products(product_ids, ctx)
            }
            InventoryCommand::DuplicateProduct { product_id } => {
                self.handle_duplicate_product(product_id, ctx)
            }
            InventoryCommand::AddHistory(draft) => {
                let history_id = self.record(draft.action, draft.description, draft.user, ctx);
                Some(StoreChange::HistoryRecorded {
                    history_id,
                    occurred_at: ctx.occurred_at,
                })
            }
            InventoryCommand::ClearHistory => {
                self.history.clear();
                Some(StoreChange::HistoryCleared {
                    occurred_at: ctx.occurred_at,
                })
            }
            InventoryCommand::ImportData(document) => Some(self.handle_import(document, ctx)),
        }
    }
}

impl InventoryState {
    fn record(
        &mut self,
        action: HistoryAction,
        description: String,
        user: String,
        ctx: &CommandContext,
    ) -> HistoryId {
        let id = HistoryId::generate();
        self.history.insert(
            0,
            HistoryEntry {
                id: id.clone(),
                action,
                description,
                timestamp: ctx.occurred_at,
                user,
            },
        );
        id
    }

    fn record_as_actor(
        &mut self,
        action: HistoryAction,
        description: String,
        ctx: &CommandContext,
    ) -> HistoryId {
        self.record(action, description, ctx.actor.clone(), ctx)
    }

    fn fresh_column_id(&self) -> ColumnId {
        loop {
            let id = ColumnId::generate();
            if self.column(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_product_id(&self) -> ProductId {
        loop {
            let id = ProductId::generate();
            if self.product(&id).is_none() {
                return id;
            }
        }
    }

    fn handle_add_column(&mut self, draft: ColumnDraft, ctx: &CommandContext) -> StoreChange {
        let column_id = self.fresh_column_id();
        self.columns.push(Column::from_draft(column_id.clone(), draft));
        StoreChange::ColumnAdded {
            column_id,
            occurred_at: ctx.occurred_at,
        }
    }

    fn handle_update_column(
        &mut self,
        column_id: ColumnId,
        patch: ColumnPatch,
        ctx: &CommandContext,
    ) -> Option<StoreChange> {
        let column = self.columns.iter_mut().find(|c| c.id == column_id)?;
        column.apply_patch(patch);
        Some(StoreChange::ColumnUpdated {
            column_id,
            occurred_at: ctx.occurred_at,
        })
    }

    fn handle_remove_column(&mut self, column_id: ColumnId, ctx: &CommandContext) -> Option<StoreChange> {
        let index = position_by_id(&self.columns, &column_id)?;
        if self.columns[index].is_system() {
            return None;
        }
        // Product values under this key are retained.
        self.columns.remove(index);
        Some(StoreChange::ColumnRemoved {
            column_id,
            occurred_at: ctx.occurred_at,
        })
    }

    fn handle_add_product(&mut self, fields: Fields, ctx: &CommandContext) -> StoreChange {
        let product = Product::new(self.fresh_product_id(), fields, ctx.occurred_at);
        let product_id = product.id().clone();
        let description = format!("Added product {}", product.display_name());

        self.products.insert(0, product);
        let history_id = self.record_as_actor(HistoryAction::Create, description, ctx);

        StoreChange::ProductAdded {
            product_id,
            history_id,
            occurred_at: ctx.occurred_at,
        }
    }

    fn handle_update_product(
        &mut self,
        product_id: ProductId,
        patch: Fields,
        ctx: &CommandContext,
    ) -> Option<StoreChange> {
        let product = self.products.iter_mut().find(|p| *p.id() == product_id)?;
        product.merge(patch);
        product.touch(ctx.occurred_at);

        let history_id =
            self.record_as_actor(HistoryAction::Update, format!("Updated product {product_id}"), ctx);

        Some(StoreChange::ProductUpdated {
            product_id,
            history_id,
            occurred_at: ctx.occurred_at,
        })
    }

    fn handle_remove_product(
        &mut self,
        product_id: ProductId,
        ctx: &CommandContext,
    ) -> Option<StoreChange> {
        let removed = self.take_products(std::slice::from_ref(&product_id));
        if removed.is_empty() {
            return None;
        }
        let history_id = self.record_as_actor(
            HistoryAction::Delete,
            format!("Deleted product {product_id}"),
            ctx,
        );

        Some(StoreChange::ProductsRemoved {
            product_ids: removed,
            history_id,
            occurred_at: ctx.occurred_at,
        })
    }

    /// One history entry counting the products actually removed, even when
    /// only one id was given.
    fn handle_remove_products(
        &mut self,
        product_ids: Vec<ProductId>,
        ctx: &CommandContext,
    ) -> Option<StoreChange> {
        let removed = self.take_products(&product_ids);
        if removed.is_empty() {
            return None;
        }
        let history_id = self.record_as_actor(
            HistoryAction::Delete,
            format!("Deleted {} products", removed.len()),
            ctx,
        );

        Some(StoreChange::ProductsRemoved {
            product_ids: removed,
            history_id,
            occurred_at: ctx.occurred_at,
        })
    }

    /// Drop the listed products that exist; returns their ids in table order.
    fn take_products(&mut self, product_ids: &[ProductId]) -> Vec<ProductId> {
        let removed: Vec<ProductId> = self
            .products
            .iter()
            .map(|p| p.id())
            .filter(|id| product_ids.contains(id))
            .cloned()
            .collect();
        self.products.retain(|p| !removed.contains(p.id()));
        removed
    }

    fn handle_duplicate_product(
        &mut self,
        product_id: ProductId,
        ctx: &CommandContext,
    ) -> Option<StoreChange> {
        let original = self.product(&product_id)?;
        let copy = original.duplicate(self.fresh_product_id(), ctx.occurred_at);
        let description = format!("Duplicated product {}", original.display_name());
        let copy_id = copy.id().clone();

        self.products.insert(0, copy);
        let history_id = self.record_as_actor(HistoryAction::Create, description, ctx);

        Some(StoreChange::ProductDuplicated {
            source_id: product_id,
            product_id: copy_id,
            history_id,
            occurred_at: ctx.occurred_at,
        })
    }

    fn handle_import(&mut self, document: InventoryDocument, ctx: &CommandContext) -> StoreChange {
        let product_count = document.products.len();
        self.columns = document.columns;
        self.products = Vec::with_capacity(product_count);
        for mut product in document.products {
            product.fill_gaps(|| self.fresh_product_id(), ctx.occurred_at);
            self.products.push(product);
        }

        let history_id = self.record_as_actor(
            HistoryAction::Import,
            format!("Imported {product_count} products"),
            ctx,
        );

        StoreChange::DataImported {
            product_count,
            history_id,
            occurred_at: ctx.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryDraft;
    use chrono::{Duration, TimeZone};
    use stockroom_products::{ColumnType, FieldValue};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn ctx_at(minutes: i64) -> CommandContext {
        CommandContext::new("Admin", t0() + Duration::minutes(minutes))
    }

    fn seeded() -> InventoryState {
        InventoryState::seeded(t0())
    }

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
    }

    fn added_product_id(change: Option<StoreChange>) -> ProductId {
        match change {
            Some(StoreChange::ProductAdded { product_id, .. }) => product_id,
            other => panic!("expected ProductAdded, got {other:?}"),
        }
    }

    #[test]
    fn add_column_appends_with_fresh_id_and_no_history() {
        let mut state = seeded();
        let before = state.columns().len();

        let change = state.handle(
            InventoryCommand::AddColumn(ColumnDraft::new("Supplier", ColumnType::Text).with_visible(false)),
            &ctx_at(1),
        );

        let Some(StoreChange::ColumnAdded { column_id, .. }) = change else {
            panic!("expected ColumnAdded");
        };
        let added = state.columns().last().unwrap();
        assert_eq!(state.columns().len(), before + 1);
        assert_eq!(added.id, column_id);
        assert!(column_id.as_str().starts_with("col-"));
        assert!(!added.visible);
        assert!(state.history().is_empty());
    }

    #[test]
    fn update_column_merges_patch_and_ignores_unknown_ids() {
        let mut state = seeded();
        let id = ColumnId::from("rating");

        let change = state.handle(
            InventoryCommand::UpdateColumn {
                column_id: id.clone(),
                patch: ColumnPatch::label("Score"),
            },
            &ctx_at(1),
        );
        assert!(matches!(change, Some(StoreChange::ColumnUpdated { .. })));
        assert_eq!(state.column(&id).unwrap().label, "Score");
        assert_eq!(state.column(&id).unwrap().width, 120);

        let snapshot = state.clone();
        let change = state.handle(
            InventoryCommand::UpdateColumn {
                column_id: ColumnId::from("nope"),
                patch: ColumnPatch::label("x"),
            },
            &ctx_at(2),
        );
        assert!(change.is_none());
        assert_eq!(state, snapshot);
    }

    #[test]
    fn removing_a_column_keeps_product_values() {
        let mut state = seeded();
        let change = state.handle(
            InventoryCommand::RemoveColumn {
                column_id: ColumnId::from("category"),
            },
            &ctx_at(1),
        );

        assert!(matches!(change, Some(StoreChange::ColumnRemoved { .. })));
        assert!(state.column(&ColumnId::from("category")).is_none());

        let product = state.product(&ProductId::from("prod-1")).unwrap();
        assert!(product.get("category").is_some());
        assert_eq!(state.orphaned_fields(product), vec!["category"]);
    }

    #[test]
    fn system_columns_are_never_removed() {
        let mut state = seeded();
        let change = state.handle(
            InventoryCommand::RemoveColumn {
                column_id: ColumnId::from("sku"),
            },
            &ctx_at(1),
        );

        assert!(change.is_none());
        assert!(state.column(&ColumnId::from("sku")).is_some());
        assert!(state.is_system_column(&ColumnId::from("sku")));
        assert!(!state.is_system_column(&ColumnId::from("rating")));
        assert!(!state.is_system_column(&ColumnId::from("ghost")));

        let hide = state.handle(
            InventoryCommand::UpdateColumn {
                column_id: ColumnId::from("sku"),
                patch: ColumnPatch::visible(false),
            },
            &ctx_at(2),
        );
        assert!(hide.is_some());
        assert!(state.visible_columns().iter().all(|c| c.id != "sku"));
    }

    #[test]
    fn reorder_replaces_the_sequence_exactly() {
        let mut state = seeded();
        let mut permuted = state.columns().to_vec();
        permuted.reverse();
        permuted.swap(0, 3);

        state.handle(InventoryCommand::ReorderColumns(permuted.clone()), &ctx_at(1));

        assert_eq!(state.columns(), permuted.as_slice());
        let mut ids: Vec<_> = state.columns().iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn add_product_prepends_record_and_history() {
        let mut state = seeded();
        let ctx = ctx_at(5);

        let id = added_product_id(state.handle(
            InventoryCommand::AddProduct(fields(&[("name", "Desk Lamp".into()), ("stock", 3_i64.into())])),
            &ctx,
        ));

        let product = &state.products()[0];
        assert_eq!(product.id(), &id);
        assert_eq!(product.created_at(), product.updated_at());
        assert_eq!(product.created_at(), ctx.occurred_at);
        assert_eq!(state.products().len(), 16);

        assert_eq!(state.history().len(), 1);
        let entry = &state.history()[0];
        assert_eq!(entry.action, HistoryAction::Create);
        assert_eq!(entry.description, "Added product Desk Lamp");
        assert_eq!(entry.user, "Admin");
        assert_eq!(entry.timestamp, ctx.occurred_at);
    }

    #[test]
    fn add_product_without_name_logs_unknown() {
        let mut state = seeded();
        state.handle(InventoryCommand::AddProduct(Fields::new()), &ctx_at(1));
        assert_eq!(state.history()[0].description, "Added product Unknown");
    }

    #[test]
    fn update_product_merges_and_refreshes_updated_at() {
        let mut state = seeded();
        let id = ProductId::from("prod-2");

        let change = state.handle(
            InventoryCommand::UpdateProduct {
                product_id: id.clone(),
                patch: fields(&[("stock", 0_i64.into()), ("supplier", "ACME".into())]),
            },
            &ctx_at(30),
        );

        assert!(matches!(change, Some(StoreChange::ProductUpdated { .. })));
        let product = state.product(&id).unwrap();
        assert_eq!(product.get("stock"), Some(&FieldValue::from(0_i64)));
        assert_eq!(product.get("supplier"), Some(&FieldValue::from("ACME")));
        assert_eq!(product.get("name"), Some(&FieldValue::from("Premium Item 2")));
        assert_eq!(product.updated_at(), ctx_at(30).occurred_at);
        assert_eq!(product.created_at(), t0());
        assert_eq!(state.history()[0].description, "Updated product prod-2");
    }

    #[test]
    fn update_unknown_product_is_a_pure_no_op() {
        let mut state = seeded();
        let snapshot = state.clone();

        let change = state.handle(
            InventoryCommand::UpdateProduct {
                product_id: ProductId::from("ghost"),
                patch: fields(&[("stock", 1_i64.into())]),
            },
            &ctx_at(1),
        );

        assert!(change.is_none());
        assert_eq!(state, snapshot);
    }

    #[test]
    fn remove_product_scenario() {
        let mut state = seeded();
        assert_eq!(state.products().len(), 15);

        state.handle(
            InventoryCommand::RemoveProduct {
                product_id: ProductId::from("prod-3"),
            },
            &ctx_at(1),
        );

        assert_eq!(state.products().len(), 14);
        assert!(state.products().iter().all(|p| p.id() != "prod-3"));
        assert_eq!(state.history()[0].action, HistoryAction::Delete);
        assert_eq!(state.history()[0].description, "Deleted product prod-3");
    }

    #[test]
    fn remove_products_logs_once_with_count() {
        let mut state = seeded();
        let change = state.handle(
            InventoryCommand::RemoveProducts {
                product_ids: vec![ProductId::from("prod-1"), ProductId::from("prod-9")],
            },
            &ctx_at(1),
        );

        let Some(StoreChange::ProductsRemoved { product_ids, .. }) = change else {
            panic!("expected ProductsRemoved");
        };
        assert_eq!(product_ids.len(), 2);
        assert_eq!(state.products().len(), 13);
        assert!(state.product(&ProductId::from("prod-1")).is_none());
        assert!(state.product(&ProductId::from("prod-9")).is_none());
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].description, "Deleted 2 products");
    }

    #[test]
    fn bulk_removal_of_one_product_still_reports_a_count() {
        let mut state = seeded();
        state.handle(
            InventoryCommand::RemoveProducts {
                product_ids: vec![ProductId::from("prod-4")],
            },
            &ctx_at(1),
        );
        state.handle(
            InventoryCommand::RemoveProducts {
                product_ids: vec![ProductId::from("prod-5"), ProductId::from("missing")],
            },
            &ctx_at(2),
        );

        assert_eq!(state.products().len(), 13);
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].description, "Deleted 1 products");
        assert_eq!(state.history()[1].description, "Deleted 1 products");
    }

    #[test]
    fn removing_unknown_products_changes_nothing() {
        let mut state = seeded();
        let snapshot = state.clone();

        assert!(state
            .handle(
                InventoryCommand::RemoveProducts {
                    product_ids: vec![ProductId::from("x"), ProductId::from("y")],
                },
                &ctx_at(1),
            )
            .is_none());
        assert!(state
            .handle(
                InventoryCommand::RemoveProduct {
                    product_id: ProductId::from("x"),
                },
                &ctx_at(1),
            )
            .is_none());
        assert_eq!(state, snapshot);
    }

    #[test]
    fn duplicate_product_clones_under_new_id() {
        let mut state = seeded();
        let source = ProductId::from("prod-4");
        let original = state.product(&source).unwrap().clone();

        let change = state.handle(
            InventoryCommand::DuplicateProduct {
                product_id: source.clone(),
            },
            &ctx_at(10),
        );

        let Some(StoreChange::ProductDuplicated { product_id, .. }) = change else {
            panic!("expected ProductDuplicated");
        };
        let copy = state.product(&product_id).unwrap();

        assert_ne!(product_id, source);
        assert_eq!(state.products()[0].id(), &product_id);
        assert_eq!(copy.get("name"), Some(&FieldValue::from("Premium Item 4 (Copy)")));
        assert_eq!(copy.get("sku"), original.get("sku"));
        assert_eq!(copy.created_at(), ctx_at(10).occurred_at);
        assert_eq!(state.product(&source), Some(&original));
        assert_eq!(state.history()[0].action, HistoryAction::Create);
        assert_eq!(state.history()[0].description, "Duplicated product Premium Item 4");
    }

    #[test]
    fn duplicate_unknown_product_is_a_no_op() {
        let mut state = seeded();
        let change = state.handle(
            InventoryCommand::DuplicateProduct {
                product_id: ProductId::from("ghost"),
            },
            &ctx_at(1),
        );
        assert!(change.is_none());
        assert!(state.history().is_empty());
    }

    #[test]
    fn history_is_newest_first_and_clearable() {
        let mut state = seeded();
        state.handle(
            InventoryCommand::AddHistory(HistoryDraft::new(HistoryAction::Export, "Exported backup", "Ops")),
            &ctx_at(1),
        );
        state.handle(InventoryCommand::AddProduct(Fields::new()), &ctx_at(2));

        assert_eq!(state.history()[0].action, HistoryAction::Create);
        assert_eq!(state.history()[1].action, HistoryAction::Export);
        assert_eq!(state.history()[1].user, "Ops");
        assert!(state.history()[0].timestamp > state.history()[1].timestamp);

        state.handle(InventoryCommand::ClearHistory, &ctx_at(3));
        assert!(state.history().is_empty());
        assert_eq!(state.products().len(), 16);
    }

    #[test]
    fn import_replaces_columns_and_products_but_keeps_history() {
        let mut state = seeded();
        state.handle(InventoryCommand::AddProduct(Fields::new()), &ctx_at(1));
        let document = InventoryDocument {
            products: seed_products(t0()).into_iter().take(2).collect(),
            columns: seed_columns().into_iter().take(3).collect(),
        };

        let change = state.handle(InventoryCommand::ImportData(document.clone()), &ctx_at(2));

        assert!(matches!(change, Some(StoreChange::DataImported { product_count: 2, .. })));
        assert_eq!(state.export_document(), document);
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].action, HistoryAction::Import);
        assert_eq!(state.history()[0].description, "Imported 2 products");
    }

    #[test]
    fn imported_products_missing_timestamps_are_stamped_at_import() {
        let mut state = seeded();
        let document = crate::transfer::parse_import(
            r#"{"products":[{"id":"p1","name":"A"},{"name":"B","createdAt":"2023-05-01T00:00:00.000Z"}],"columns":[]}"#,
        )
        .unwrap();
        let ctx = ctx_at(5);

        state.handle(InventoryCommand::ImportData(document), &ctx);

        let first = state.product(&ProductId::from("p1")).unwrap();
        assert_eq!(first.created_at(), ctx.occurred_at);
        assert_eq!(first.updated_at(), ctx.occurred_at);

        let second = &state.products()[1];
        assert!(second.id().as_str().starts_with(ProductId::PREFIX));
        assert_eq!(second.display_name(), "B");
        assert_eq!(second.created_at().to_rfc3339(), "2023-05-01T00:00:00+00:00");
        assert_eq!(second.updated_at(), second.created_at());
        assert_eq!(state.history()[0].description, "Imported 2 products");
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut state = seeded();
        state.handle(
            InventoryCommand::AddColumn(ColumnDraft::new("Supplier", ColumnType::Text)),
            &ctx_at(1),
        );
        state.handle(
            InventoryCommand::AddProduct(fields(&[("name", "Bench".into()), ("supplier", "ACME".into())])),
            &ctx_at(2),
        );
        let history_before = state.history().len();

        let text = crate::transfer::export_json(&state.export_document()).unwrap();
        let before = state.export_document();
        let parsed = crate::transfer::parse_import(&text).unwrap();
        state.handle(InventoryCommand::ImportData(parsed), &ctx_at(3));

        assert_eq!(state.export_document(), before);
        assert_eq!(state.history().len(), history_before + 1);
        assert_eq!(state.history()[0].action, HistoryAction::Import);
    }

    #[test]
    fn persisted_shape_has_three_containers() {
        let json = serde_json::to_value(seeded()).unwrap();
        assert!(json["columns"].is_array());
        assert_eq!(json["products"].as_array().map(Vec::len), Some(15));
        assert!(json["history"].as_array().is_some_and(Vec::is_empty));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: ids stay unique however many records are added.
            #[test]
            fn generated_ids_stay_unique(columns in 1usize..20, products in 1usize..20) {
                let mut state = InventoryState::seeded(t0());
                for i in 0..columns {
                    state.handle(
                        InventoryCommand::AddColumn(ColumnDraft::new(format!("C{i}"), ColumnType::Text)),
                        &ctx_at(i as i64),
                    );
                }
                for i in 0..products {
                    state.handle(
                        InventoryCommand::AddProduct(fields(&[("name", format!("P{i}").into())])),
                        &ctx_at(i as i64),
                    );
                }

                let mut column_ids: Vec<_> = state.columns().iter().map(|c| c.id.clone()).collect();
                column_ids.sort();
                column_ids.dedup();
                prop_assert_eq!(column_ids.len(), 8 + columns);

                let mut product_ids: Vec<_> = state.products().iter().map(|p| p.id().clone()).collect();
                product_ids.sort();
                product_ids.dedup();
                prop_assert_eq!(product_ids.len(), 15 + products);
                prop_assert_eq!(state.history().len(), products);
            }

            /// Property: reordering with any permutation loses and duplicates nothing.
            #[test]
            fn reorder_preserves_membership(order in Just((0..8usize).collect::<Vec<_>>()).prop_shuffle()) {
                let mut state = InventoryState::seeded(t0());
                let permuted: Vec<Column> = order.iter().map(|&i| state.columns()[i].clone()).collect();

                state.handle(InventoryCommand::ReorderColumns(permuted.clone()), &ctx_at(1));

                prop_assert_eq!(state.columns(), permuted.as_slice());
                let mut ids: Vec<_> = state.columns().iter().map(|c| c.id.clone()).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), 8);
            }

            /// Property: every product mutation prepends exactly one history entry.
            #[test]
            fn product_mutations_log_exactly_once(index in 1usize..=15) {
                let mut state = InventoryState::seeded(t0());
                let id = ProductId::from(format!("prod-{index}"));

                state.handle(InventoryCommand::DuplicateProduct { product_id: id.clone() }, &ctx_at(1));
                prop_assert_eq!(state.history().len(), 1);
                state.handle(
                    InventoryCommand::UpdateProduct { product_id: id.clone(), patch: Fields::new() },
                    &ctx_at(2),
                );
                prop_assert_eq!(state.history().len(), 2);
                state.handle(InventoryCommand::RemoveProduct { product_id: id }, &ctx_at(3));
                prop_assert_eq!(state.history().len(), 3);
                prop_assert_eq!(state.products().len(), 15);
            }
        }
    }
}
