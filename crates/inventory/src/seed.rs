//! Initial store contents for a fresh install.

use chrono::{DateTime, Utc};

use stockroom_core::{ColumnId, ProductId};
use stockroom_products::{Column, ColumnDraft, ColumnType, FieldValue, Fields, Product};

/// Number of sample products in a fresh store.
pub const SEED_PRODUCT_COUNT: usize = 15;

pub const STATUS_OPTIONS: [&str; 3] = ["In Stock", "Low Stock", "Out of Stock"];

/// Default column set: four system columns followed by four optional ones.
pub fn seed_columns() -> Vec<Column> {
    let column = |id: &str, draft: ColumnDraft| Column::from_draft(ColumnId::from(id), draft);

    vec![
        column("name", ColumnDraft::new("Product Name", ColumnType::Text).with_width(200).system()),
        column("sku", ColumnDraft::new("SKU", ColumnType::Text).with_width(120).system()),
        column("price", ColumnDraft::new("Price", ColumnType::Currency).with_width(100).system()),
        column("stock", ColumnDraft::new("Stock", ColumnType::Number).with_width(80).system()),
        column(
            "status",
            ColumnDraft::new("Status", ColumnType::Select)
                .with_width(120)
                .with_options(STATUS_OPTIONS),
        ),
        column("image", ColumnDraft::new("Image", ColumnType::Image).with_width(100)),
        column("category", ColumnDraft::new("Category", ColumnType::Tags).with_width(150)),
        column("rating", ColumnDraft::new("Rating", ColumnType::Rating).with_width(120)),
    ]
}

/// Sample products `prod-1` ..= `prod-15`, all stamped at `at`.
///
/// Values are spread deterministically over the same ranges a hand-entered
/// catalog would use (price 10.00..110.00, stock 0..100, rating 1..=5).
pub fn seed_products(at: DateTime<Utc>) -> Vec<Product> {
    (0..SEED_PRODUCT_COUNT)
        .map(|i| {
            let n = i + 1;
            let cents = 1000 + (i * 3737 + 1100) % 10_000;
            let status = if (i * 7) % 10 >= 7 { "Low Stock" } else { "In Stock" };

            let mut fields = Fields::new();
            fields.insert("name".into(), format!("Premium Item {n}").into());
            fields.insert("sku".into(), format!("SKU-{}", 1000 + i).into());
            fields.insert("price".into(), FieldValue::from(cents as f64 / 100.0));
            fields.insert("stock".into(), FieldValue::from(((i * 29 + 7) % 100) as u64));
            fields.insert("status".into(), status.into());
            fields.insert("category".into(), vec!["Electronics", "Gadgets"].into());
            fields.insert("rating".into(), FieldValue::from(((i * 3) % 5 + 1) as u64));

            Product::new(ProductId::from(format!("prod-{n}")), fields, at)
        })
        .collect()
}
