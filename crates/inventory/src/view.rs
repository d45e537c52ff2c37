//! Read-only views derived from store state.
//!
//! Nothing here is stored; callers recompute views whenever a change
//! notification arrives.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use stockroom_products::{Column, FieldValue, Product};

/// Columns to render, in display order.
pub fn visible_columns(columns: &[Column]) -> Vec<&Column> {
    columns.iter().filter(|c| c.visible).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort the product table by one key (a column id or `id`/`createdAt`/`updatedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Header-click behaviour: ascending first, then descending on a repeat click.
    pub fn toggle(current: Option<&SortConfig>, column_id: &str) -> SortConfig {
        match current {
            Some(c) if c.key == column_id && c.direction == SortDirection::Asc => {
                SortConfig::desc(column_id)
            }
            _ => SortConfig::asc(column_id),
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = match self.key.as_str() {
            "id" => a.id().cmp(b.id()),
            "createdAt" => a.created_at().cmp(&b.created_at()),
            "updatedAt" => a.updated_at().cmp(&b.updated_at()),
            key => {
                let (x, y) = (a.get(key), b.get(key));
                // Kind groups stay in a fixed order whatever the direction.
                match kind_rank(x).cmp(&kind_rank(y)) {
                    Ordering::Equal => match (x, y) {
                        (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
                        _ => Ordering::Equal,
                    },
                    grouped => return grouped,
                }
            }
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Numbers, text, flags, lists, opaque values, then missing/null.
fn kind_rank(value: Option<&FieldValue>) -> u8 {
    match value {
        Some(FieldValue::Number(_)) => 0,
        Some(FieldValue::Text(_)) => 1,
        Some(FieldValue::Bool(_)) => 2,
        Some(FieldValue::List(_)) => 3,
        Some(FieldValue::Other(_)) => 4,
        Some(FieldValue::Null) | None => 5,
    }
}

/// Free-text filter plus optional sort over the product table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub search: String,
    pub sort: Option<SortConfig>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn sort(mut self, sort: SortConfig) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Filter then sort. The sort is stable: ties keep store order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self.search.to_lowercase();
        let mut rows: Vec<&Product> = if needle.is_empty() {
            products.iter().collect()
        } else {
            products.iter().filter(|p| p.matches_search(&needle)).collect()
        };

        if let Some(sort) = &self.sort {
            rows.sort_by(|a, b| sort.compare(a, b));
        }

        rows
    }
}
