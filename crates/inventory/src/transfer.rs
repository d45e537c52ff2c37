//! Backup document: the JSON shape used for export and import.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use stockroom_products::{Column, Product};

/// `{ "products": [...], "columns": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDocument {
    pub products: Vec<Product>,
    pub columns: Vec<Column>,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("missing or empty top-level `{0}`")]
    MissingField(&'static str),

    #[error("malformed inventory document: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to encode inventory document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Pretty-printed JSON for a backup file.
pub fn export_json(document: &InventoryDocument) -> Result<String, TransferError> {
    serde_json::to_string_pretty(document).map_err(TransferError::Encode)
}

/// `inventory-backup-<ISO 8601 timestamp>.json`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!(
        "inventory-backup-{}.json",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Parse a user-supplied backup.
///
/// Both `products` and `columns` must be present and truthy before the
/// document is decoded; nothing else about the shape is checked up front.
pub fn parse_import(text: &str) -> Result<InventoryDocument, TransferError> {
    let value: Value = serde_json::from_str(text).map_err(TransferError::InvalidJson)?;

    for key in ["products", "columns"] {
        if !value.get(key).is_some_and(is_truthy) {
            return Err(TransferError::MissingField(key));
        }
    }

    serde_json::from_value(value).map_err(TransferError::Malformed)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
