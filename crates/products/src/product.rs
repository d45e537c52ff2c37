use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use stockroom_core::{Entity, ProductId};

use crate::field::FieldValue;

/// Dynamic product attributes keyed by column id.
pub type Fields = BTreeMap<String, FieldValue>;

/// Keys owned by the record itself; they never live in [`Fields`].
pub const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// One inventory record.
///
/// Serializes flat: `{"id": .., "createdAt": .., "updatedAt": .., "name": .., ...}`.
///
/// Deserializing is lenient: a missing id reads as empty and a missing or
/// unreadable timestamp reads as the epoch, until [`Product::fill_gaps`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    id: ProductId,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    fields: Fields,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Product {
    /// Create a record stamped at `at`; reserved keys in `fields` are dropped.
    pub fn new(id: ProductId, fields: Fields, at: DateTime<Utc>) -> Self {
        let mut product = Self {
            id,
            created_at: at,
            updated_at: at,
            fields: Fields::new(),
        };
        product.merge(fields);
        product
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Set one attribute. Reserved keys are ignored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.fields.insert(key, value.into());
        }
    }

    /// Shallow-merge attributes into this record.
    pub fn merge(&mut self, patch: Fields) {
        for (key, value) in patch {
            self.set(key, value);
        }
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    /// Give an id and timestamps to a record that was read without them.
    /// Epoch timestamps count as missing.
    pub fn fill_gaps(&mut self, fresh_id: impl FnOnce() -> ProductId, at: DateTime<Utc>) {
        if self.id.as_str().is_empty() {
            self.id = fresh_id();
        }
        if self.created_at == DateTime::<Utc>::default() {
            self.created_at = at;
        }
        if self.updated_at == DateTime::<Utc>::default() {
            self.updated_at = self.created_at;
        }
    }

    /// The product name, or `Unknown` when it is missing or blank.
    pub fn display_name(&self) -> String {
        match self.fields.get("name") {
            Some(name) if name.is_truthy() => name.display(),
            _ => "Unknown".to_string(),
        }
    }

    /// Copy this record under a new id and timestamps, naming it `<name> (Copy)`.
    pub fn duplicate(&self, id: ProductId, at: DateTime<Utc>) -> Self {
        let mut copy = Self {
            id,
            created_at: at,
            updated_at: at,
            fields: self.fields.clone(),
        };
        copy.set("name", format!("{} (Copy)", self.display_name()));
        copy
    }

    /// Every value of the record rendered as text, own keys included.
    pub fn searchable_values(&self) -> impl Iterator<Item = String> + '_ {
        [
            self.id.to_string(),
            self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ]
        .into_iter()
        .chain(self.fields.values().map(FieldValue::display))
    }

    /// Whether any value contains `needle_lower` (already lowercased).
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        self.searchable_values()
            .any(|value| value.to_lowercase().contains(needle_lower))
    }

    /// Field keys not covered by any of `column_ids`.
    pub fn orphaned_fields<'a, I>(&'a self, column_ids: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: Vec<&str> = column_ids.into_iter().collect();
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect()
    }
}

/// RFC 3339 text or epoch milliseconds; anything else reads as the epoch.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let stamp = match Value::deserialize(deserializer)? {
        Value::String(text) => DateTime::parse_from_rfc3339(&text)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default(),
        Value::Number(millis) => millis
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_default(),
        _ => DateTime::default(),
    };
    Ok(stamp)
}
