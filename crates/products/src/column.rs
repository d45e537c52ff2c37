use core::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ColumnId, DomainError, Entity};

use crate::field::FieldValue;

/// Width used when a width input cannot be parsed.
pub const DEFAULT_COLUMN_WIDTH: u32 = 100;

/// How a column's values are rendered and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Image,
    Date,
    Datetime,
    Email,
    Phone,
    Url,
    Color,
    Checkbox,
    Select,
    Rating,
    Currency,
    Percentage,
    Tags,
}

impl ColumnType {
    pub const ALL: [ColumnType; 15] = [
        ColumnType::Text,
        ColumnType::Number,
        ColumnType::Image,
        ColumnType::Date,
        ColumnType::Datetime,
        ColumnType::Email,
        ColumnType::Phone,
        ColumnType::Url,
        ColumnType::Color,
        ColumnType::Checkbox,
        ColumnType::Select,
        ColumnType::Rating,
        ColumnType::Currency,
        ColumnType::Percentage,
        ColumnType::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Image => "image",
            ColumnType::Date => "date",
            ColumnType::Datetime => "datetime",
            ColumnType::Email => "email",
            ColumnType::Phone => "phone",
            ColumnType::Url => "url",
            ColumnType::Color => "color",
            ColumnType::Checkbox => "checkbox",
            ColumnType::Select => "select",
            ColumnType::Rating => "rating",
            ColumnType::Currency => "currency",
            ColumnType::Percentage => "percentage",
            ColumnType::Tags => "tags",
        }
    }

    /// Kinds whose values are numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Number | ColumnType::Rating | ColumnType::Currency | ColumnType::Percentage
        )
    }

    /// Kinds that draw their values from `Column::options`.
    pub fn uses_options(&self) -> bool {
        matches!(self, ColumnType::Select | ColumnType::Tags)
    }
}

impl core::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown column type: {s}")))
    }
}

/// A configurable field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub width: u32,
    pub visible: bool,
    /// System columns can be hidden but never removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Entity for Column {
    type Id = ColumnId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Column {
    pub fn from_draft(id: ColumnId, draft: ColumnDraft) -> Self {
        Self {
            id,
            label: draft.label,
            kind: draft.kind,
            width: draft.width,
            visible: draft.visible,
            system: draft.system,
            options: draft.options,
        }
    }

    pub fn is_system(&self) -> bool {
        self.system.unwrap_or(false)
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Merge a partial update into this column.
    pub fn apply_patch(&mut self, patch: ColumnPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(system) = patch.system {
            self.system = Some(system);
        }
        if let Some(options) = patch.options {
            self.options = Some(options);
        }
    }

    /// Parse a width typed by a user.
    ///
    /// Takes the leading integer of the input (`"150px"` → 150). Empty,
    /// unparseable, zero and negative inputs yield [`DEFAULT_COLUMN_WIDTH`].
    pub fn parse_width(input: &str) -> u32 {
        let trimmed = input.trim_start();
        let digits_end = trimmed
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '+')))
            .map_or(trimmed.len(), |(i, _)| i);

        match trimmed[..digits_end].parse::<u32>() {
            Ok(0) | Err(_) => DEFAULT_COLUMN_WIDTH,
            Ok(width) => width,
        }
    }

    /// Interpret a stored value according to this column's kind.
    ///
    /// Values are never rejected on write, so anything that does not fit the
    /// column comes back as [`Cell::Mismatch`].
    pub fn interpret<'a>(&self, value: Option<&'a FieldValue>) -> Cell<'a> {
        let value = match value {
            None | Some(FieldValue::Null) => return Cell::Empty,
            Some(v) => v,
        };

        match self.kind {
            ColumnType::Text
            | ColumnType::Image
            | ColumnType::Email
            | ColumnType::Phone
            | ColumnType::Url
            | ColumnType::Color => match value {
                FieldValue::Text(s) => Cell::Text(s),
                _ => Cell::Mismatch(value),
            },
            ColumnType::Number
            | ColumnType::Rating
            | ColumnType::Currency
            | ColumnType::Percentage => match value {
                FieldValue::Number(n) => n.as_f64().map_or(Cell::Mismatch(value), Cell::Number),
                FieldValue::Text(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map_or(Cell::Mismatch(value), Cell::Number),
                _ => Cell::Mismatch(value),
            },
            ColumnType::Checkbox => match value {
                FieldValue::Bool(b) => Cell::Flag(*b),
                FieldValue::Text(s) if s == "true" => Cell::Flag(true),
                FieldValue::Text(s) if s == "false" => Cell::Flag(false),
                _ => Cell::Mismatch(value),
            },
            ColumnType::Select => match value {
                FieldValue::Text(s) if self.options().is_empty() || self.options().contains(s) => {
                    Cell::Choice(s)
                }
                _ => Cell::Mismatch(value),
            },
            ColumnType::Tags => match value {
                FieldValue::List(items) => Cell::Tags(items.iter().map(String::as_str).collect()),
                FieldValue::Text(s) => Cell::Tags(
                    s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect(),
                ),
                _ => Cell::Mismatch(value),
            },
            ColumnType::Date => match value {
                FieldValue::Text(s) => parse_date(s).map_or(Cell::Mismatch(value), Cell::Date),
                _ => Cell::Mismatch(value),
            },
            ColumnType::Datetime => match value {
                FieldValue::Text(s) => {
                    parse_datetime(s).map_or(Cell::Mismatch(value), Cell::DateTime)
                }
                _ => Cell::Mismatch(value),
            },
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // `datetime-local` inputs carry no offset; they are taken as UTC.
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// A stored value read through a column definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Empty,
    Text(&'a str),
    Number(f64),
    Flag(bool),
    Choice(&'a str),
    Tags(Vec<&'a str>),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// The stored value does not fit the column's kind.
    Mismatch(&'a FieldValue),
}

/// A column definition without an id (input to `add_column`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDraft {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub width: u32,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ColumnDraft {
    /// A visible, non-system column of width 150.
    pub fn new(label: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            label: label.into(),
            kind,
            width: 150,
            visible: true,
            system: None,
            options: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn system(mut self) -> Self {
        self.system = Some(true);
        self
    }
}

/// Partial column update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPatch {
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ColumnType>,
    pub width: Option<u32>,
    pub visible: Option<bool>,
    pub system: Option<bool>,
    pub options: Option<Vec<String>>,
}

impl ColumnPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn kind(kind: ColumnType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(kind: ColumnType) -> Column {
        Column::from_draft(ColumnId::from("c"), ColumnDraft::new("C", kind))
    }

    #[test]
    fn serializes_with_type_key_and_omits_absent_flags() {
        let col = column(ColumnType::Currency);
        let json = serde_json::to_value(&col).unwrap();

        assert_eq!(json["type"], "currency");
        assert!(json.get("system").is_none());
        assert!(json.get("options").is_none());
    }

    #[test]
    fn deserializes_the_persisted_shape() {
        let col: Column = serde_json::from_str(
            r#"{"id":"status","label":"Status","type":"select","width":120,"visible":true,
                "options":["In Stock","Low Stock","Out of Stock"]}"#,
        )
        .unwrap();

        assert_eq!(col.kind, ColumnType::Select);
        assert!(!col.is_system());
        assert_eq!(col.options().len(), 3);
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        let err = "textarea".parse::<ColumnType>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!("Tags".parse::<ColumnType>().unwrap(), ColumnType::Tags);
    }

    #[test]
    fn width_parsing_falls_back_to_default() {
        assert_eq!(Column::parse_width("150"), 150);
        assert_eq!(Column::parse_width("150px"), 150);
        assert_eq!(Column::parse_width(""), DEFAULT_COLUMN_WIDTH);
        assert_eq!(Column::parse_width("abc"), DEFAULT_COLUMN_WIDTH);
        assert_eq!(Column::parse_width("0"), DEFAULT_COLUMN_WIDTH);
        assert_eq!(Column::parse_width("-20"), DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut col = column(ColumnType::Text);
        col.apply_patch(ColumnPatch {
            width: Some(300),
            visible: Some(false),
            ..ColumnPatch::default()
        });

        assert_eq!(col.label, "C");
        assert_eq!(col.width, 300);
        assert!(!col.visible);
    }

    #[test]
    fn numeric_columns_accept_numeric_text() {
        let col = column(ColumnType::Currency);
        let stored = FieldValue::from("42.50");
        assert_eq!(col.interpret(Some(&stored)), Cell::Number(42.5));

        let junk = FieldValue::from("n/a");
        assert_eq!(col.interpret(Some(&junk)), Cell::Mismatch(&junk));
    }

    #[test]
    fn changing_kind_does_not_touch_values() {
        let mut col = column(ColumnType::Text);
        let stored = FieldValue::from("Widget");
        assert_eq!(col.interpret(Some(&stored)), Cell::Text("Widget"));

        col.apply_patch(ColumnPatch::kind(ColumnType::Number));
        assert_eq!(col.interpret(Some(&stored)), Cell::Mismatch(&stored));
    }

    #[test]
    fn select_checks_options() {
        let col = Column::from_draft(
            ColumnId::from("status"),
            ColumnDraft::new("Status", ColumnType::Select).with_options(["In Stock", "Low Stock"]),
        );
        let ok = FieldValue::from("Low Stock");
        let bad = FieldValue::from("Discontinued");

        assert_eq!(col.interpret(Some(&ok)), Cell::Choice("Low Stock"));
        assert_eq!(col.interpret(Some(&bad)), Cell::Mismatch(&bad));
    }

    #[test]
    fn tags_accept_lists_and_comma_text() {
        let col = column(ColumnType::Tags);
        let list = FieldValue::from(vec!["Electronics", "Gadgets"]);
        let text = FieldValue::from("Toys, Outdoor ,");

        assert_eq!(col.interpret(Some(&list)), Cell::Tags(vec!["Electronics", "Gadgets"]));
        assert_eq!(col.interpret(Some(&text)), Cell::Tags(vec!["Toys", "Outdoor"]));
    }

    #[test]
    fn dates_and_datetimes_parse_common_inputs() {
        let date_col = column(ColumnType::Date);
        let dt_col = column(ColumnType::Datetime);
        let day = FieldValue::from("2024-03-05");
        let local = FieldValue::from("2024-03-05T14:30");

        assert_eq!(
            date_col.interpret(Some(&day)),
            Cell::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
        match dt_col.interpret(Some(&local)) {
            Cell::DateTime(dt) => assert_eq!(dt.to_rfc3339(), "2024-03-05T14:30:00+00:00"),
            other => panic!("expected DateTime, got {other:?}"),
        }
    }

    #[test]
    fn missing_and_null_values_are_empty() {
        let col = column(ColumnType::Rating);
        assert_eq!(col.interpret(None), Cell::Empty);
        assert_eq!(col.interpret(Some(&FieldValue::Null)), Cell::Empty);
    }
}
