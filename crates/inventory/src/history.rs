use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, HistoryId};

/// Kind of activity recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
    Import,
    Export,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Create => "create",
            HistoryAction::Update => "update",
            HistoryAction::Delete => "delete",
            HistoryAction::Import => "import",
            HistoryAction::Export => "export",
        }
    }
}

impl core::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An activity log record. The log is kept newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub action: HistoryAction,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

impl Entity for HistoryEntry {
    type Id = HistoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A history entry before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDraft {
    pub action: HistoryAction,
    pub description: String,
    pub user: String,
}

impl HistoryDraft {
    pub fn new(action: HistoryAction, description: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            action,
            description: description.into(),
            user: user.into(),
        }
    }
}
