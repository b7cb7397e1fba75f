use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of operation a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Add,
    Edit,
    Delete,
}

/// Before/after values of an edited cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    /// Row index at the time of the edit
    pub row: usize,
    /// Stable identifier of the edited row
    pub item_id: String,
    /// Column title
    pub column: String,
    pub old_value: String,
    pub new_value: String,
}

/// One immutable record in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellRecord>,
}

/// A single recorded edit waiting for the next save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEdit {
    pub item_id: String,
    pub row: usize,
    /// Column key, used for highlighting and deduplication
    pub column_key: String,
    /// Column title, used in descriptions
    pub column: String,
    pub old_value: String,
    pub new_value: String,
}

/// Add/edit/delete operations accumulated since the last save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChanges {
    pub added: Vec<String>,
    pub edited: Vec<PendingEdit>,
    pub deleted: Vec<String>,
}

impl PendingChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.edited.is_empty() && self.deleted.is_empty()
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.edited.clear();
        self.deleted.clear();
    }
}
