//! Turning pending operations into history log entries on save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tracking::CellHighlights;
use crate::types::{
    CellKey, CellRecord, ColumnDescriptor, HistoryAction, HistoryEntry, PendingChanges,
    PendingEdit, Row,
};

/// Append-only history log, newest entry first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    /// Maximum number of entries kept; older ones fall off the end.
    retention: Option<usize>,
    next_id: u64,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Option<usize>) -> Self {
        Self {
            retention,
            ..Self::default()
        }
    }

    /// Rebuild a log from persisted entries (assumed newest first).
    pub fn from_entries(entries: Vec<HistoryEntry>, retention: Option<usize>) -> Self {
        let next_id = entries
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(1, |id| id.saturating_add(1));
        let mut log = Self {
            entries,
            retention,
            next_id,
        };
        log.truncate();
        log
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand out the next entry id.
    fn allocate_id(&mut self) -> u64 {
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Put `batch` in front of the existing entries, keeping its order.
    pub fn prepend(&mut self, batch: Vec<HistoryEntry>) {
        let older = std::mem::replace(&mut self.entries, batch);
        self.entries.extend(older);
        self.truncate();
    }

    fn truncate(&mut self) {
        if let Some(limit) = self.retention {
            self.entries.truncate(limit);
        }
    }
}

/// Who is saving and when.
#[derive(Debug, Clone, Copy)]
pub struct CommitContext<'a> {
    pub actor: &'a str,
    pub now: DateTime<Utc>,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    /// Entries added to the log by this commit, in log order.
    pub entries: Vec<HistoryEntry>,
    /// Rows that passed the save filter.
    pub saved_rows: Vec<Row>,
}

/// Outcome of a save attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SaveOutcome {
    Saved(CommitSummary),
    /// The save filter left no rows; nothing was committed.
    NothingToSave,
}

/// Keep the last recorded edit for each `(item, column)` pair.
///
/// Pairs come out in order of first appearance. The surviving edit is taken
/// verbatim, so its old value is the one from the last edit, not the first.
pub fn dedup_edits(edits: &[PendingEdit]) -> Vec<&PendingEdit> {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut last: HashMap<(&str, &str), &PendingEdit> = HashMap::new();
    for edit in edits {
        let pair = (edit.item_id.as_str(), edit.column_key.as_str());
        if last.insert(pair, edit).is_none() {
            order.push(pair);
        }
    }
    order
        .into_iter()
        .filter_map(|pair| last.get(&pair).copied())
        .collect()
}

/// Description used for delete entries.
pub fn delete_description(ids: &[String]) -> String {
    match ids {
        [single] => format!("Deleted {single}"),
        _ => format!("Deleted {} items: {}", ids.len(), ids.join(", ")),
    }
}

/// Build log entries for everything in `pending`: adds, then edits, then deletes.
pub fn build_entries(
    pending: &PendingChanges,
    log: &mut HistoryLog,
    ctx: CommitContext<'_>,
) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    let entry = |log: &mut HistoryLog,
                 action: HistoryAction,
                 description: String,
                 cell: Option<CellRecord>| HistoryEntry {
        id: log.allocate_id(),
        user: ctx.actor.to_string(),
        timestamp: ctx.now,
        action,
        description,
        cell,
    };

    for id in &pending.added {
        entries.push(entry(log, HistoryAction::Add, format!("Added {id}"), None));
    }

    for edit in dedup_edits(&pending.edited) {
        let cell = CellRecord {
            row: edit.row,
            item_id: edit.item_id.clone(),
            column: edit.column.clone(),
            old_value: edit.old_value.clone(),
            new_value: edit.new_value.clone(),
        };
        entries.push(entry(
            log,
            HistoryAction::Edit,
            format!("Updated {} in {}", edit.column, edit.item_id),
            Some(cell),
        ));
    }

    if !pending.deleted.is_empty() {
        entries.push(entry(
            log,
            HistoryAction::Delete,
            delete_description(&pending.deleted),
            None,
        ));
    }

    entries
}

/// Everything a commit reads and writes.
pub struct CommitInput<'a> {
    pub rows: &'a [Row],
    pub columns: &'a [ColumnDescriptor],
    pub id_field: &'a str,
    /// Save filter; rows failing it are not saved.
    pub keep: &'a dyn Fn(&Row) -> bool,
}

/// The part of `pending` still reflected in `input.rows`.
///
/// Undo and redo move the table without touching the buffer, so at save time
/// an added id may be gone again, a deleted id may be back, and an edited
/// cell may no longer hold the value that was recorded. Those records are
/// dropped; edits are kept in their original order.
pub fn live_changes(pending: &PendingChanges, input: &CommitInput<'_>) -> PendingChanges {
    let find = |id: &str| input.rows.iter().find(|row| row.get(input.id_field) == id);
    let holds_new_value = |edit: &PendingEdit| {
        let field = input
            .columns
            .iter()
            .find(|c| c.key == edit.column_key)
            .map_or(edit.column_key.as_str(), |c| c.data_index.as_str());
        find(edit.item_id.as_str()).is_some_and(|row| row.get(field) == edit.new_value)
    };

    let live = PendingChanges {
        added: pending
            .added
            .iter()
            .filter(|id| find(id.as_str()).is_some())
            .cloned()
            .collect(),
        edited: pending
            .edited
            .iter()
            .filter(|edit| holds_new_value(edit))
            .cloned()
            .collect(),
        deleted: pending
            .deleted
            .iter()
            .filter(|id| find(id.as_str()).is_none())
            .cloned()
            .collect(),
    };
    if live != *pending {
        let count = |p: &PendingChanges| p.added.len() + p.edited.len() + p.deleted.len();
        log::debug!(
            "commit: dropped {} pending records no longer reflected in the table",
            count(pending).saturating_sub(count(&live))
        );
    }
    live
}

/// Flush `pending` into `log` and update the highlight sets.
///
/// When the save filter leaves no rows, nothing is touched and
/// [`SaveOutcome::NothingToSave`] is returned.
pub fn commit(
    input: &CommitInput<'_>,
    pending: &mut PendingChanges,
    highlights: &mut CellHighlights,
    log: &mut HistoryLog,
    ctx: CommitContext<'_>,
) -> SaveOutcome {
    let saved_rows: Vec<Row> = input
        .rows
        .iter()
        .filter(|row| (input.keep)(row))
        .cloned()
        .collect();
    if saved_rows.is_empty() {
        log::debug!("commit: nothing to save");
        return SaveOutcome::NothingToSave;
    }

    let live = live_changes(pending, input);
    let entries = build_entries(&live, log, ctx);
    log.prepend(entries.clone());

    let mut saved = std::mem::take(&mut highlights.changed);
    for (index, row) in input.rows.iter().enumerate() {
        let id = row.get(input.id_field);
        if live.added.iter().any(|added| added == id) {
            saved.extend(input.columns.iter().map(|c| CellKey::new(index, c.key.clone())));
        }
    }
    highlights.changed = saved;
    highlights.promote_changed();

    log::debug!(
        "commit: {} entries, {} rows saved by {}",
        entries.len(),
        saved_rows.len(),
        ctx.actor
    );
    pending.clear();

    SaveOutcome::Saved(CommitSummary {
        entries,
        saved_rows,
    })
}
