//! Cell editing mutations.
//!
//! Applies one user edit to a row snapshot, running the column's change
//! handler so dependent fields are reset along with it.

use serde::{Deserialize, Serialize};

use crate::types::{column_index, CellKey, ColumnDescriptor, PendingEdit, Row};

/// Why an edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditRejection {
    UnknownColumn,
    RowOutOfRange,
    NotEditable,
    ReadOnly,
}

/// Outcome of an edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EditOutcome {
    /// The edit went through; `changed` is false when the value was already there.
    Applied { changed: bool },
    Rejected { reason: EditRejection },
}

impl EditOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Applied { changed: true })
    }
}

/// The result of applying an edit to a table snapshot.
#[derive(Debug, Clone)]
pub(crate) struct AppliedEdit {
    /// Full row array after the edit.
    pub rows: Vec<Row>,
    pub cell: CellKey,
    pub old_value: String,
    pub new_value: String,
    /// History record, present only when the value changed.
    pub record: Option<PendingEdit>,
}

/// Apply `value` to the cell at `(row_index, column_key)`.
///
/// Rejects edits on unknown columns, missing rows, non-editable columns and
/// cells whose read-only predicate holds for the row.
pub(crate) fn apply_cell_edit(
    rows: &[Row],
    columns: &[ColumnDescriptor],
    id_field: &str,
    row_index: usize,
    column_key: &str,
    value: &str,
) -> std::result::Result<AppliedEdit, EditRejection> {
    let column = column_index(columns, column_key)
        .and_then(|i| columns.get(i))
        .ok_or(EditRejection::UnknownColumn)?;
    let current = rows.get(row_index).ok_or(EditRejection::RowOutOfRange)?;

    if !column.editable {
        return Err(EditRejection::NotEditable);
    }
    if column.read_only.resolve(current) {
        return Err(EditRejection::ReadOnly);
    }

    let old_value = current.get(&column.data_index).to_string();
    let patch = column.patch_for(current, value);

    let mut updated = current.clone();
    updated.apply(&patch);

    let record = (old_value != value).then(|| PendingEdit {
        item_id: updated.get(id_field).to_string(),
        row: row_index,
        column_key: column.key.clone(),
        column: column.title.clone(),
        old_value: old_value.clone(),
        new_value: value.to_string(),
    });

    let mut next_rows = rows.to_vec();
    if let Some(slot) = next_rows.get_mut(row_index) {
        *slot = updated;
    }

    Ok(AppliedEdit {
        rows: next_rows,
        cell: CellKey::new(row_index, column.key.clone()),
        old_value,
        new_value: value.to_string(),
        record,
    })
}
