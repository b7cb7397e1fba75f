//! Cell-level diffing between two snapshots of a table.

use crate::types::{CellKey, CellKeySet, Row};

/// Cells whose value differs between `old_rows` and `new_rows`.
///
/// Rows are compared positionally, so both snapshots must have the same
/// length; insertions and deletions are tracked separately by the caller.
/// Mismatched lengths yield an empty set.
pub fn diff_cells<S: AsRef<str>>(new_rows: &[Row], old_rows: &[Row], fields: &[S]) -> CellKeySet {
    let mut changed = CellKeySet::new();
    if new_rows.len() != old_rows.len() {
        log::debug!(
            "diff_cells: length mismatch ({} vs {}), skipping",
            new_rows.len(),
            old_rows.len()
        );
        return changed;
    }
    for (index, (new_row, old_row)) in new_rows.iter().zip(old_rows).enumerate() {
        for field in fields {
            let field = field.as_ref();
            if new_row.get(field) != old_row.get(field) {
                changed.insert(CellKey::new(index, field));
            }
        }
    }
    changed
}

/// Transient and cumulative highlight sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellHighlights {
    /// Cells edited since the last save.
    pub changed: CellKeySet,
    /// Every cell that has been part of a save.
    pub saved: CellKeySet,
    /// Upper bound on `saved`; `None` keeps it unbounded.
    pub saved_limit: Option<usize>,
}

impl CellHighlights {
    pub fn with_saved_limit(limit: Option<usize>) -> Self {
        Self {
            saved_limit: limit,
            ..Self::default()
        }
    }

    pub fn is_changed(&self, key: &CellKey) -> bool {
        self.changed.contains(key)
    }

    pub fn is_saved(&self, key: &CellKey) -> bool {
        self.saved.contains(key)
    }

    /// Move every changed cell into the saved set and clear `changed`.
    pub fn promote_changed(&mut self) {
        let changed = std::mem::take(&mut self.changed);
        self.saved.extend(changed);
        self.enforce_limit();
    }

    /// Keep `saved` within `saved_limit` by dropping the lowest keys.
    fn enforce_limit(&mut self) {
        let Some(limit) = self.saved_limit else {
            return;
        };
        while self.saved.len() > limit {
            if self.saved.pop_first().is_none() {
                break;
            }
        }
    }

    /// Forget all highlighting (a new data set was loaded).
    pub fn clear(&mut self) {
        self.changed.clear();
        self.saved.clear();
    }
}
