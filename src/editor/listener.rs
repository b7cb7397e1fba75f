//! Notifications from the editor to its host.

use serde::{Deserialize, Serialize};

use crate::types::{CellPos, Row};

/// Callbacks invoked by [`super::GridEditor`] as the table changes.
///
/// Every method defaults to a no-op so hosts implement only what they need.
pub trait GridListener {
    fn on_data_change(&mut self, _rows: &[Row]) {}

    fn on_cell_edit(
        &mut self,
        _row: usize,
        _column_key: &str,
        _old_value: &str,
        _new_value: &str,
        _row_value: &Row,
    ) {
    }

    fn on_row_add(&mut self, _row: &Row) {}

    fn on_row_delete(&mut self, _rows: &[Row]) {}

    fn on_save(&mut self, _rows: &[Row]) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl GridListener for NoopListener {}

/// One step the host must perform, in order, after a navigation request.
///
/// A row append is always reported before the focus move that targets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridEffect {
    /// A row was appended at `index` and committed to the table.
    RowAdded { index: usize },
    /// The row array changed.
    DataChanged,
    /// Move focus and open the editor on this cell.
    Focus { cell: CellPos },
}
