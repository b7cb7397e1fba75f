//! Keyboard traversal across the editable cells of a table.
//!
//! Planning is pure: it inspects rows and columns and says where focus
//! should go. Applying the plan (appending a row, moving focus) is the
//! editor's job, which lets it commit a new row before resolving the focus
//! target against the updated row count.

use crate::types::{column_index, CellPos, ColumnDescriptor, Direction, Row};

/// Where a navigation step should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// Focus an existing cell.
    Focus(CellPos),
    /// Append a row and focus its first editable cell.
    AppendRow,
    /// Nothing to do.
    Stay,
}

/// Whether the cell at `(row, col)` can take focus for editing.
fn is_eligible(rows: &[Row], columns: &[ColumnDescriptor], row: usize, col: usize) -> bool {
    match (rows.get(row), columns.get(col)) {
        (Some(r), Some(c)) => c.is_editable_for(r),
        _ => false,
    }
}

/// First column on `row` that accepts edits.
pub fn first_editable<'a>(columns: &'a [ColumnDescriptor], row: &Row) -> Option<&'a ColumnDescriptor> {
    columns.iter().find(|c| c.is_editable_for(row))
}

/// Plan one navigation step from `(row, column_key)`.
pub fn plan(
    rows: &[Row],
    columns: &[ColumnDescriptor],
    row: usize,
    column_key: &str,
    direction: Direction,
) -> NavTarget {
    let Some(col) = column_index(columns, column_key) else {
        log::debug!("navigate: unknown column {column_key}");
        return NavTarget::Stay;
    };
    if row >= rows.len() {
        log::debug!("navigate: row {row} out of range");
        return NavTarget::Stay;
    }

    match direction {
        Direction::Next => plan_next(rows, columns, row, col),
        Direction::Prev => plan_prev(rows, columns, row, col),
        Direction::Down => plan_down(rows, columns, row, col),
    }
}

fn focus(columns: &[ColumnDescriptor], row: usize, col: usize) -> NavTarget {
    match columns.get(col) {
        Some(c) => NavTarget::Focus(CellPos::new(row, c.key.clone())),
        None => NavTarget::Stay,
    }
}

fn plan_next(rows: &[Row], columns: &[ColumnDescriptor], row: usize, col: usize) -> NavTarget {
    let width = columns.len();
    let end = rows.len() * width;
    let start = row * width + col + 1;
    for pos in start..end {
        let (r, c) = (pos / width, pos % width);
        if is_eligible(rows, columns, r, c) {
            return focus(columns, r, c);
        }
    }
    // A schema with no editable column would append rows forever.
    if columns.iter().any(|c| c.editable) {
        NavTarget::AppendRow
    } else {
        NavTarget::Stay
    }
}

fn plan_prev(rows: &[Row], columns: &[ColumnDescriptor], row: usize, col: usize) -> NavTarget {
    let width = columns.len();
    let current = row * width + col;
    for pos in (0..current).rev() {
        let (r, c) = (pos / width, pos % width);
        if is_eligible(rows, columns, r, c) {
            return focus(columns, r, c);
        }
    }
    NavTarget::Stay
}

fn plan_down(rows: &[Row], columns: &[ColumnDescriptor], row: usize, col: usize) -> NavTarget {
    let below = row + 1;
    let Some(next_row) = rows.get(below) else {
        return NavTarget::Stay;
    };
    if is_eligible(rows, columns, below, col) {
        return focus(columns, below, col);
    }
    match first_editable(columns, next_row) {
        Some(c) => NavTarget::Focus(CellPos::new(below, c.key.clone())),
        None => NavTarget::Stay,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "ID").editable(false),
            ColumnDescriptor::new("system", "System"),
            ColumnDescriptor::new("component", "Component")
                .read_only_when(|row| row.get("system").is_empty()),
            ColumnDescriptor::new("notes", "Notes"),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("id", "SCO.00001").with("system", "OMS"),
            Row::new().with("id", "SCO.00002"),
        ]
    }

    #[test]
    fn test_next_skips_read_only_for_that_row() {
        let t = plan(&rows(), &columns(), 1, "system", Direction::Next);
        assert_eq!(t, NavTarget::Focus(CellPos::new(1, "notes")));
    }

    #[test]
    fn test_next_wraps_past_non_editable_id() {
        let t = plan(&rows(), &columns(), 0, "notes", Direction::Next);
        assert_eq!(t, NavTarget::Focus(CellPos::new(1, "system")));
    }

    #[test]
    fn test_next_at_end_appends() {
        let t = plan(&rows(), &columns(), 1, "notes", Direction::Next);
        assert_eq!(t, NavTarget::AppendRow);
    }

    #[test]
    fn test_prev_at_start_stays() {
        let t = plan(&rows(), &columns(), 0, "system", Direction::Prev);
        assert_eq!(t, NavTarget::Stay);
    }

    #[test]
    fn test_down_falls_back_to_first_eligible() {
        let t = plan(&rows(), &columns(), 0, "component", Direction::Down);
        assert_eq!(t, NavTarget::Focus(CellPos::new(1, "system")));
        let t = plan(&rows(), &columns(), 1, "system", Direction::Down);
        assert_eq!(t, NavTarget::Stay);
    }

    #[test]
    fn test_no_editable_columns_never_appends() {
        let cols = vec![ColumnDescriptor::new("id", "ID").editable(false)];
        let t = plan(&rows(), &cols, 1, "id", Direction::Next);
        assert_eq!(t, NavTarget::Stay);
    }
}
