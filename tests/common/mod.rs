//! Common assertion helpers for the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use casegrid::{CellKey, CellKeySet, GridEditor, GridEffect, Row};

/// Cell keys rendered the way the host sees them (`"row-column"`).
pub fn keys(set: &CellKeySet) -> Vec<String> {
    set.iter().map(ToString::to_string).collect()
}

pub fn key(row: usize, column: &str) -> CellKey {
    CellKey::new(row, column)
}

/// Value of `field` on row `index`, panicking if the row is missing.
pub fn cell(grid: &GridEditor, index: usize, field: &str) -> String {
    grid.rows()
        .get(index)
        .unwrap_or_else(|| panic!("row {index} missing"))
        .get(field)
        .to_string()
}

pub fn ids(rows: &[Row]) -> Vec<String> {
    rows.iter().map(|r| r.get("id").to_string()).collect()
}

/// The focus target of an effect list, if any.
pub fn focus_of(effects: &[GridEffect]) -> Option<(usize, String)> {
    effects.iter().find_map(|e| match e {
        GridEffect::Focus { cell } => Some((cell.row, cell.column.clone())),
        _ => None,
    })
}

pub fn appended(effects: &[GridEffect]) -> Option<usize> {
    effects.iter().find_map(|e| match e {
        GridEffect::RowAdded { index } => Some(*index),
        _ => None,
    })
}

#[track_caller]
pub fn assert_changed(grid: &GridEditor, expected: &[&str]) {
    pretty_assertions::assert_eq!(keys(grid.changed_cells()), expected);
}

#[track_caller]
pub fn assert_saved(grid: &GridEditor, expected: &[&str]) {
    pretty_assertions::assert_eq!(keys(grid.saved_cells()), expected);
}
