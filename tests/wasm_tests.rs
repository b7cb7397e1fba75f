//! Browser tests for the exported `GridEdit` class and `localStorage`.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use casegrid::storage::{KvStore, LocalStorage};
use casegrid::GridEdit;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const COLUMNS: &str = r#"[
    {"key": "id", "title": "ID", "editable": false},
    {"key": "title", "title": "Title"}
]"#;

const CONFIG: &str = r#"{"idPrefix": "TC.", "rowsKey": "casegrid.test.rows", "historyKey": "casegrid.test.history"}"#;

#[wasm_bindgen_test]
fn test_persist_and_reload_from_local_storage() {
    let store = LocalStorage::new().unwrap();
    store.remove("casegrid.test.rows").unwrap();
    store.remove("casegrid.test.history").unwrap();

    let defaults = r#"[{"id": "TC.00001", "title": ""}]"#;
    let mut grid = GridEdit::js_from_local_storage(COLUMNS, defaults, CONFIG).unwrap();
    grid.js_edit_cell(0, "title", "stored").unwrap();
    grid.js_save(None).unwrap();
    grid.js_persist().unwrap();

    let reloaded = GridEdit::js_from_local_storage(COLUMNS, "[]", CONFIG).unwrap();
    assert!(reloaded.js_rows().unwrap().contains("stored"));
    assert!(reloaded.js_history().unwrap().contains("Updated Title in TC.00001"));
}

#[wasm_bindgen_test]
fn test_corrupt_local_storage_uses_defaults() {
    let store = LocalStorage::new().unwrap();
    store.write("casegrid.test.rows", "{oops").unwrap();

    let defaults = r#"[{"id": "TC.00001", "title": "fallback"}]"#;
    let grid = GridEdit::js_from_local_storage(COLUMNS, defaults, CONFIG).unwrap();
    assert!(grid.js_rows().unwrap().contains("fallback"));
}
