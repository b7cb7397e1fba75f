//! Tests for the JSON-facing surfaces: the `GridEdit` wrapper, column
//! schemas and session replay.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use casegrid::replay::{Session, Step, StepResult};
use casegrid::schema;
use casegrid::{GridEdit, GridError};
use fixtures::{scope_column_specs, SCOPE_COLUMNS_JSON};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const ROWS: &str = r#"[
    {"id": "SCO.00001", "system": "", "component": "", "description": ""}
]"#;

fn grid() -> GridEdit {
    GridEdit::from_json(SCOPE_COLUMNS_JSON, ROWS, r#"{"idPrefix": "SCO.", "actor": "web"}"#)
        .unwrap()
}

#[test]
fn test_schema_matches_builder_columns() {
    let compiled = schema::compile(&scope_column_specs()).unwrap();
    let built = fixtures::scope_columns();
    let keys = |cols: &[casegrid::ColumnDescriptor]| -> Vec<String> {
        cols.iter().map(|c| c.key.clone()).collect()
    };
    assert_eq!(keys(&compiled), keys(&built));
    for (a, b) in compiled.iter().zip(&built) {
        assert_eq!(a.editable, b.editable);
        assert_eq!(a.kind, b.kind);
    }
}

#[test]
fn test_bad_schema_is_rejected() {
    let result = GridEdit::from_json(r#"[{"key": "a"}]"#, "[]", "");
    assert!(matches!(result, Err(GridError::Json(_))));

    let result = GridEdit::from_json(
        r#"[{"key": "a", "title": "A", "readOnly": {"whenEmpty": "b"}}]"#,
        "[]",
        "",
    );
    assert!(matches!(result, Err(GridError::Schema(_))));
}

#[test]
fn test_edit_and_save_through_json() {
    let mut grid = grid();

    let outcome: Value = serde_json::from_str(&grid.edit_cell_json(0, "system", "OMS").unwrap()).unwrap();
    assert_eq!(outcome, json!({"status": "applied", "changed": true}));

    let outcome: Value =
        serde_json::from_str(&grid.edit_cell_json(0, "component", "Nope").unwrap()).unwrap();
    assert_eq!(outcome["status"], "applied");

    let rejected: Value = serde_json::from_str(&grid.edit_cell_json(0, "id", "X").unwrap()).unwrap();
    assert_eq!(rejected, json!({"status": "rejected", "reason": "notEditable"}));

    assert_eq!(grid.changed_cell_keys(), vec!["0-component", "0-system"]);

    let saved: Value = serde_json::from_str(&grid.save_json(None).unwrap()).unwrap();
    assert_eq!(saved["status"], "saved");
    assert_eq!(saved["entries"][0]["user"], "web");

    let history: Value = serde_json::from_str(&grid.history_json().unwrap()).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[0]["action"], "edit");
    assert_eq!(history[0]["cell"]["itemId"], "SCO.00001");
}

#[test]
fn test_key_down_appends_row() {
    let mut grid = grid();
    let effects = grid.key_down_json(0, "description", "Tab", false).unwrap().unwrap();
    let effects: Value = serde_json::from_str(&effects).unwrap();
    assert_eq!(
        effects,
        json!([
            {"type": "rowAdded", "index": 1},
            {"type": "dataChanged"},
            {"type": "focus", "cell": {"row": 1, "column": "system"}}
        ])
    );
    let rows: Value = serde_json::from_str(&grid.rows_json().unwrap()).unwrap();
    assert_eq!(rows[1]["id"], "SCO.00002");

    let pending: Value = serde_json::from_str(&grid.pending_json().unwrap()).unwrap();
    assert_eq!(pending["added"], json!(["SCO.00002"]));
}

#[test]
fn test_sync_echo_after_undo() {
    let mut grid = grid();
    grid.edit_cell_json(0, "description", "x").unwrap();
    assert!(grid.editor_mut().undo());

    let echoed = grid.rows_json().unwrap();
    grid.sync_rows_json(&echoed).unwrap();
    assert!(grid.editor().can_redo());

    let deleted: Value = serde_json::from_str(&grid.delete_rows_json(&[0]).unwrap()).unwrap();
    assert_eq!(deleted[0]["id"], "SCO.00001");
    assert!(grid.editor().rows().is_empty());
}

#[test]
fn test_split_save_through_json() {
    let mut grid = grid();
    grid.editor_mut().begin_save().unwrap();
    grid.edit_cell_json(0, "description", "late").unwrap();
    let saved: Value = serde_json::from_str(&grid.finish_save_json(Some("ops")).unwrap()).unwrap();
    assert_eq!(saved["entries"][0]["description"], "Updated Description in SCO.00001");
    assert_eq!(grid.saved_cell_keys(), vec!["0-description"]);
}

// ============================================================================
// Replay
// ============================================================================

fn session(steps: Value) -> Session {
    let json = json!({
        "config": {"idPrefix": "SCO."},
        "columns": serde_json::from_str::<Value>(SCOPE_COLUMNS_JSON).unwrap(),
        "rows": serde_json::from_str::<Value>(ROWS).unwrap(),
        "steps": steps,
    });
    Session::from_json(&json.to_string()).unwrap()
}

#[test]
fn test_replay_edit_scenario() {
    let session = session(json!([
        {"op": "edit", "row": 0, "column": "system", "value": "OMS"},
        {"op": "edit", "row": 0, "column": "system", "value": "OMS"},
        {"op": "save"}
    ]));
    assert_eq!(session.steps[2], Step::Save { actor: None });

    let report = session.replay().unwrap();
    assert_eq!(report.history.len(), 1);
    assert_eq!(report.history[0].description, "Updated System in SCO.00001");
    assert!(report.changed_cells.is_empty());
    assert_eq!(report.saved_cells, vec![common::key(0, "system")]);
    assert!(report.pending.is_empty());
}

#[test]
fn test_replay_navigation_and_delete() {
    let report = session(json!([
        {"op": "navigate", "row": 0, "column": "description", "direction": "next"},
        {"op": "key", "row": 1, "column": "system", "key": "Tab", "shift": true},
        {"op": "deleteRows", "rows": [0]},
        {"op": "redo"}
    ]))
    .replay()
    .unwrap();

    assert_eq!(common::ids(&report.rows), vec!["SCO.00002"]);
    assert_eq!(
        report.results[2],
        StepResult::Deleted {
            ids: vec!["SCO.00001".to_string()]
        }
    );
    assert_eq!(report.results[3], StepResult::Restore { applied: false });
    assert_eq!(report.pending.deleted, vec!["SCO.00001"]);

    let report_json: Value = serde_json::to_value(&report).unwrap();
    assert_eq!(report_json["results"][1]["kind"], "effects");
    assert_eq!(
        report_json["results"][1]["effects"][0]["cell"],
        json!({"row": 0, "column": "description"})
    );
}

#[test]
fn test_replay_session_entry_point() {
    let json = json!({
        "columns": [{"key": "name", "title": "Name"}],
        "rows": [{"id": "ROW.00001", "name": ""}],
        "steps": [{"op": "addRow"}]
    });
    let out: Value = serde_json::from_str(&casegrid::replay_session(&json.to_string()).unwrap()).unwrap();
    assert_eq!(out["rows"][1]["id"], "ROW.00002");
    assert_eq!(out["results"][0], json!({"kind": "rowAdded", "index": 1}));
}
