//! casegrid - editable-grid state engine
//!
//! The state behind a spreadsheet-like table editor, compiled for the web via
//! WebAssembly or used natively:
//! - Snapshot undo/redo with no-op suppression
//! - Tab / Shift+Tab / Enter navigation that appends rows past the end
//! - Cell edits with dependent-field resets and per-row read-only rules
//! - Changed/saved cell highlights
//! - Save protocol producing an append-only history log
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridEdit } from 'casegrid';
//! await init();
//! const grid = new GridEdit(columnsJson, rowsJson, '{"idPrefix": "SCO."}');
//! grid.editCell(0, 'system', 'OMS');
//! const effects = JSON.parse(grid.onKeyDown(0, 'system', 'Tab', false));
//! grid.save('qa');
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use casegrid::{ColumnDescriptor, GridConfig, GridEditor, Row};
//!
//! let columns = vec![
//!     ColumnDescriptor::new("id", "ID").editable(false),
//!     ColumnDescriptor::new("title", "Title"),
//! ];
//! let rows = vec![Row::new().with("id", "ROW.00001").with("title", "")];
//! let mut grid = GridEditor::new(columns, rows, GridConfig::default());
//! assert!(grid.edit_cell(0, "title", "first").is_change());
//! assert!(grid.can_undo());
//! ```

pub mod bindings;
pub mod commit;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod navigation;
pub mod replay;
pub mod schema;
pub mod storage;
pub mod tracking;
pub mod types;

use wasm_bindgen::prelude::*;

// Re-export the main editor types
pub use bindings::GridEdit;
pub use commit::{HistoryLog, SaveOutcome};
pub use config::GridConfig;
pub use editor::{EditOutcome, GridEditor, GridEffect, GridListener, RowFactory, SequentialIds};
pub use error::GridError;
pub use history::HistoryStack;

pub use types::*;

/// Replay a JSON session script and return the final state as JSON
///
/// # Arguments
/// * `session_json` - Columns, rows, config and steps; see [`replay::Session`]
///
/// # Errors
/// Returns an error if the session is malformed or a step fails.
#[wasm_bindgen]
pub fn replay_session(session_json: &str) -> Result<String, JsValue> {
    let report = replay::Session::from_json(session_json)
        .and_then(|session| session.replay())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&report)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
