//! `GridEdit` - the JavaScript-facing wrapper around [`GridEditor`].
//!
//! Everything crosses the boundary as JSON strings: columns are declared
//! with [`crate::schema::ColumnSpec`], rows are plain objects, effects and
//! save outcomes come back serialized. The same JSON API is available to
//! native callers (the `grid_replay` CLI drives it directly).

#[cfg(target_arch = "wasm32")]
mod callbacks;

use wasm_bindgen::prelude::*;

use crate::commit::SaveOutcome;
use crate::config::GridConfig;
use crate::editor::GridEditor;
use crate::error::{self, GridError};
use crate::schema;
use crate::types::{Direction, Row};

#[cfg(target_arch = "wasm32")]
use crate::storage::LocalStorage;

/// The editor exported to JavaScript.
#[wasm_bindgen]
pub struct GridEdit {
    editor: GridEditor,
}

/// Parse a JSON array of rows; empty input is an empty table.
fn parse_rows(rows_json: &str) -> error::Result<Vec<Row>> {
    if rows_json.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(rows_json)?)
}

// ============================================================================
// Shared JSON API
// ============================================================================

impl GridEdit {
    /// Build an editor from a column schema, rows and config, all JSON.
    pub fn from_json(columns_json: &str, rows_json: &str, config_json: &str) -> error::Result<Self> {
        let columns = schema::compile(&schema::parse_columns(columns_json)?)?;
        let rows = parse_rows(rows_json)?;
        let config = GridConfig::from_json(config_json)?;
        Ok(Self {
            editor: GridEditor::new(columns, rows, config),
        })
    }

    pub fn from_editor(editor: GridEditor) -> Self {
        Self { editor }
    }

    pub fn editor(&self) -> &GridEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut GridEditor {
        &mut self.editor
    }

    pub fn rows_json(&self) -> error::Result<String> {
        Ok(serde_json::to_string(self.editor.rows())?)
    }

    /// Apply an edit; returns the outcome as JSON.
    pub fn edit_cell_json(&mut self, row: usize, column_key: &str, value: &str) -> error::Result<String> {
        let outcome = self.editor.edit_cell(row, column_key, value);
        Ok(serde_json::to_string(&outcome)?)
    }

    /// Navigate in `direction` (`next`, `prev` or `down`); returns the
    /// ordered effect list as JSON.
    pub fn navigate_json(&mut self, row: usize, column_key: &str, direction: &str) -> error::Result<String> {
        let direction: Direction = direction.parse().map_err(GridError::Other)?;
        let effects = self.editor.navigate(row, column_key, direction);
        Ok(serde_json::to_string(&effects)?)
    }

    /// Keyboard entry point; `None` when the key is not a navigation key.
    pub fn key_down_json(
        &mut self,
        row: usize,
        column_key: &str,
        key: &str,
        shift: bool,
    ) -> error::Result<Option<String>> {
        match self.editor.handle_key(row, column_key, key, shift) {
            Some(effects) => Ok(Some(serde_json::to_string(&effects)?)),
            None => Ok(None),
        }
    }

    pub fn sync_rows_json(&mut self, rows_json: &str) -> error::Result<bool> {
        let rows = parse_rows(rows_json)?;
        Ok(self.editor.sync_rows(rows))
    }

    pub fn replace_rows_json(&mut self, rows_json: &str) -> error::Result<()> {
        let rows = parse_rows(rows_json)?;
        self.editor.replace_rows(rows);
        Ok(())
    }

    pub fn delete_rows_json(&mut self, indices: &[usize]) -> error::Result<String> {
        let removed = self.editor.delete_rows(indices);
        Ok(serde_json::to_string(&removed)?)
    }

    fn outcome_json(outcome: &SaveOutcome) -> error::Result<String> {
        Ok(serde_json::to_string(outcome)?)
    }

    pub fn save_json(&mut self, actor: Option<&str>) -> error::Result<String> {
        let outcome = self.editor.save(actor)?;
        Self::outcome_json(&outcome)
    }

    pub fn finish_save_json(&mut self, actor: Option<&str>) -> error::Result<String> {
        let outcome = self.editor.finish_save(actor)?;
        Self::outcome_json(&outcome)
    }

    pub fn history_json(&self) -> error::Result<String> {
        Ok(serde_json::to_string(self.editor.history_log().entries())?)
    }

    pub fn pending_json(&self) -> error::Result<String> {
        Ok(serde_json::to_string(self.editor.pending())?)
    }

    pub fn changed_cell_keys(&self) -> Vec<String> {
        self.editor
            .changed_cells()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn saved_cell_keys(&self) -> Vec<String> {
        self.editor
            .saved_cells()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

// ============================================================================
// WASM32 exports
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl GridEdit {
    /// Create a new editor from JSON columns, rows and config.
    #[wasm_bindgen(constructor)]
    pub fn js_new(columns_json: &str, rows_json: &str, config_json: &str) -> Result<GridEdit, JsValue> {
        console_error_panic_hook::set_once();
        Ok(Self::from_json(columns_json, rows_json, config_json)?)
    }

    /// Create an editor from rows and history kept in `localStorage`.
    ///
    /// Corrupt or missing data falls back to `default_rows_json`.
    #[wasm_bindgen(js_name = fromLocalStorage)]
    pub fn js_from_local_storage(
        columns_json: &str,
        default_rows_json: &str,
        config_json: &str,
    ) -> Result<GridEdit, JsValue> {
        console_error_panic_hook::set_once();
        let columns = schema::compile(&schema::parse_columns(columns_json)?)?;
        let defaults = parse_rows(default_rows_json)?;
        let config = GridConfig::from_json(config_json)?;
        let store = LocalStorage::new()?;
        Ok(Self::from_editor(GridEditor::restore(
            columns, &store, defaults, config,
        )))
    }

    /// Write rows and history to `localStorage`.
    #[wasm_bindgen(js_name = persist)]
    pub fn js_persist(&self) -> Result<(), JsValue> {
        let store = LocalStorage::new()?;
        Ok(self.editor.persist(&store)?)
    }

    /// Register host callbacks. Each receives JSON strings.
    #[wasm_bindgen(js_name = setCallbacks)]
    pub fn js_set_callbacks(
        &mut self,
        on_data_change: Option<js_sys::Function>,
        on_cell_edit: Option<js_sys::Function>,
        on_row_add: Option<js_sys::Function>,
        on_row_delete: Option<js_sys::Function>,
        on_save: Option<js_sys::Function>,
    ) {
        self.editor.set_listener(Box::new(callbacks::JsListener {
            on_data_change,
            on_cell_edit,
            on_row_add,
            on_row_delete,
            on_save,
        }));
    }

    #[wasm_bindgen(js_name = rows)]
    pub fn js_rows(&self) -> Result<String, JsValue> {
        Ok(self.rows_json()?)
    }

    #[wasm_bindgen(js_name = editCell)]
    pub fn js_edit_cell(&mut self, row: usize, column_key: &str, value: &str) -> Result<String, JsValue> {
        Ok(self.edit_cell_json(row, column_key, value)?)
    }

    #[wasm_bindgen(js_name = navigate)]
    pub fn js_navigate(&mut self, row: usize, column_key: &str, direction: &str) -> Result<String, JsValue> {
        Ok(self.navigate_json(row, column_key, direction)?)
    }

    /// Handle Tab / Shift+Tab / Enter. Returns `undefined` for other keys.
    #[wasm_bindgen(js_name = onKeyDown)]
    pub fn js_on_key_down(
        &mut self,
        row: usize,
        column_key: &str,
        key: &str,
        shift: bool,
    ) -> Result<Option<String>, JsValue> {
        Ok(self.key_down_json(row, column_key, key, shift)?)
    }

    #[wasm_bindgen(js_name = addRow)]
    pub fn js_add_row(&mut self) -> usize {
        self.editor.add_row()
    }

    #[wasm_bindgen(js_name = deleteRows)]
    pub fn js_delete_rows(&mut self, indices: Vec<u32>) -> Result<String, JsValue> {
        let indices: Vec<usize> = indices
            .into_iter()
            .filter_map(|i| usize::try_from(i).ok())
            .collect();
        Ok(self.delete_rows_json(&indices)?)
    }

    #[wasm_bindgen(js_name = undo)]
    pub fn js_undo(&mut self) -> bool {
        self.editor.undo()
    }

    #[wasm_bindgen(js_name = redo)]
    pub fn js_redo(&mut self) -> bool {
        self.editor.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn js_can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn js_can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    /// Feed rows back after `onDataChange` (absorbed once after undo/redo).
    #[wasm_bindgen(js_name = syncRows)]
    pub fn js_sync_rows(&mut self, rows_json: &str) -> Result<bool, JsValue> {
        Ok(self.sync_rows_json(rows_json)?)
    }

    #[wasm_bindgen(js_name = replaceRows)]
    pub fn js_replace_rows(&mut self, rows_json: &str) -> Result<(), JsValue> {
        Ok(self.replace_rows_json(rows_json)?)
    }

    #[wasm_bindgen(js_name = beginSave)]
    pub fn js_begin_save(&mut self) -> Result<(), JsValue> {
        Ok(self.editor.begin_save()?)
    }

    #[wasm_bindgen(js_name = finishSave)]
    pub fn js_finish_save(&mut self, actor: Option<String>) -> Result<String, JsValue> {
        Ok(self.finish_save_json(actor.as_deref())?)
    }

    #[wasm_bindgen(js_name = cancelSave)]
    pub fn js_cancel_save(&mut self) {
        self.editor.cancel_save();
    }

    #[wasm_bindgen(js_name = save)]
    pub fn js_save(&mut self, actor: Option<String>) -> Result<String, JsValue> {
        Ok(self.save_json(actor.as_deref())?)
    }

    #[wasm_bindgen(js_name = isSaving)]
    pub fn js_is_saving(&self) -> bool {
        self.editor.is_saving()
    }

    #[wasm_bindgen(js_name = history)]
    pub fn js_history(&self) -> Result<String, JsValue> {
        Ok(self.history_json()?)
    }

    #[wasm_bindgen(js_name = pending)]
    pub fn js_pending(&self) -> Result<String, JsValue> {
        Ok(self.pending_json()?)
    }

    #[wasm_bindgen(js_name = changedCells)]
    pub fn js_changed_cells(&self) -> Vec<String> {
        self.changed_cell_keys()
    }

    #[wasm_bindgen(js_name = savedCells)]
    pub fn js_saved_cells(&self) -> Vec<String> {
        self.saved_cell_keys()
    }

    #[wasm_bindgen(js_name = cellOptions)]
    pub fn js_cell_options(&self, row: usize, column_key: &str) -> Vec<String> {
        self.editor.cell_options(row, column_key)
    }

    #[wasm_bindgen(js_name = isCellEditable)]
    pub fn js_is_cell_editable(&self, row: usize, column_key: &str) -> bool {
        self.editor.is_cell_editable(row, column_key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const COLUMNS: &str = r#"[
        {"key": "id", "title": "ID", "editable": false},
        {"key": "title", "title": "Title"}
    ]"#;

    #[test]
    fn test_json_roundtrip_through_wrapper() {
        let mut grid = GridEdit::from_json(
            COLUMNS,
            r#"[{"id": "TC.00001", "title": ""}]"#,
            r#"{"idPrefix": "TC."}"#,
        )
        .unwrap();

        let outcome = grid.edit_cell_json(0, "title", "Login works").unwrap();
        assert_eq!(outcome, r#"{"status":"applied","changed":true}"#);
        assert_eq!(grid.changed_cell_keys(), vec!["0-title"]);

        let effects = grid.navigate_json(0, "title", "next").unwrap();
        let effects: serde_json::Value = serde_json::from_str(&effects).unwrap();
        assert_eq!(effects[0]["type"], "rowAdded");
        assert_eq!(effects[2]["cell"]["column"], "title");

        let saved: serde_json::Value = serde_json::from_str(&grid.save_json(Some("qa")).unwrap()).unwrap();
        assert_eq!(saved["status"], "saved");
        assert!(grid.changed_cell_keys().is_empty());
    }

    #[test]
    fn test_bad_direction_is_an_error() {
        let mut grid = GridEdit::from_json(COLUMNS, "", "").unwrap();
        assert!(grid.navigate_json(0, "title", "up").is_err());
        assert_eq!(grid.key_down_json(0, "title", "a", false).unwrap(), None);
    }
}
