//! Forwarding of editor notifications to JavaScript functions.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::editor::GridListener;
use crate::types::Row;

/// Host callbacks registered through `GridEdit.setCallbacks`.
///
/// Rows are passed as JSON strings. Exceptions thrown by a callback are
/// logged and otherwise ignored.
pub(crate) struct JsListener {
    pub(crate) on_data_change: Option<Function>,
    pub(crate) on_cell_edit: Option<Function>,
    pub(crate) on_row_add: Option<Function>,
    pub(crate) on_row_delete: Option<Function>,
    pub(crate) on_save: Option<Function>,
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json) => JsValue::from_str(&json),
        Err(e) => {
            log::warn!("callback payload not serializable: {e}");
            JsValue::NULL
        }
    }
}

fn invoke(callback: Option<&Function>, name: &str, args: &[JsValue]) {
    let Some(callback) = callback else {
        return;
    };
    let result = match args {
        [] => callback.call0(&JsValue::NULL),
        [a] => callback.call1(&JsValue::NULL, a),
        [a, b] => callback.call2(&JsValue::NULL, a, b),
        [a, b, c] => callback.call3(&JsValue::NULL, a, b, c),
        _ => {
            let array = js_sys::Array::new();
            for arg in args {
                array.push(arg);
            }
            callback.apply(&JsValue::NULL, &array)
        }
    };
    if let Err(e) = result {
        log::warn!("{name} callback threw: {e:?}");
    }
}

impl GridListener for JsListener {
    fn on_data_change(&mut self, rows: &[Row]) {
        invoke(self.on_data_change.as_ref(), "onDataChange", &[to_js(rows)]);
    }

    fn on_cell_edit(
        &mut self,
        row: usize,
        column_key: &str,
        old_value: &str,
        new_value: &str,
        row_value: &Row,
    ) {
        invoke(
            self.on_cell_edit.as_ref(),
            "onCellEdit",
            &[
                JsValue::from_f64(row as f64),
                JsValue::from_str(column_key),
                JsValue::from_str(old_value),
                JsValue::from_str(new_value),
                to_js(row_value),
            ],
        );
    }

    fn on_row_add(&mut self, row: &Row) {
        invoke(self.on_row_add.as_ref(), "onRowAdd", &[to_js(row)]);
    }

    fn on_row_delete(&mut self, rows: &[Row]) {
        invoke(self.on_row_delete.as_ref(), "onRowDelete", &[to_js(rows)]);
    }

    fn on_save(&mut self, rows: &[Row]) {
        invoke(self.on_save.as_ref(), "onSave", &[to_js(rows)]);
    }
}
