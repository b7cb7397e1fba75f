//! Scripted sessions: a table, a column schema and a list of user actions,
//! replayed against a [`GridEditor`].
//!
//! Used by the `grid_replay` binary and by tests that want to describe a
//! whole interaction as data.
//!
//! ```json
//! {
//!   "config": { "idPrefix": "SCO." },
//!   "columns": [{ "key": "system", "title": "System" }],
//!   "rows": [{ "id": "SCO.00001", "system": "" }],
//!   "steps": [
//!     { "op": "edit", "row": 0, "column": "system", "value": "OMS" },
//!     { "op": "key", "row": 0, "column": "system", "key": "Tab" },
//!     { "op": "save", "actor": "qa" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::commit::SaveOutcome;
use crate::config::GridConfig;
use crate::editor::{EditOutcome, GridEditor, GridEffect};
use crate::error::Result;
use crate::schema::{self, ColumnSpec};
use crate::types::{CellKey, Direction, HistoryEntry, PendingChanges, Row};

/// A recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub config: GridConfig,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    Edit {
        row: usize,
        column: String,
        value: String,
    },
    Navigate {
        row: usize,
        column: String,
        direction: Direction,
    },
    Key {
        row: usize,
        column: String,
        key: String,
        #[serde(default)]
        shift: bool,
    },
    Undo,
    Redo,
    AddRow,
    DeleteRows {
        rows: Vec<usize>,
    },
    Save {
        #[serde(default)]
        actor: Option<String>,
    },
}

/// What a single step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepResult {
    Edit { outcome: EditOutcome },
    Effects { effects: Vec<GridEffect> },
    /// An undo/redo; `applied` is false when there was nothing to restore.
    Restore { applied: bool },
    RowAdded { index: usize },
    Deleted { ids: Vec<String> },
    Save { outcome: SaveOutcome },
}

/// State of the editor after the last step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub results: Vec<StepResult>,
    pub rows: Vec<Row>,
    pub pending: PendingChanges,
    pub changed_cells: Vec<CellKey>,
    pub saved_cells: Vec<CellKey>,
    pub history: Vec<HistoryEntry>,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build an editor for the session's starting state.
    pub fn editor(&self) -> Result<GridEditor> {
        let columns = schema::compile(&self.columns)?;
        Ok(GridEditor::new(
            columns,
            self.rows.clone(),
            self.config.clone(),
        ))
    }

    /// Run every step and describe the final state.
    pub fn replay(&self) -> Result<Report> {
        let mut editor = self.editor()?;
        let mut results = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            results.push(run_step(&mut editor, step)?);
        }
        Ok(Report {
            results,
            rows: editor.rows().to_vec(),
            pending: editor.pending().clone(),
            changed_cells: editor.changed_cells().iter().cloned().collect(),
            saved_cells: editor.saved_cells().iter().cloned().collect(),
            history: editor.history_log().entries().to_vec(),
        })
    }
}

/// Apply one step to `editor`.
pub fn run_step(editor: &mut GridEditor, step: &Step) -> Result<StepResult> {
    let result = match step {
        Step::Edit { row, column, value } => StepResult::Edit {
            outcome: editor.edit_cell(*row, column, value),
        },
        Step::Navigate {
            row,
            column,
            direction,
        } => StepResult::Effects {
            effects: editor.navigate(*row, column, *direction),
        },
        Step::Key {
            row,
            column,
            key,
            shift,
        } => StepResult::Effects {
            effects: editor
                .handle_key(*row, column, key, *shift)
                .unwrap_or_default(),
        },
        Step::Undo => StepResult::Restore {
            applied: editor.undo(),
        },
        Step::Redo => StepResult::Restore {
            applied: editor.redo(),
        },
        Step::AddRow => StepResult::RowAdded {
            index: editor.add_row(),
        },
        Step::DeleteRows { rows } => {
            let id_field = editor.config().id_field.clone();
            let ids = editor
                .delete_rows(rows)
                .iter()
                .map(|r| r.get(&id_field).to_string())
                .collect();
            StepResult::Deleted { ids }
        }
        Step::Save { actor } => StepResult::Save {
            outcome: editor.save(actor.as_deref())?,
        },
    };
    log::debug!("replayed {step:?}");
    Ok(result)
}
