//! The grid editor: one owner for table state, edits, navigation and saves.
//!
//! `GridEditor` wraps the pure building blocks of this crate:
//! - Undo/redo over row snapshots ([`HistoryStack`])
//! - Cell edits with dependent-field resets ([`mutation`])
//! - Keyboard traversal with append-on-tab ([`crate::navigation`])
//! - Pending-change tracking and the save/commit protocol ([`crate::commit`])
//!
//! Presentation layers hold a `GridEditor` and forward input to it; the
//! editor is the single source of truth for the current rows.

mod factory;
mod listener;
pub mod mutation;

use chrono::Utc;

use crate::commit::{self, CommitContext, CommitInput, HistoryLog, SaveOutcome};
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::history::HistoryStack;
use crate::navigation::{self, NavTarget};
use crate::storage::{self, KvStore};
use crate::tracking::{diff_cells, CellHighlights};
use crate::types::{
    column_index, shift_after_delete, CellKey, CellKeySet, CellPos, ColumnDescriptor, Direction,
    PendingChanges, Row,
};

pub use factory::{RowFactory, SequentialIds};
pub use listener::{GridEffect, GridListener, NoopListener};
pub use mutation::{EditOutcome, EditRejection};

/// Editable table state plus everything needed to save it.
pub struct GridEditor {
    config: GridConfig,
    columns: Vec<ColumnDescriptor>,
    table: HistoryStack<Vec<Row>>,
    factory: Box<dyn RowFactory>,
    listener: Box<dyn GridListener>,
    save_filter: Box<dyn Fn(&Row) -> bool>,
    pending: PendingChanges,
    highlights: CellHighlights,
    log: HistoryLog,
    focus: Option<CellPos>,
    save_in_flight: bool,
}

impl GridEditor {
    /// Create an editor over `rows`.
    ///
    /// New rows get sequential ids from `config` with every column's field
    /// present and empty. Every row passes the save filter.
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Row>, config: GridConfig) -> Self {
        let mut fields: Vec<String> = vec![config.id_field.clone()];
        for column in &columns {
            if !fields.contains(&column.data_index) {
                fields.push(column.data_index.clone());
            }
        }
        let factory = SequentialIds::new(&config.id_field, &config.id_prefix, config.id_width)
            .with_fields(&fields);
        let table = match config.undo_limit {
            Some(limit) => HistoryStack::with_limit(rows, limit),
            None => HistoryStack::new(rows),
        };
        Self {
            highlights: CellHighlights::with_saved_limit(config.saved_cells_limit),
            log: HistoryLog::with_retention(config.history_retention),
            columns,
            table,
            factory: Box::new(factory),
            listener: Box::new(NoopListener),
            save_filter: Box::new(|_| true),
            pending: PendingChanges::default(),
            focus: None,
            save_in_flight: false,
            config,
        }
    }

    /// Create an editor from rows and history persisted in `store`.
    ///
    /// Missing or corrupt data falls back to `default_rows` and an empty log.
    pub fn restore(
        columns: Vec<ColumnDescriptor>,
        store: &dyn KvStore,
        default_rows: Vec<Row>,
        config: GridConfig,
    ) -> Self {
        let rows = storage::load_rows(store, &config.rows_key, default_rows);
        let log = storage::load_log(store, &config.history_key, config.history_retention);
        Self::new(columns, rows, config).with_log(log)
    }

    #[must_use]
    pub fn with_factory(mut self, factory: impl RowFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl GridListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    /// Only rows passing `filter` are saved; a save with none is refused.
    #[must_use]
    pub fn with_save_filter(mut self, filter: impl Fn(&Row) -> bool + 'static) -> Self {
        self.save_filter = Box::new(filter);
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: HistoryLog) -> Self {
        self.log = log;
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn GridListener>) {
        self.listener = listener;
    }

    // ---- Accessors ----

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Row] {
        self.table.present()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        column_index(&self.columns, key).and_then(|i| self.columns.get(i))
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    pub fn changed_cells(&self) -> &CellKeySet {
        &self.highlights.changed
    }

    pub fn saved_cells(&self) -> &CellKeySet {
        &self.highlights.saved
    }

    pub fn highlights(&self) -> &CellHighlights {
        &self.highlights
    }

    pub fn history_log(&self) -> &HistoryLog {
        &self.log
    }

    pub fn focus(&self) -> Option<&CellPos> {
        self.focus.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    /// Whether the cell at `(row, column_key)` currently accepts edits.
    pub fn is_cell_editable(&self, row: usize, column_key: &str) -> bool {
        match (self.rows().get(row), self.column(column_key)) {
            (Some(r), Some(c)) => c.is_editable_for(r),
            _ => false,
        }
    }

    /// Dropdown choices for a cell, resolved against its row.
    pub fn cell_options(&self, row: usize, column_key: &str) -> Vec<String> {
        match (self.rows().get(row), self.column(column_key)) {
            (Some(r), Some(c)) => c.options_for(r),
            _ => Vec::new(),
        }
    }

    // ---- Editing ----

    /// Write `value` into the cell at `(row, column_key)`.
    ///
    /// Rejected edits leave every piece of state untouched.
    pub fn edit_cell(&mut self, row: usize, column_key: &str, value: &str) -> EditOutcome {
        let applied = match mutation::apply_cell_edit(
            self.rows(),
            &self.columns,
            &self.config.id_field,
            row,
            column_key,
            value,
        ) {
            Ok(applied) => applied,
            Err(reason) => {
                log::debug!("edit rejected at {row}-{column_key}: {reason:?}");
                return EditOutcome::Rejected { reason };
            }
        };

        let changed = self.table.set_state(applied.rows);
        if let Some(record) = applied.record {
            self.pending.edited.push(record);
            self.highlights.changed.insert(applied.cell);
        }
        if changed {
            if let Some(row_value) = self.table.present().get(row) {
                self.listener.on_cell_edit(
                    row,
                    column_key,
                    &applied.old_value,
                    &applied.new_value,
                    row_value,
                );
            }
            self.listener.on_data_change(self.table.present());
        }
        EditOutcome::Applied { changed }
    }

    /// Append a blank row from the row factory and return its index.
    pub fn add_row(&mut self) -> usize {
        let row = self.factory.create_empty_row(self.rows());
        self.push_row(row)
    }

    fn push_row(&mut self, row: Row) -> usize {
        let id = row.get(&self.config.id_field).to_string();
        self.table.update(|rows| {
            let mut next = rows.clone();
            next.push(row);
            next
        });
        let index = self.rows().len().saturating_sub(1);
        self.pending.added.push(id);
        if let Some(added) = self.table.present().get(index) {
            self.listener.on_row_add(added);
        }
        self.listener.on_data_change(self.table.present());
        index
    }

    /// Remove the rows at `indices`, returning the removed rows.
    ///
    /// Out-of-range indices are ignored. Highlight keys of later rows shift
    /// up so they keep pointing at the same records.
    pub fn delete_rows(&mut self, indices: &[usize]) -> Vec<Row> {
        let len = self.rows().len();
        let mut targets: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
        targets.sort_unstable();
        targets.dedup();
        if targets.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let mut kept = Vec::new();
        for (index, row) in self.rows().iter().enumerate() {
            if targets.binary_search(&index).is_ok() {
                removed.push(row.clone());
            } else {
                kept.push(row.clone());
            }
        }
        self.table.set_state(kept);

        for row in &removed {
            self.pending
                .deleted
                .push(row.get(&self.config.id_field).to_string());
        }
        self.highlights.changed = shift_after_delete(&self.highlights.changed, &targets);
        self.highlights.saved = shift_after_delete(&self.highlights.saved, &targets);
        if self
            .focus
            .as_ref()
            .is_some_and(|f| targets.binary_search(&f.row).is_ok())
        {
            self.focus = None;
        }

        self.listener.on_row_delete(&removed);
        self.listener.on_data_change(self.table.present());
        removed
    }

    // ---- Navigation ----

    /// Move focus from `(row, column_key)` in `direction`.
    ///
    /// Returns the effects to apply, in order. When tabbing past the last
    /// editable cell, the new row is committed first and the focus target is
    /// computed against the updated rows.
    pub fn navigate(&mut self, row: usize, column_key: &str, direction: Direction) -> Vec<GridEffect> {
        match navigation::plan(self.rows(), &self.columns, row, column_key, direction) {
            NavTarget::Focus(cell) => {
                self.focus = Some(cell.clone());
                vec![GridEffect::Focus { cell }]
            }
            NavTarget::AppendRow => {
                let row = self.factory.create_empty_row(self.rows());
                // Never append a row the cursor cannot land in.
                let Some(first) = navigation::first_editable(&self.columns, &row) else {
                    log::debug!("navigate: new row would have no editable cell, staying");
                    return Vec::new();
                };
                let column = first.key.clone();
                let index = self.push_row(row);
                let cell = CellPos::new(index, column);
                self.focus = Some(cell.clone());
                vec![
                    GridEffect::RowAdded { index },
                    GridEffect::DataChanged,
                    GridEffect::Focus { cell },
                ]
            }
            NavTarget::Stay => Vec::new(),
        }
    }

    /// Translate a key press into navigation; `None` if the key is not ours.
    pub fn handle_key(
        &mut self,
        row: usize,
        column_key: &str,
        key: &str,
        shift: bool,
    ) -> Option<Vec<GridEffect>> {
        let direction = Direction::from_key(key, shift)?;
        Some(self.navigate(row, column_key, direction))
    }

    // ---- Undo / redo ----

    pub fn undo(&mut self) -> bool {
        let before = self.table.present().clone();
        if !self.table.undo() {
            return false;
        }
        self.after_restore(&before);
        true
    }

    pub fn redo(&mut self) -> bool {
        let before = self.table.present().clone();
        if !self.table.redo() {
            return false;
        }
        self.after_restore(&before);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.table.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.table.can_redo()
    }

    /// Highlight cells a restore touched and notify the host.
    fn after_restore(&mut self, before: &[Row]) {
        let fields: Vec<&str> = self.columns.iter().map(|c| c.data_index.as_str()).collect();
        let touched = diff_cells(self.table.present(), before, &fields);
        for key in touched {
            for column in self.columns.iter().filter(|c| c.data_index == key.column) {
                self.highlights
                    .changed
                    .insert(CellKey::new(key.row, column.key.clone()));
            }
        }
        self.listener.on_data_change(self.table.present());
    }

    /// Accept rows echoed back by a view adapter after `on_data_change`.
    ///
    /// The first echo after an undo/redo is absorbed without a history entry.
    pub fn sync_rows(&mut self, rows: Vec<Row>) -> bool {
        self.table.sync(rows)
    }

    /// Load a fresh data set, dropping history, pending changes and highlights.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.table.reset(rows);
        self.pending.clear();
        self.highlights.clear();
        self.focus = None;
        self.listener.on_data_change(self.table.present());
    }

    // ---- Saving ----

    /// Mark a save as started. Edits remain allowed until it finishes.
    pub fn begin_save(&mut self) -> Result<()> {
        if self.save_in_flight {
            return Err(GridError::SaveInProgress);
        }
        self.save_in_flight = true;
        Ok(())
    }

    /// Commit everything pending at this moment, including edits made since
    /// [`GridEditor::begin_save`].
    pub fn finish_save(&mut self, actor: Option<&str>) -> Result<SaveOutcome> {
        if !self.save_in_flight {
            return Err(GridError::NoSaveInProgress);
        }
        self.save_in_flight = false;
        Ok(self.commit_now(actor))
    }

    /// Abandon an in-flight save; pending changes are kept.
    pub fn cancel_save(&mut self) {
        self.save_in_flight = false;
    }

    /// Save immediately.
    pub fn save(&mut self, actor: Option<&str>) -> Result<SaveOutcome> {
        self.begin_save()?;
        self.finish_save(actor)
    }

    fn commit_now(&mut self, actor: Option<&str>) -> SaveOutcome {
        let actor = actor.unwrap_or(self.config.actor.as_str()).to_string();
        let input = CommitInput {
            rows: self.table.present(),
            columns: &self.columns,
            id_field: &self.config.id_field,
            keep: &*self.save_filter,
        };
        let ctx = CommitContext {
            actor: &actor,
            now: Utc::now(),
        };
        let outcome = commit::commit(
            &input,
            &mut self.pending,
            &mut self.highlights,
            &mut self.log,
            ctx,
        );
        if let SaveOutcome::Saved(summary) = &outcome {
            self.listener.on_save(&summary.saved_rows);
        }
        outcome
    }

    /// Write rows and history log to `store` under the configured keys.
    pub fn persist(&self, store: &dyn KvStore) -> Result<()> {
        storage::save_rows(store, &self.config.rows_key, self.rows())?;
        storage::save_log(store, &self.config.history_key, &self.log)
    }
}
