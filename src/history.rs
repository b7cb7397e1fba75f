//! Linear undo/redo over whole-value snapshots.
//!
//! `past` and `future` hold full copies of earlier/later values rather than
//! deltas. Recording a new value discards the redo branch.

use std::collections::VecDeque;

/// Undo/redo container for a single value (the table's rows).
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    past: Vec<T>,
    present: T,
    future: VecDeque<T>,
    /// Maximum number of undo snapshots kept; `None` is unbounded.
    limit: Option<usize>,
    /// Armed by undo/redo, consumed by the next [`HistoryStack::sync`].
    restore_pending: bool,
}

impl<T: Clone + PartialEq> HistoryStack<T> {
    pub fn new(present: T) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: VecDeque::new(),
            limit: None,
            restore_pending: false,
        }
    }

    /// Keep at most `limit` undo snapshots (oldest dropped first).
    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new(present)
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Record `next` as the new present.
    ///
    /// Returns `false` without touching history when `next` equals the
    /// current present.
    pub fn set_state(&mut self, next: T) -> bool {
        self.restore_pending = false;
        if next == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push(previous);
        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
            }
        }
        self.future.clear();
        true
    }

    /// Functional form of [`HistoryStack::set_state`].
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> bool {
        let next = f(&self.present);
        self.set_state(next)
    }

    /// Accept a value pushed back from outside (e.g. a view adapter
    /// re-synchronising after a change notification).
    ///
    /// Right after an undo or redo the value is taken as-is without creating
    /// an entry, once. Otherwise this behaves like `set_state`.
    pub fn sync(&mut self, value: T) -> bool {
        if std::mem::take(&mut self.restore_pending) {
            let changed = value != self.present;
            self.present = value;
            return changed;
        }
        self.set_state(value)
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        self.restore_pending = true;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        self.restore_pending = true;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Whether the last operation was a restore not yet synced back.
    pub fn is_restore_pending(&self) -> bool {
        self.restore_pending
    }

    /// Replace the value and forget all history (fresh data set).
    pub fn reset(&mut self, present: T) {
        self.present = present;
        self.past.clear();
        self.future.clear();
        self.restore_pending = false;
    }
}
