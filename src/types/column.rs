use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use super::{Row, RowPatch};

/// Editor widget a column uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Dropdown,
    Textarea,
}

/// A column property that is either fixed or derived from the row.
///
/// Every decision point calls [`Resolvable::resolve`] with the row under
/// consideration, so static and computed variants are handled uniformly.
pub enum Resolvable<T> {
    Static(T),
    Computed(Rc<dyn Fn(&Row) -> T>),
}

impl<T: Clone> Resolvable<T> {
    pub fn resolve(&self, row: &Row) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Computed(f) => f(row),
        }
    }
}

impl<T: Clone> Clone for Resolvable<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Change handler: `(current row, new value) -> patch`.
pub type CellChangeFn = Rc<dyn Fn(&Row, &str) -> RowPatch>;

/// Declarative description of one table column.
#[derive(Clone)]
pub struct ColumnDescriptor {
    /// Identifier used in cell keys and navigation.
    pub key: String,
    /// Human-readable title, used in history descriptions.
    pub title: String,
    /// Row field this column reads and writes.
    pub data_index: String,
    pub editable: bool,
    pub kind: ColumnKind,
    pub options: Resolvable<Vec<String>>,
    pub read_only: Resolvable<bool>,
    pub on_cell_change: Option<CellChangeFn>,
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("data_index", &self.data_index)
            .field("editable", &self.editable)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("read_only", &self.read_only)
            .field("on_cell_change", &self.on_cell_change.is_some())
            .finish()
    }
}

impl ColumnDescriptor {
    /// An editable text column whose key doubles as its data index.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            data_index: key.clone(),
            key,
            title: title.into(),
            editable: true,
            kind: ColumnKind::Text,
            options: Resolvable::Static(Vec::new()),
            read_only: Resolvable::Static(false),
            on_cell_change: None,
        }
    }

    #[must_use]
    pub fn data_index(mut self, field: impl Into<String>) -> Self {
        self.data_index = field.into();
        self
    }

    #[must_use]
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = Resolvable::Static(options);
        self
    }

    #[must_use]
    pub fn options_with(mut self, f: impl Fn(&Row) -> Vec<String> + 'static) -> Self {
        self.options = Resolvable::Computed(Rc::new(f));
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Resolvable::Static(read_only);
        self
    }

    #[must_use]
    pub fn read_only_when(mut self, f: impl Fn(&Row) -> bool + 'static) -> Self {
        self.read_only = Resolvable::Computed(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_cell_change(mut self, f: impl Fn(&Row, &str) -> RowPatch + 'static) -> Self {
        self.on_cell_change = Some(Rc::new(f));
        self
    }

    /// Install a change handler that clears `dependents` whenever this
    /// column's value actually changes.
    #[must_use]
    pub fn cascade<S: AsRef<str>>(self, dependents: &[S]) -> Self {
        let field = self.data_index.clone();
        let dependents: Vec<String> = dependents.iter().map(|d| d.as_ref().to_string()).collect();
        self.on_cell_change(move |row, value| cascade_patch(row, &field, value, &dependents))
    }

    /// Whether the cell of this column on `row` accepts edits.
    pub fn is_editable_for(&self, row: &Row) -> bool {
        self.editable && !self.read_only.resolve(row)
    }

    pub fn options_for(&self, row: &Row) -> Vec<String> {
        self.options.resolve(row)
    }

    /// Patch produced by writing `value` into this column on `row`.
    ///
    /// The edited field is always part of the result, even when a custom
    /// handler leaves it out.
    pub fn patch_for(&self, row: &Row, value: &str) -> RowPatch {
        let mut patch = match &self.on_cell_change {
            Some(handler) => handler(row, value),
            None => RowPatch::new(),
        };
        patch
            .entry(self.data_index.clone())
            .or_insert_with(|| value.to_string());
        patch
    }
}

/// Patch for setting `field` to `value` and resetting `dependents`.
///
/// Dependents are only cleared when the value differs from what the row
/// already holds; re-selecting the current value leaves them alone.
pub fn cascade_patch(row: &Row, field: &str, value: &str, dependents: &[String]) -> RowPatch {
    let mut patch = RowPatch::new();
    patch.insert(field.to_string(), value.to_string());
    if row.get(field) != value {
        for dependent in dependents {
            if dependent != field {
                patch.insert(dependent.clone(), String::new());
            }
        }
    }
    patch
}

/// Position of the column with `key`, if any.
pub fn column_index(columns: &[ColumnDescriptor], key: &str) -> Option<usize> {
    columns.iter().position(|c| c.key == key)
}
