//! Creation of blank rows for add-row and tab-past-the-end.

use crate::types::{next_id, Row};

/// Produces a new empty row given the rows already in the table.
///
/// Implementations must hand out an identifier that is unique within
/// `existing`.
pub trait RowFactory {
    fn create_empty_row(&self, existing: &[Row]) -> Row;
}

impl<F: Fn(&[Row]) -> Row> RowFactory for F {
    fn create_empty_row(&self, existing: &[Row]) -> Row {
        self(existing)
    }
}

/// Rows with sequential ids such as `SCO.00007` and every other field empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    pub id_field: String,
    pub prefix: String,
    pub width: usize,
    /// Fields initialised to the empty string.
    pub fields: Vec<String>,
}

impl SequentialIds {
    pub fn new(id_field: impl Into<String>, prefix: impl Into<String>, width: usize) -> Self {
        Self {
            id_field: id_field.into(),
            prefix: prefix.into(),
            width,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.fields = fields.iter().map(|f| f.as_ref().to_string()).collect();
        self
    }
}

impl RowFactory for SequentialIds {
    fn create_empty_row(&self, existing: &[Row]) -> Row {
        let mut row: Row = self
            .fields
            .iter()
            .map(|field| (field.as_str(), ""))
            .collect();
        row.set(
            self.id_field.clone(),
            next_id(existing, &self.id_field, &self.prefix, self.width),
        );
        row
    }
}
