use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Partial row update returned by a column's change handler.
pub type RowPatch = BTreeMap<String, String>;

/// A single table row: an open-ended mapping from field name to value.
///
/// Missing fields read as the empty string, and compare equal to an empty
/// value. JSON `null` values are accepted on input and normalized to empty.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for fixtures and row factories.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Value of `field`, or `""` when the row has no such field.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Merge a partial patch into this row (patch values win).
    pub fn apply(&mut self, patch: &RowPatch) {
        for (field, value) in patch {
            self.fields.insert(field.clone(), value.clone());
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.fields().all(|(k, v)| other.get(k) == v)
            && other.fields().all(|(k, v)| self.get(k) == v)
    }
}

impl Eq for Row {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        Ok(Self {
            fields: raw
                .into_iter()
                .map(|(k, v)| (k, v.unwrap_or_default()))
                .collect(),
        })
    }
}

// ============================================================================
// Row identifiers
// ============================================================================

/// Numeric suffix of `id` when it carries `prefix`, e.g. `SCO.00007` → 7.
pub fn id_suffix(id: &str, prefix: &str) -> Option<u64> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Format a sequence number as `prefix` + zero-padded suffix.
pub fn format_id(prefix: &str, seq: u64, width: usize) -> String {
    format!("{prefix}{seq:0width$}")
}

/// Next free identifier for `rows`.
///
/// The sequence continues from the largest suffix present, so ids of deleted
/// rows are never handed out again as long as a later id survives.
pub fn next_id(rows: &[Row], id_field: &str, prefix: &str, width: usize) -> String {
    let max = rows
        .iter()
        .filter_map(|row| id_suffix(row.get(id_field), prefix))
        .max()
        .unwrap_or(0);
    format_id(prefix, max.saturating_add(1), width)
}
