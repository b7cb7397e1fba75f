//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for a [`crate::editor::GridEditor`].
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Row field holding the stable identifier
    pub id_field: String,
    /// Identifier prefix, e.g. `SCO.`
    pub id_prefix: String,
    /// Zero-padded width of the identifier's numeric suffix
    pub id_width: usize,
    /// Storage key for the persisted rows
    pub rows_key: String,
    /// Storage key for the persisted history log
    pub history_key: String,
    /// Maximum history log entries kept
    pub history_retention: Option<usize>,
    /// Maximum undo snapshots kept
    pub undo_limit: Option<usize>,
    /// Maximum size of the saved-cell highlight set
    pub saved_cells_limit: Option<usize>,
    /// Identity recorded on history entries when the caller gives none
    pub actor: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            id_prefix: "ROW.".to_string(),
            id_width: 5,
            rows_key: "casegrid.rows".to_string(),
            history_key: "casegrid.history".to_string(),
            history_retention: Some(100),
            undo_limit: None,
            saved_cells_limit: None,
            actor: "Current User".to_string(),
        }
    }
}

impl GridConfig {
    /// Parse a (possibly partial) JSON config. Empty input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}
