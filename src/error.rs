//! Structured error types for casegrid.
//!
//! Only genuine failures live here. Rejected edits, empty saves and
//! navigation dead-ends are ordinary outcomes, not errors.

/// All errors that can occur while driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// JSON (de)serialization error from serde_json.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Persistence backend failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A column schema refers to something that does not exist.
    #[error("Invalid column schema: {0}")]
    Schema(String),

    /// `begin_save` was called while another save is still in flight.
    #[error("a save is already in progress")]
    SaveInProgress,

    /// `finish_save` was called without a matching `begin_save`.
    #[error("no save in progress")]
    NoSaveInProgress,

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
