use serde::{Deserialize, Serialize};

/// Position of the focused cell: row index plus column key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub column: String,
}

impl CellPos {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

/// Direction of a keyboard navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Tab: next editable cell, wrapping rows, appending at the end.
    Next,
    /// Shift+Tab: previous editable cell, wrapping rows.
    Prev,
    /// Enter: same column on the row below.
    Down,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` to a navigation direction.
    pub fn from_key(key: &str, shift: bool) -> Option<Self> {
        match (key, shift) {
            ("Tab", false) => Some(Self::Next),
            ("Tab", true) => Some(Self::Prev),
            ("Enter", false) => Some(Self::Down),
            _ => None,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Self::Next),
            "prev" => Ok(Self::Prev),
            "down" => Ok(Self::Down),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}
