use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of one cell: `"{row}-{columnKey}"`.
///
/// Used for set membership in the changed/saved highlight sets. Serializes
/// as its string form so JS callers can use it directly as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: usize,
    pub column: String,
}

/// Ordered set of cell keys.
pub type CellKeySet = BTreeSet<CellKey>;

impl CellKey {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.column)
    }
}

impl FromStr for CellKey {
    type Err = String;

    /// Splits on the first `-`, so column keys may themselves contain dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, column) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid cell key: {s}"))?;
        let row = row
            .parse::<usize>()
            .map_err(|_| format!("invalid row in cell key: {s}"))?;
        if column.is_empty() {
            return Err(format!("missing column in cell key: {s}"));
        }
        Ok(Self::new(row, column))
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Re-key a cell set after the rows at `deleted` (sorted, unique) were
/// removed: keys on deleted rows are dropped, later rows shift up.
pub fn shift_after_delete(set: &CellKeySet, deleted: &[usize]) -> CellKeySet {
    set.iter()
        .filter(|key| deleted.binary_search(&key.row).is_err())
        .map(|key| {
            let removed_before = deleted.partition_point(|&d| d < key.row);
            CellKey::new(key.row - removed_before, key.column.clone())
        })
        .collect()
}
