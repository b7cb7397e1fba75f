//! Declarative column schemas.
//!
//! Hosts that cannot hand over closures (JavaScript, JSON files) describe
//! column behaviour with data instead: which fields a change resets, which
//! field the option list depends on, when a cell is read-only. `compile`
//! turns those specs into [`ColumnDescriptor`]s.
//!
//! ```json
//! {
//!   "key": "component",
//!   "title": "Component",
//!   "kind": "dropdown",
//!   "options": { "dependsOn": "system", "choices": { "OMS": ["Router", "Book"] } },
//!   "readOnly": { "whenEmpty": "system" },
//!   "resets": ["element", "description"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{GridError, Result};
use crate::types::{ColumnDescriptor, ColumnKind};

fn default_true() -> bool {
    true
}

/// Serializable description of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    pub title: String,
    /// Row field; defaults to `key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_index: Option<String>,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsSpec>,
    #[serde(default)]
    pub read_only: ReadOnlySpec,
    /// Fields cleared when this column's value changes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resets: Vec<String>,
}

/// Where a dropdown's choices come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionsSpec {
    /// A fixed list.
    List(Vec<String>),
    /// Choices keyed by the value of another field on the same row.
    #[serde(rename_all = "camelCase")]
    DependsOn {
        depends_on: String,
        choices: BTreeMap<String, Vec<String>>,
    },
}

/// When a cell refuses edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadOnlySpec {
    Flag(bool),
    Rule(ReadOnlyRule),
}

impl Default for ReadOnlySpec {
    fn default() -> Self {
        Self::Flag(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadOnlyRule {
    /// Read-only while `field` is empty on the row.
    WhenEmpty(String),
    /// Read-only while `field` equals `value` on the row.
    WhenEquals { field: String, value: String },
}

/// Parse a JSON array of column specs.
pub fn parse_columns(json: &str) -> Result<Vec<ColumnSpec>> {
    Ok(serde_json::from_str(json)?)
}

/// Turn specs into descriptors, checking that every field a spec refers to
/// belongs to some column.
pub fn compile(specs: &[ColumnSpec]) -> Result<Vec<ColumnDescriptor>> {
    let mut keys = HashSet::new();
    let mut fields = HashSet::new();
    for spec in specs {
        if !keys.insert(spec.key.as_str()) {
            return Err(GridError::Schema(format!("duplicate column key {}", spec.key)));
        }
        fields.insert(spec.data_index.as_deref().unwrap_or(spec.key.as_str()));
    }

    let known = |field: &str, owner: &str| -> Result<()> {
        if fields.contains(field) {
            Ok(())
        } else {
            Err(GridError::Schema(format!(
                "column {owner} refers to unknown field {field}"
            )))
        }
    };

    specs
        .iter()
        .map(|spec| {
            for field in &spec.resets {
                known(field, &spec.key)?;
            }
            if let Some(OptionsSpec::DependsOn { depends_on, .. }) = &spec.options {
                known(depends_on, &spec.key)?;
            }
            if let ReadOnlySpec::Rule(
                ReadOnlyRule::WhenEmpty(field) | ReadOnlyRule::WhenEquals { field, .. },
            ) = &spec.read_only
            {
                known(field, &spec.key)?;
            }
            Ok(compile_one(spec))
        })
        .collect()
}

fn compile_one(spec: &ColumnSpec) -> ColumnDescriptor {
    let mut column = ColumnDescriptor::new(&spec.key, &spec.title)
        .data_index(spec.data_index.clone().unwrap_or_else(|| spec.key.clone()))
        .editable(spec.editable)
        .kind(spec.kind);

    column = match spec.options.clone() {
        None => column,
        Some(OptionsSpec::List(list)) => column.options(list),
        Some(OptionsSpec::DependsOn {
            depends_on,
            choices,
        }) => column.options_with(move |row| {
            choices
                .get(row.get(&depends_on))
                .cloned()
                .unwrap_or_default()
        }),
    };

    column = match spec.read_only.clone() {
        ReadOnlySpec::Flag(flag) => column.read_only(flag),
        ReadOnlySpec::Rule(ReadOnlyRule::WhenEmpty(field)) => {
            column.read_only_when(move |row| row.get(&field).is_empty())
        }
        ReadOnlySpec::Rule(ReadOnlyRule::WhenEquals { field, value }) => {
            column.read_only_when(move |row| row.get(&field) == value)
        }
    };

    if spec.resets.is_empty() {
        column
    } else {
        column.cascade(&spec.resets)
    }
}
