//! Test fixtures: the scope table used across the integration tests.
//!
//! A scope row has an id plus a system -> component -> description chain:
//! changing the system clears component and description, changing the
//! component clears the description, and the component is read-only until a
//! system is chosen.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{scope_editor, ScopeRow};
//!
//! let mut grid = scope_editor(vec![ScopeRow::new(1).system("OMS").build()]);
//! grid.edit_cell(0, "component", "Router");
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use casegrid::editor::SequentialIds;
use casegrid::schema::{self, ColumnSpec};
use casegrid::{ColumnDescriptor, ColumnKind, GridConfig, GridEditor, Row};

pub const PREFIX: &str = "SCO.";

/// Field order of a scope row, id first.
pub const FIELDS: [&str; 4] = ["id", "system", "component", "description"];

// ============================================================================
// Columns
// ============================================================================

/// Scope columns built with the Rust builder API.
pub fn scope_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("id", "ID").editable(false),
        ColumnDescriptor::new("system", "System")
            .kind(ColumnKind::Dropdown)
            .options(vec!["OMS".into(), "EMS".into(), "RISK".into()])
            .cascade(&["component", "description"]),
        ColumnDescriptor::new("component", "Component")
            .kind(ColumnKind::Dropdown)
            .options_with(|row| match row.get("system") {
                "OMS" => vec!["Router".into(), "Book".into()],
                "EMS" => vec!["Gateway".into()],
                _ => Vec::new(),
            })
            .read_only_when(|row| row.get("system").is_empty())
            .cascade(&["description"]),
        ColumnDescriptor::new("description", "Description").kind(ColumnKind::Textarea),
    ]
}

/// The same columns as a JSON schema, for the bindings and replay paths.
pub const SCOPE_COLUMNS_JSON: &str = r#"[
    {"key": "id", "title": "ID", "editable": false},
    {"key": "system", "title": "System", "kind": "dropdown",
     "options": ["OMS", "EMS", "RISK"], "resets": ["component", "description"]},
    {"key": "component", "title": "Component", "kind": "dropdown",
     "options": {"dependsOn": "system", "choices": {"OMS": ["Router", "Book"], "EMS": ["Gateway"]}},
     "readOnly": {"whenEmpty": "system"}, "resets": ["description"]},
    {"key": "description", "title": "Description", "kind": "textarea"}
]"#;

pub fn scope_column_specs() -> Vec<ColumnSpec> {
    schema::parse_columns(SCOPE_COLUMNS_JSON).expect("fixture schema parses")
}

// ============================================================================
// Rows
// ============================================================================

/// Builder for one scope row.
#[derive(Debug, Clone)]
pub struct ScopeRow {
    row: Row,
}

impl ScopeRow {
    pub fn new(seq: u64) -> Self {
        let mut row = Row::new();
        for field in FIELDS {
            row.set(field, "");
        }
        row.set("id", format!("{PREFIX}{seq:05}"));
        Self { row }
    }

    pub fn system(mut self, value: &str) -> Self {
        self.row.set("system", value);
        self
    }

    pub fn component(mut self, value: &str) -> Self {
        self.row.set("component", value);
        self
    }

    pub fn description(mut self, value: &str) -> Self {
        self.row.set("description", value);
        self
    }

    pub fn build(self) -> Row {
        self.row
    }
}

/// `count` blank rows numbered from 1.
pub fn blank_rows(count: u64) -> Vec<Row> {
    (1..=count).map(|n| ScopeRow::new(n).build()).collect()
}

/// Three filled rows.
pub fn sample_rows() -> Vec<Row> {
    vec![
        ScopeRow::new(1)
            .system("OMS")
            .component("Router")
            .description("order routing")
            .build(),
        ScopeRow::new(2)
            .system("EMS")
            .component("Gateway")
            .description("exchange link")
            .build(),
        ScopeRow::new(3).system("OMS").component("Book").build(),
    ]
}

// ============================================================================
// Editors
// ============================================================================

pub fn scope_config() -> GridConfig {
    GridConfig {
        id_prefix: PREFIX.to_string(),
        actor: "tester".to_string(),
        ..GridConfig::default()
    }
}

/// Editor over `rows` with the scope columns and an `SCO.` id factory.
pub fn scope_editor(rows: Vec<Row>) -> GridEditor {
    GridEditor::new(scope_columns(), rows, scope_config())
        .with_factory(SequentialIds::new("id", PREFIX, 5).with_fields(&FIELDS))
}
