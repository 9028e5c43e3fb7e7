//! Raw metadata records exchanged with schema providers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One raw foreign-key record as reported by a provider.
///
/// `columns` and `referenced_columns` are ordered and expected to have the
/// same length; records with no columns are ignored by the graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    /// Constraint name, if the backend exposes one.
    #[serde(default)]
    pub name: Option<String>,
    /// Local columns making up the foreign key (ordered).
    pub columns: Vec<String>,
    /// Name of the referenced table.
    pub referenced_table: String,
    /// Columns in the referenced table (ordered, same length as `columns`).
    pub referenced_columns: Vec<String>,
}

/// The result of one schema introspection pass: all table names plus each
/// table's outgoing foreign keys, captured together so the graph builder
/// sees a consistent view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMetadata {
    /// Table names in provider order. Order affects only dense index
    /// assignment (and thereby tie-breaking), never correctness.
    pub tables: Vec<String>,
    /// Outgoing foreign keys per table.
    pub foreign_keys: HashMap<String, Vec<ForeignKeyInfo>>,
}

impl SchemaMetadata {
    /// Outgoing foreign keys for one table (empty if none were reported).
    pub fn foreign_keys_of(&self, table: &str) -> &[ForeignKeyInfo] {
        self.foreign_keys
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
