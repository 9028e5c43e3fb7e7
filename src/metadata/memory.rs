//! In-memory schema provider.
//!
//! Useful when the caller already holds foreign-key metadata (for example
//! from an earlier discovery pass against a remote catalog), and as a test
//! fixture.

use std::collections::HashMap;

use async_trait::async_trait;

use super::provider::{MetadataResult, SchemaProvider};
use super::types::{ForeignKeyInfo, SchemaMetadata};

/// Schema provider over caller-supplied metadata.
///
/// Tables are reported in insertion order, which makes dense index
/// assignment (and therefore tie-breaking) predictable.
///
/// # Example
///
/// ```ignore
/// use trellis::metadata::{ForeignKeyInfo, MemorySchemaProvider};
///
/// let mut provider = MemorySchemaProvider::new();
/// provider.add_table("customers");
/// provider.add_table("orders");
/// provider.add_foreign_key(
///     "orders",
///     ForeignKeyInfo {
///         name: Some("fk_orders_customer".into()),
///         columns: vec!["customer_id".into()],
///         referenced_table: "customers".into(),
///         referenced_columns: vec!["id".into()],
///     },
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySchemaProvider {
    tables: Vec<String>,
    foreign_keys: HashMap<String, Vec<ForeignKeyInfo>>,
}

impl MemorySchemaProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from a previously captured metadata snapshot.
    pub fn from_metadata(metadata: SchemaMetadata) -> Self {
        Self {
            tables: metadata.tables,
            foreign_keys: metadata.foreign_keys,
        }
    }

    /// Add a table. Duplicate names are ignored.
    pub fn add_table(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.tables.contains(&name) {
            self.tables.push(name);
        }
        self
    }

    /// Record an outgoing foreign key on `table`. The table is added if it
    /// was not declared yet.
    pub fn add_foreign_key(&mut self, table: impl Into<String>, fk: ForeignKeyInfo) -> &mut Self {
        let table = table.into();
        self.add_table(table.clone());
        self.foreign_keys.entry(table).or_default().push(fk);
        self
    }
}

#[async_trait]
impl SchemaProvider for MemorySchemaProvider {
    async fn list_tables(&self) -> MetadataResult<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn foreign_keys(&self, table: &str) -> MetadataResult<Vec<ForeignKeyInfo>> {
        Ok(self.foreign_keys.get(table).cloned().unwrap_or_default())
    }
}
