//! SchemaProvider trait definition.
//!
//! The SchemaProvider trait abstracts over different ways of fetching
//! foreign-key metadata. Implementations exist for SQLite files
//! ([`super::SqliteSchemaProvider`]) and for caller-supplied in-memory
//! metadata ([`super::MemorySchemaProvider`]).

use async_trait::async_trait;
use thiserror::Error;

use super::types::{ForeignKeyInfo, SchemaMetadata};

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while fetching schema metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// SQLite introspection failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Underlying I/O failed (e.g. the database file is unreadable).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking introspection task panicked or was cancelled.
    #[error("introspection task failed: {0}")]
    Runtime(String),

    /// Backend-specific introspection failure.
    #[error("schema introspection failed: {0}")]
    Introspection(String),
}

/// Trait for fetching schema metadata.
///
/// Implementations must be deterministic within one introspection pass: two
/// consecutive calls without an intervening schema change report the same
/// tables in the same order.
///
/// # Example
///
/// ```ignore
/// use trellis::metadata::SchemaProvider;
///
/// async fn example(provider: &impl SchemaProvider) -> trellis::metadata::MetadataResult<()> {
///     let tables = provider.list_tables().await?;
///     for table in &tables {
///         let fks = provider.foreign_keys(table).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// List all table names in the schema.
    ///
    /// Names are unique; no particular order is required, but the order must
    /// be stable within one introspection pass.
    async fn list_tables(&self) -> MetadataResult<Vec<String>>;

    /// Outgoing foreign-key constraints declared by one table.
    async fn foreign_keys(&self, table: &str) -> MetadataResult<Vec<ForeignKeyInfo>>;

    /// Take one complete introspection pass: all tables plus each table's
    /// foreign keys.
    ///
    /// Default implementation fetches per-table foreign keys concurrently
    /// using `join_all`.
    async fn fetch_metadata(&self) -> MetadataResult<SchemaMetadata> {
        let tables = self.list_tables().await?;

        let futures: Vec<_> = tables.iter().map(|table| self.foreign_keys(table)).collect();
        let results = futures::future::join_all(futures).await;

        let mut foreign_keys = std::collections::HashMap::with_capacity(tables.len());
        for (table, result) in tables.iter().zip(results) {
            foreign_keys.insert(table.clone(), result?);
        }

        Ok(SchemaMetadata {
            tables,
            foreign_keys,
        })
    }
}
