//! Schema navigator - the exposed resolution interface.
//!
//! Ties the provider registry, the snapshot cache, and the resolvers into
//! one object: register a [`SchemaProvider`] per schema identity, then ask
//! for join paths by table name. Snapshots build lazily on first use and
//! rebuild after [`Navigator::invalidate`].

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::cache::SnapshotCache;
use crate::graph::{JoinGraph, JoinStep, ResolveError};
use crate::metadata::{MetadataError, SchemaProvider};

/// Errors surfaced by navigator operations.
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// No provider is registered under the requested schema identity.
    #[error("unknown schema: '{0}'; no provider registered under that name")]
    UnknownSchema(String),

    /// Fetching metadata from the schema's provider failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Join-path resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for navigator operations.
pub type NavigatorResult<T> = Result<T, NavigatorError>;

/// Registry of schemas plus cached join-graph snapshots.
///
/// Cheap to share: all interior state is concurrent, and every operation
/// takes `&self`.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use trellis::metadata::SqliteSchemaProvider;
/// use trellis::navigator::Navigator;
///
/// let navigator = Navigator::new();
/// navigator.register("shop", Arc::new(SqliteSchemaProvider::open("./shop.db")?));
///
/// let steps = navigator.shortest_join_path("shop", "orders", "products").await?;
/// ```
#[derive(Default)]
pub struct Navigator {
    providers: DashMap<String, Arc<dyn SchemaProvider>>,
    cache: SnapshotCache,
}

impl Navigator {
    /// Create a navigator with no registered schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the provider for a schema identity. Replacing
    /// a provider drops any cached snapshot for that schema.
    pub fn register(&self, schema: impl Into<String>, provider: Arc<dyn SchemaProvider>) {
        let schema = schema.into();
        self.cache.invalidate(&schema);
        self.providers.insert(schema, provider);
    }

    /// Registered schema identities, sorted.
    pub fn schemas(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// The snapshot for a schema, building and caching it if needed.
    pub async fn snapshot(&self, schema: &str) -> NavigatorResult<Arc<JoinGraph>> {
        let provider = match self.providers.get(schema) {
            Some(entry) => Arc::clone(entry.value()),
            None => return Err(NavigatorError::UnknownSchema(schema.to_string())),
        };
        Ok(self.cache.get_or_build(schema, provider.as_ref()).await?)
    }

    /// All table names of a schema, in snapshot order.
    pub async fn tables(&self, schema: &str) -> NavigatorResult<Vec<String>> {
        let snapshot = self.snapshot(schema).await?;
        Ok(snapshot
            .table_names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Shortest join path between two tables of a schema.
    pub async fn shortest_join_path(
        &self,
        schema: &str,
        left: &str,
        right: &str,
    ) -> NavigatorResult<Vec<JoinStep>> {
        let snapshot = self.snapshot(schema).await?;
        Ok(snapshot.join_path(left, right)?)
    }

    /// Minimal join network connecting all named tables of a schema.
    pub async fn connect_tables(
        &self,
        schema: &str,
        tables: &[&str],
    ) -> NavigatorResult<Vec<JoinStep>> {
        let snapshot = self.snapshot(schema).await?;
        Ok(snapshot.connect(tables)?)
    }

    /// Drop the cached snapshot for a schema (e.g. after a schema-discovery
    /// refresh), forcing a rebuild on the next request. Returns whether a
    /// snapshot slot existed.
    pub fn invalidate(&self, schema: &str) -> bool {
        self.cache.invalidate(schema)
    }
}
