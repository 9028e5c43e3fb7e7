//! # Trellis
//!
//! Foreign-key graph analysis and join-path resolution for relational schemas.
//!
//! Trellis lets a caller (typically an agent exploring an unfamiliar database)
//! compose correct multi-table joins without knowing the schema's foreign-key
//! topology. It introspects foreign-key metadata, builds an immutable graph
//! snapshot per schema, and answers two questions over it:
//!
//! - the shortest join path between two tables, and
//! - a minimal join network connecting an arbitrary set of tables
//!   (an approximate Steiner tree).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              SchemaProvider (trait)                      │
//! │   list_tables() / foreign_keys(table)                    │
//! │   impls: SqliteSchemaProvider, MemorySchemaProvider      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [one introspection pass]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SchemaMetadata                          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │       JoinGraph (immutable snapshot, cached)             │
//! │   adjacency + components + per-pair constraints          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolvers]
//! ┌─────────────────────────────────────────────────────────┐
//! │   shortest path / Steiner connect → Vec<JoinStep>        │
//! │   rendered as FROM/JOIN clauses                          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`Navigator`] ties the layers together: it owns a provider registry
//! and a [`SnapshotCache`], and exposes the resolver operations per schema.

pub mod cache;
pub mod config;
pub mod graph;
pub mod metadata;
pub mod navigator;
pub mod render;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::cache::SnapshotCache;
    pub use crate::graph::{
        DanglingReference, ForeignKeyConstraint, JoinGraph, JoinStep, ResolveError, ResolveResult,
    };
    pub use crate::metadata::{
        ForeignKeyInfo, MemorySchemaProvider, MetadataError, MetadataResult, SchemaMetadata,
        SchemaProvider, SqliteSchemaProvider,
    };
    pub use crate::navigator::{Navigator, NavigatorError};
    pub use crate::render::{quote_ident, render_join_plan};
}

// Also export the main entry points at the crate root for convenience
pub use cache::SnapshotCache;
pub use graph::{JoinGraph, JoinStep, ResolveError};
pub use metadata::{SchemaMetadata, SchemaProvider};
pub use navigator::{Navigator, NavigatorError};
