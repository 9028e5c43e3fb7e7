//! Schema metadata providers.
//!
//! This module abstracts over where foreign-key metadata comes from. The
//! resolver only ever sees a [`SchemaMetadata`] snapshot taken in one
//! introspection pass, so any backend that can list tables and report their
//! foreign keys can drive it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    SchemaProvider                         │
//! │  - list_tables()                                          │
//! │  - foreign_keys(table)                                    │
//! │  - fetch_metadata()   (one pass, concurrent FK fetches)   │
//! └──────────────────────────────────────────────────────────┘
//!          │                                    │
//!          ▼                                    ▼
//! ┌──────────────────────┐          ┌──────────────────────────┐
//! │ SqliteSchemaProvider │          │  MemorySchemaProvider    │
//! │ (rusqlite pragmas)   │          │  (caller-supplied data)  │
//! └──────────────────────┘          └──────────────────────────┘
//! ```

mod memory;
mod provider;
mod sqlite;
mod types;

pub use memory::MemorySchemaProvider;
pub use provider::{MetadataError, MetadataResult, SchemaProvider};
pub use sqlite::SqliteSchemaProvider;
pub use types::{ForeignKeyInfo, SchemaMetadata};
