//! SQLite schema introspection.
//!
//! Reads table names from `sqlite_master` and foreign keys from
//! `PRAGMA foreign_key_list`. SQLite does not expose constraint names
//! through the pragma, so `ForeignKeyInfo::name` is always `None` here.
//!
//! rusqlite is synchronous, so every call runs on the blocking thread pool
//! via `spawn_blocking`; the async caller's event loop is never blocked on
//! file I/O.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use super::provider::{MetadataError, MetadataResult, SchemaProvider};
use super::types::ForeignKeyInfo;

/// Schema provider backed by a SQLite database file.
///
/// # Example
///
/// ```ignore
/// use trellis::metadata::{SchemaProvider, SqliteSchemaProvider};
///
/// let provider = SqliteSchemaProvider::open("./data/shop.db")?;
/// let tables = provider.list_tables().await?;
/// ```
pub struct SqliteSchemaProvider {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSchemaProvider {
    /// Open a provider over a SQLite database file.
    pub fn open(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a provider over an in-memory database (for testing).
    pub fn open_in_memory() -> MetadataResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Wrap an existing connection (e.g. one that already has the schema
    /// loaded).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run a synchronous introspection closure on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> MetadataResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> MetadataResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            f(&conn)
        })
        .await
        .map_err(|err| MetadataError::Runtime(err.to_string()))?
    }
}

#[async_trait]
impl SchemaProvider for SqliteSchemaProvider {
    async fn list_tables(&self) -> MetadataResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name",
            )?;
            let tables = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(tables)
        })
        .await
    }

    async fn foreign_keys(&self, table: &str) -> MetadataResult<Vec<ForeignKeyInfo>> {
        let table = table.to_string();
        self.with_conn(move |conn| read_foreign_keys(conn, &table)).await
    }
}

/// One row of `PRAGMA foreign_key_list` output.
struct FkRow {
    id: i64,
    seq: i64,
    table: String,
    from: String,
    /// NULL when the constraint references the target's implicit primary key.
    to: Option<String>,
}

fn read_foreign_keys(conn: &Connection, table: &str) -> MetadataResult<Vec<ForeignKeyInfo>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA foreign_key_list({})",
        quote_pragma_ident(table)
    ))?;
    let mut rows = stmt
        .query_map([], |row| {
            Ok(FkRow {
                id: row.get(0)?,
                seq: row.get(1)?,
                table: row.get(2)?,
                from: row.get(3)?,
                to: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by_key(|row| (row.id, row.seq));

    let mut constraints: Vec<(i64, ForeignKeyInfo, bool)> = Vec::new();
    for row in rows {
        let needs_pk = row.to.is_none();
        match constraints.last_mut() {
            Some((id, info, implicit)) if *id == row.id => {
                info.columns.push(row.from);
                if let Some(to) = row.to {
                    info.referenced_columns.push(to);
                }
                *implicit |= needs_pk;
            }
            _ => constraints.push((
                row.id,
                ForeignKeyInfo {
                    name: None,
                    columns: vec![row.from],
                    referenced_table: row.table,
                    referenced_columns: row.to.into_iter().collect(),
                },
                needs_pk,
            )),
        }
    }

    // Constraints written as `REFERENCES parent` (no column list) report NULL
    // target columns; resolve them against the parent's declared primary key.
    let mut result = Vec::with_capacity(constraints.len());
    for (_, mut info, implicit) in constraints {
        if implicit {
            info.referenced_columns = primary_key_columns(conn, &info.referenced_table)?;
        }
        result.push(info);
    }
    Ok(result)
}

/// Primary-key column names of a table, in key order.
fn primary_key_columns(conn: &Connection, table: &str) -> MetadataResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA table_info({})",
        quote_pragma_ident(table)
    ))?;
    let mut columns = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let pk: i64 = row.get(5)?;
            Ok((pk, name))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    columns.retain(|(pk, _)| *pk > 0);
    columns.sort_by_key(|(pk, _)| *pk);
    Ok(columns.into_iter().map(|(_, name)| name).collect())
}

/// Quote an identifier for interpolation into a PRAGMA statement (pragmas do
/// not accept bound parameters).
fn quote_pragma_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
