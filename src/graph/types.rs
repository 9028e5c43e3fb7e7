//! Value types for the foreign-key join graph.

use serde::{Deserialize, Serialize};

/// One declared foreign-key constraint between two tables.
///
/// Multiple constraints may exist between the same pair of tables (e.g. two
/// independent foreign keys); all of them are retained in the snapshot's
/// per-pair registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    /// Constraint name, if the database exposes one. May be absent or
    /// duplicated across constraints.
    pub name: Option<String>,
    /// Table declaring the foreign key.
    pub from_table: String,
    /// Table the foreign key references.
    pub to_table: String,
    /// Ordered (local column, referenced column) pairs.
    pub column_pairs: Vec<(String, String)>,
}

/// One hop in a resolved join path.
///
/// Column pairs are oriented left→right, so that
/// `left_table.pair.0 = right_table.pair.1` is directly usable in an `ON`
/// clause. Produced only by the step materializer, never from raw metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStep {
    pub left_table: String,
    pub right_table: String,
    /// Ordered (left column, right column) pairs.
    pub column_pairs: Vec<(String, String)>,
    /// Name of the originating constraint, if it had one.
    pub constraint_name: Option<String>,
}

/// A foreign key whose referenced table is absent from the schema snapshot.
///
/// Dangling references are excluded from the graph but reported, so callers
/// can surface them as diagnostics. They never fail snapshot construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub from_table: String,
    pub to_table: String,
    pub constraint_name: Option<String>,
}

/// Normalized unordered pair of table names, used to key the per-pair
/// constraint registry regardless of which direction a constraint points.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TablePair(String, String);

impl TablePair {
    /// Build the normalized key for two table names (order-insensitive).
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }

    /// Lexicographically smaller member of the pair.
    pub fn first(&self) -> &str {
        &self.0
    }

    /// Lexicographically larger member of the pair.
    pub fn second(&self) -> &str {
        &self.1
    }
}
