//! Foreign-key join graph - an immutable, queryable snapshot of one schema.
//!
//! The graph treats foreign keys as undirected unit-weight edges for
//! reachability, while the per-pair constraint registry keeps the original
//! direction of every constraint so that join steps can be oriented
//! correctly for SQL emission.

mod builder;
pub mod query;
pub mod types;

pub use query::{ResolveError, ResolveResult};
pub use types::*;

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Immutable snapshot of one schema's foreign-key topology.
///
/// Built once per schema identity (see [`crate::cache::SnapshotCache`]) and
/// shared behind an `Arc`; concurrent readers need no locking.
///
/// Structure:
/// - an undirected graph whose node weights are table names and whose node
///   indices form a dense table-name↔index bijection,
/// - at most one adjacency edge per table pair, regardless of how many
///   constraints connect the pair,
/// - a connected-component label per table (different labels are provably
///   unjoinable),
/// - a registry of every constraint observed between each unordered pair.
///
/// Invariant: an adjacency edge exists for a pair iff the registry holds at
/// least one constraint for that pair.
#[derive(Debug, Clone)]
pub struct JoinGraph {
    /// Undirected unit-weight adjacency over table indices.
    graph: UnGraph<String, ()>,

    /// Index: table name → NodeIndex.
    table_index: HashMap<String, NodeIndex>,

    /// Connected-component label per node index.
    components: Vec<usize>,

    /// All constraints observed between each unordered table pair, in
    /// provider order.
    edge_constraints: HashMap<TablePair, Vec<ForeignKeyConstraint>>,

    /// Foreign keys whose referenced table is absent from the schema.
    dangling: Vec<DanglingReference>,
}

impl JoinGraph {
    /// Number of tables in the snapshot.
    pub fn table_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of adjacency edges (table pairs with at least one constraint).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the schema contains the named table.
    pub fn contains_table(&self, name: &str) -> bool {
        self.table_index.contains_key(name)
    }

    /// All table names, in dense index order (provider order).
    pub fn table_names(&self) -> Vec<&str> {
        self.graph.node_weights().map(String::as_str).collect()
    }

    /// Dense index for a table name.
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.table_index.get(name).copied()
    }

    /// Table name for a dense index.
    pub fn name_of(&self, index: NodeIndex) -> &str {
        &self.graph[index]
    }

    /// Connected-component label for a table, if it exists.
    ///
    /// Two tables with different labels are unreachable from each other.
    pub fn component_of(&self, name: &str) -> Option<usize> {
        self.index_of(name).map(|idx| self.components[idx.index()])
    }

    /// Every constraint recorded between two tables, in either direction.
    pub fn constraints_between(&self, a: &str, b: &str) -> &[ForeignKeyConstraint] {
        self.edge_constraints
            .get(&TablePair::new(a, b))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Foreign keys skipped during construction because their referenced
    /// table is not part of the schema.
    pub fn dangling_references(&self) -> &[DanglingReference] {
        &self.dangling
    }
}
