//! Snapshot construction from raw foreign-key metadata.
//!
//! Construction happens in two phases:
//! - Phase 1: assign every table a dense node index, in provider order.
//! - Phase 2: walk each table's foreign keys, recording one undirected
//!   adjacency edge per connected pair and appending every constraint to the
//!   per-pair registry; then label connected components with union-find.
//!
//! The result is byte-for-byte reproducible for identical provider output:
//! index assignment follows provider order and every registry list keeps
//! provider order.

use log::warn;
use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use crate::metadata::SchemaMetadata;

use super::types::{DanglingReference, ForeignKeyConstraint, TablePair};
use super::JoinGraph;

impl JoinGraph {
    /// Build an immutable snapshot from one introspection pass.
    ///
    /// Never fails: constraints referencing tables absent from the schema
    /// are skipped and surfaced via [`JoinGraph::dangling_references`] (plus
    /// one warning log), and constraints without usable columns are ignored.
    /// The rest of the schema still resolves.
    pub fn build(metadata: &SchemaMetadata) -> JoinGraph {
        let table_count = metadata.tables.len();
        let mut graph = UnGraph::with_capacity(table_count, table_count);
        let mut table_index = HashMap::with_capacity(table_count);

        // Phase 1: dense indices in provider order.
        for name in &metadata.tables {
            if table_index.contains_key(name) {
                continue;
            }
            let idx = graph.add_node(name.clone());
            table_index.insert(name.clone(), idx);
        }

        // Phase 2: edges and the per-pair constraint registry.
        let mut edge_constraints: HashMap<TablePair, Vec<ForeignKeyConstraint>> = HashMap::new();
        let mut dangling = Vec::new();

        for name in &metadata.tables {
            let Some(&from_idx) = table_index.get(name) else {
                continue;
            };
            for fk in metadata.foreign_keys_of(name) {
                if fk.referenced_table.is_empty() || fk.columns.is_empty() {
                    continue;
                }
                let Some(&to_idx) = table_index.get(&fk.referenced_table) else {
                    dangling.push(DanglingReference {
                        from_table: name.clone(),
                        to_table: fk.referenced_table.clone(),
                        constraint_name: fk.name.clone(),
                    });
                    continue;
                };

                let column_pairs = fk
                    .columns
                    .iter()
                    .cloned()
                    .zip(fk.referenced_columns.iter().cloned())
                    .collect();
                edge_constraints
                    .entry(TablePair::new(name, &fk.referenced_table))
                    .or_default()
                    .push(ForeignKeyConstraint {
                        name: fk.name.clone(),
                        from_table: name.clone(),
                        to_table: fk.referenced_table.clone(),
                        column_pairs,
                    });

                // One adjacency edge per pair, however many constraints
                // connect it.
                graph.update_edge(from_idx, to_idx, ());
            }
        }

        let mut vertex_sets = UnionFind::new(graph.node_count());
        for edge in graph.edge_references() {
            vertex_sets.union(edge.source().index(), edge.target().index());
        }
        let components = vertex_sets.into_labeling();

        if !dangling.is_empty() {
            let mut pairs: Vec<String> = dangling
                .iter()
                .map(|d| format!("{}->{}", d.from_table, d.to_table))
                .collect();
            pairs.sort();
            pairs.dedup();
            warn!(
                "foreign key references unknown table(s) skipped: {}",
                pairs.join(", ")
            );
        }

        JoinGraph {
            graph,
            table_index,
            components,
            edge_constraints,
            dangling,
        }
    }
}
