//! Resolver operations over a join-graph snapshot.
//!
//! Three operations, all read-only over the immutable snapshot:
//! - shortest join path between two tables (unweighted BFS),
//! - minimal join network over a set of tables (2-approximate Steiner tree),
//! - materialization of graph edges into directionally-correct join steps.

use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeSet, HashMap, VecDeque};
use thiserror::Error;

use super::types::{JoinStep, TablePair};
use super::JoinGraph;

/// Errors that can occur during join-path resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// One or more requested names are not tables of this schema.
    #[error("unknown tables: {}. Available tables: {}", .unknown.join(", "), .available.join(", "))]
    UnknownTable {
        unknown: Vec<String>,
        available: Vec<String>,
    },

    /// A multi-table operation needs at least two distinct tables.
    #[error("provide at least two distinct tables to connect (got {0})")]
    InsufficientTables(usize),

    /// The requested tables span more than one connected component.
    #[error("no join path connects: {}", .tables.join(", "))]
    NoJoinPath { tables: Vec<String> },

    /// An adjacency edge exists but no recorded constraint can be oriented
    /// to match it. Indicates a broken snapshot invariant; resolution fails
    /// loudly instead of emitting an invalid join condition.
    #[error("no foreign key orients the edge '{left}' -> '{right}'; known constraints: {known}")]
    NoConstraintForEdge {
        left: String,
        right: String,
        known: String,
    },
}

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

impl JoinGraph {
    /// Shortest undirected join path between two tables, as the full vertex
    /// sequence from `left` to `right` inclusive.
    ///
    /// A degenerate `left == right` request returns a single-vertex path.
    /// Ties between equal-length paths break deterministically: BFS explores
    /// neighbors in ascending dense-index order.
    pub fn shortest_path(&self, left: &str, right: &str) -> ResolveResult<Vec<NodeIndex>> {
        let endpoints = self.ensure_known(&[left, right])?;
        let (source, target) = (endpoints[0], endpoints[1]);

        if source == target {
            return Ok(vec![source]);
        }
        if self.components[source.index()] != self.components[target.index()] {
            return Err(ResolveError::NoJoinPath {
                tables: vec![left.to_string(), right.to_string()],
            });
        }

        let (_, pred) = self.bfs_tree(source);
        Ok(reconstruct_path(&pred, source, target))
    }

    /// Shortest join path between two tables, materialized as join steps.
    pub fn join_path(&self, left: &str, right: &str) -> ResolveResult<Vec<JoinStep>> {
        let path = self.shortest_path(left, right)?;
        path.windows(2)
            .map(|pair| self.edge_step(pair[0], pair[1]))
            .collect()
    }

    /// Minimal join network connecting all requested tables, as an ordered
    /// sequence of join steps suitable for sequential `JOIN` emission.
    ///
    /// Computes a 2-approximate Steiner tree: BFS distances between the
    /// requested terminals, a minimum spanning tree over the
    /// terminal-distance graph, and expansion of each MST edge back into its
    /// underlying shortest path. The resulting edge set is ordered by a
    /// breadth-first traversal from the first requested table.
    ///
    /// Duplicates in `tables` are dropped (first occurrence wins); fewer
    /// than two distinct names is an error.
    pub fn connect(&self, tables: &[&str]) -> ResolveResult<Vec<JoinStep>> {
        let mut requested: Vec<&str> = Vec::with_capacity(tables.len());
        for &table in tables {
            if !requested.contains(&table) {
                requested.push(table);
            }
        }
        if requested.len() < 2 {
            return Err(ResolveError::InsufficientTables(requested.len()));
        }

        let terminals = self.ensure_known(&requested)?;
        let component = self.components[terminals[0].index()];
        if terminals
            .iter()
            .any(|t| self.components[t.index()] != component)
        {
            return Err(ResolveError::NoJoinPath {
                tables: requested.iter().map(|t| t.to_string()).collect(),
            });
        }

        // One BFS per terminal; trees are reused for MST-edge expansion.
        let trees: Vec<_> = terminals.iter().map(|&t| self.bfs_tree(t)).collect();

        // Complete weighted graph over the terminals alone.
        let k = terminals.len();
        let mut terminal_graph = UnGraph::<usize, u32>::with_capacity(k, k * (k - 1) / 2);
        let nodes: Vec<NodeIndex> = (0..k).map(|i| terminal_graph.add_node(i)).collect();
        for i in 0..k {
            for j in (i + 1)..k {
                if let Some(dist) = trees[i].0[terminals[j].index()] {
                    terminal_graph.add_edge(nodes[i], nodes[j], dist);
                }
            }
        }

        // Expand each MST edge back into its shortest path and accumulate
        // the union of traversed edges, deduplicated and undirected.
        let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
        for element in min_spanning_tree(&terminal_graph) {
            if let Element::Edge { source, target, .. } = element {
                let (_, pred) = &trees[source];
                let path = reconstruct_path(pred, terminals[source], terminals[target]);
                for pair in path.windows(2) {
                    let (u, v) = (pair[0].index(), pair[1].index());
                    edges.insert((u.min(v), u.max(v)));
                }
            }
        }

        let ordered = bfs_edge_order(terminals[0].index(), &edges);
        ordered
            .into_iter()
            .map(|(u, v)| self.edge_step(NodeIndex::new(u), NodeIndex::new(v)))
            .collect()
    }

    /// Materialize the edge between two tables as a directionally-correct
    /// join step.
    ///
    /// Orientation rule: the first recorded constraint declared by `left` is
    /// used as-is; otherwise the first declared by `right` is used with each
    /// column pair reversed. When several constraints connect the pair the
    /// first match in stored (provider) order wins, deterministically.
    pub fn step_between(&self, left: &str, right: &str) -> ResolveResult<JoinStep> {
        let endpoints = self.ensure_known(&[left, right])?;
        self.edge_step(endpoints[0], endpoints[1])
    }

    fn edge_step(&self, left: NodeIndex, right: NodeIndex) -> ResolveResult<JoinStep> {
        let left_name = &self.graph[left];
        let right_name = &self.graph[right];

        let constraints = self
            .edge_constraints
            .get(&TablePair::new(left_name, right_name))
            .map(Vec::as_slice)
            .unwrap_or_default();

        for constraint in constraints {
            if constraint.from_table == *left_name && constraint.to_table == *right_name {
                return Ok(JoinStep {
                    left_table: left_name.clone(),
                    right_table: right_name.clone(),
                    column_pairs: constraint.column_pairs.clone(),
                    constraint_name: constraint.name.clone(),
                });
            }
            if constraint.from_table == *right_name && constraint.to_table == *left_name {
                let reversed = constraint
                    .column_pairs
                    .iter()
                    .map(|(from_col, to_col)| (to_col.clone(), from_col.clone()))
                    .collect();
                return Ok(JoinStep {
                    left_table: left_name.clone(),
                    right_table: right_name.clone(),
                    column_pairs: reversed,
                    constraint_name: constraint.name.clone(),
                });
            }
        }

        let known = constraints
            .iter()
            .map(|c| c.name.as_deref().unwrap_or("<unnamed>"))
            .collect::<Vec<_>>()
            .join(", ");
        Err(ResolveError::NoConstraintForEdge {
            left: left_name.clone(),
            right: right_name.clone(),
            known: if known.is_empty() {
                "<none>".to_string()
            } else {
                known
            },
        })
    }

    /// Resolve names to node indices, or fail listing every unknown name
    /// together with the full available set.
    fn ensure_known(&self, names: &[&str]) -> ResolveResult<Vec<NodeIndex>> {
        let unknown: Vec<String> = names
            .iter()
            .filter(|name| !self.table_index.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !unknown.is_empty() {
            let mut available: Vec<String> =
                self.table_index.keys().cloned().collect();
            available.sort();
            return Err(ResolveError::UnknownTable { unknown, available });
        }
        Ok(names.iter().map(|name| self.table_index[*name]).collect())
    }

    /// Unweighted BFS from `start`, returning per-node distance and
    /// predecessor arrays. Neighbors are explored in ascending index order
    /// so tie-breaking is deterministic for a fixed snapshot.
    fn bfs_tree(&self, start: NodeIndex) -> (Vec<Option<u32>>, Vec<Option<NodeIndex>>) {
        let n = self.graph.node_count();
        let mut dist: Vec<Option<u32>> = vec![None; n];
        let mut pred: Vec<Option<NodeIndex>> = vec![None; n];
        let mut queue = VecDeque::new();

        dist[start.index()] = Some(0);
        queue.push_back((start, 0u32));

        while let Some((current, depth)) = queue.pop_front() {
            let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(current).collect();
            neighbors.sort_unstable();
            neighbors.dedup();
            for neighbor in neighbors {
                if dist[neighbor.index()].is_none() {
                    dist[neighbor.index()] = Some(depth + 1);
                    pred[neighbor.index()] = Some(current);
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        (dist, pred)
    }
}

/// Walk a BFS predecessor array back from `target` to `source` and return
/// the vertex sequence in source→target order.
fn reconstruct_path(
    pred: &[Option<NodeIndex>],
    source: NodeIndex,
    target: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match pred[current.index()] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Breadth-first ordering of an undirected edge set from `start`, yielding
/// directed `(from, to)` pairs forming a connected, acyclic sequence.
fn bfs_edge_order(start: usize, edges: &BTreeSet<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for &(u, v) in edges {
        adjacency.entry(u).or_default().push(v);
        adjacency.entry(v).or_default().push(u);
    }
    for neighbors in adjacency.values_mut() {
        neighbors.sort_unstable();
    }

    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut ordered = Vec::with_capacity(edges.len());

    while let Some(u) = queue.pop_front() {
        for &v in adjacency.get(&u).map(Vec::as_slice).unwrap_or_default() {
            if seen.insert(v) {
                queue.push_back(v);
                ordered.push((u, v));
            }
        }
    }
    ordered
}
