// tests/graph/connect_test.rs
//
// Multi-table connection over larger topologies: star schemas, cycles, and
// branching Steiner shapes.

use std::collections::BTreeSet;

use trellis::graph::JoinGraph;
use trellis::metadata::{ForeignKeyInfo, SchemaMetadata};

fn fk(columns: &[&str], referenced_table: &str, referenced_columns: &[&str]) -> ForeignKeyInfo {
    ForeignKeyInfo {
        name: None,
        columns: columns.iter().map(|c| c.to_string()).collect(),
        referenced_table: referenced_table.to_string(),
        referenced_columns: referenced_columns.iter().map(|c| c.to_string()).collect(),
    }
}

fn metadata(tables: &[&str], fks: &[(&str, ForeignKeyInfo)]) -> SchemaMetadata {
    let mut metadata = SchemaMetadata {
        tables: tables.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    };
    for (table, fk) in fks {
        metadata
            .foreign_keys
            .entry(table.to_string())
            .or_default()
            .push(fk.clone());
    }
    metadata
}

/// Star: one fact table referencing four dimensions.
fn star_graph() -> JoinGraph {
    JoinGraph::build(&metadata(
        &["fact", "d1", "d2", "d3", "d4"],
        &[
            ("fact", fk(&["d1_id"], "d1", &["id"])),
            ("fact", fk(&["d2_id"], "d2", &["id"])),
            ("fact", fk(&["d3_id"], "d3", &["id"])),
            ("fact", fk(&["d4_id"], "d4", &["id"])),
        ],
    ))
}

/// Cycle: a → b → c → d → a.
fn cycle_graph() -> JoinGraph {
    JoinGraph::build(&metadata(
        &["a", "b", "c", "d"],
        &[
            ("a", fk(&["b_id"], "b", &["id"])),
            ("b", fk(&["c_id"], "c", &["id"])),
            ("c", fk(&["d_id"], "d", &["id"])),
            ("d", fk(&["a_id"], "a", &["id"])),
        ],
    ))
}

/// Y shape: three two-hop arms meeting at a hub.
/// x1 - x - hub, y1 - y - hub, z1 - z - hub.
fn y_graph() -> JoinGraph {
    JoinGraph::build(&metadata(
        &["hub", "x", "y", "z", "x1", "y1", "z1"],
        &[
            ("x", fk(&["hub_id"], "hub", &["id"])),
            ("y", fk(&["hub_id"], "hub", &["id"])),
            ("z", fk(&["hub_id"], "hub", &["id"])),
            ("x1", fk(&["x_id"], "x", &["id"])),
            ("y1", fk(&["y_id"], "y", &["id"])),
            ("z1", fk(&["z_id"], "z", &["id"])),
        ],
    ))
}

fn touched_tables(steps: &[trellis::JoinStep]) -> BTreeSet<String> {
    let mut touched = BTreeSet::new();
    for step in steps {
        touched.insert(step.left_table.clone());
        touched.insert(step.right_table.clone());
    }
    touched
}

fn edge_set(steps: &[trellis::JoinStep]) -> BTreeSet<(String, String)> {
    steps
        .iter()
        .map(|s| {
            let (a, b) = (s.left_table.clone(), s.right_table.clone());
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        })
        .collect()
}

/// Every step must be sequentially JOIN-emittable: its left table has
/// already been introduced by the FROM clause or an earlier step, and its
/// right table is new.
fn assert_sequentially_joinable(steps: &[trellis::JoinStep]) {
    let mut introduced = BTreeSet::new();
    introduced.insert(steps[0].left_table.clone());
    for step in steps {
        assert!(
            introduced.contains(&step.left_table),
            "step joins from '{}' before it was introduced",
            step.left_table
        );
        assert!(
            introduced.insert(step.right_table.clone()),
            "step re-introduces '{}'",
            step.right_table
        );
    }
}

#[test]
fn star_connect_touches_only_needed_dimensions() {
    let graph = star_graph();

    let steps = graph.connect(&["d1", "d2", "d3"]).unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(
        touched_tables(&steps),
        BTreeSet::from(["d1".into(), "d2".into(), "d3".into(), "fact".into()])
    );
    // d4 is not pulled in.
    assert!(!touched_tables(&steps).contains("d4"));
    assert_sequentially_joinable(&steps);
}

#[test]
fn cycle_takes_the_short_way_around() {
    let graph = cycle_graph();

    // a and c are equidistant both ways around the cycle; ascending-index
    // BFS makes the b-side path the deterministic winner.
    let steps = graph.join_path("a", "c").unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].left_table, "a");
    assert_eq!(steps[0].right_table, "b");
    assert_eq!(steps[1].right_table, "c");

    // Repeated resolution returns the identical path.
    assert_eq!(graph.join_path("a", "c").unwrap(), steps);
}

#[test]
fn cycle_connect_two_tables_equals_pairwise_path() {
    let graph = cycle_graph();

    let connected = graph.connect(&["a", "c"]).unwrap();
    let pairwise = graph.join_path("a", "c").unwrap();
    assert_eq!(edge_set(&connected), edge_set(&pairwise));
}

#[test]
fn y_connect_reaches_all_three_leaves() {
    let graph = y_graph();

    let steps = graph.connect(&["x1", "y1", "z1"]).unwrap();
    // Three arms of two hops each.
    assert_eq!(steps.len(), 6);
    assert_eq!(
        touched_tables(&steps),
        BTreeSet::from([
            "hub".into(),
            "x".into(),
            "x1".into(),
            "y".into(),
            "y1".into(),
            "z".into(),
            "z1".into(),
        ])
    );
    assert_sequentially_joinable(&steps);
    // The traversal starts at the first requested terminal.
    assert_eq!(steps[0].left_table, "x1");
}

#[test]
fn y_connect_skips_unrequested_arm() {
    let graph = y_graph();

    let steps = graph.connect(&["x1", "y1"]).unwrap();
    assert_eq!(steps.len(), 4);
    assert!(!touched_tables(&steps).contains("z"));
    assert!(!touched_tables(&steps).contains("z1"));
}

#[test]
fn connect_all_tables_spans_the_schema() {
    let graph = star_graph();

    let steps = graph
        .connect(&["fact", "d1", "d2", "d3", "d4"])
        .unwrap();
    // A spanning tree over five tables has four edges.
    assert_eq!(steps.len(), 4);
    assert_eq!(touched_tables(&steps).len(), 5);
    assert_sequentially_joinable(&steps);
}

#[test]
fn two_components_resolve_internally_but_not_across() {
    let graph = JoinGraph::build(&metadata(
        &["a", "b", "p", "q"],
        &[
            ("a", fk(&["b_id"], "b", &["id"])),
            ("p", fk(&["q_id"], "q", &["id"])),
        ],
    ));

    assert_eq!(graph.connect(&["a", "b"]).unwrap().len(), 1);
    assert_eq!(graph.connect(&["p", "q"]).unwrap().len(), 1);

    let err = graph.connect(&["a", "q"]).unwrap_err();
    assert!(err.to_string().contains("no join path"));
}

#[test]
fn connect_is_deterministic_across_calls() {
    let graph = y_graph();

    let first = graph.connect(&["x1", "y1", "z1"]).unwrap();
    for _ in 0..4 {
        assert_eq!(graph.connect(&["x1", "y1", "z1"]).unwrap(), first);
    }
}
