//! Textual rendering of join plans.
//!
//! Presentation layer over resolved [`JoinStep`]s: the first table becomes a
//! `FROM` clause and every step becomes a `JOIN ... ON ...` line, with
//! identifiers quoted ANSI-style. The resolver's output is usable here
//! without further transformation.

use crate::graph::JoinStep;

/// Quote an identifier with double quotes (ANSI style), doubling any
/// embedded quote characters.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Render one step as a `JOIN` clause:
/// `JOIN "right" ON "left"."lcol" = "right"."rcol" [AND ...]`.
pub fn render_join_step(step: &JoinStep) -> String {
    let condition = step
        .column_pairs
        .iter()
        .map(|(left_col, right_col)| {
            format!(
                "{}.{} = {}.{}",
                quote_ident(&step.left_table),
                quote_ident(left_col),
                quote_ident(&step.right_table),
                quote_ident(right_col),
            )
        })
        .collect::<Vec<_>>()
        .join(" AND ");
    format!("JOIN {} ON {}", quote_ident(&step.right_table), condition)
}

/// Render a resolved join path as `FROM`/`JOIN` lines, one clause per line.
///
/// Returns `None` for an empty path (a degenerate same-table resolution has
/// no joins to render).
pub fn render_join_plan(steps: &[JoinStep]) -> Option<String> {
    let first = steps.first()?;
    let mut lines = vec![format!("FROM {}", quote_ident(&first.left_table))];
    lines.extend(steps.iter().map(render_join_step));
    Some(lines.join("\n"))
}
