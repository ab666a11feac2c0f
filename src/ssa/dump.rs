//! Textual dump of a source graph.
//!
//! One line per block and per node, in id order, so that two structurally
//! identical graphs dump identically. Used behind the `dump` lowering option
//! and by tests.

use std::fmt::Write;

use super::{Graph, NodeKind};

/// Render `graph` as deterministic text.
pub fn dump_graph(graph: &Graph, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Graph {name}");

    for block in graph.block_ids() {
        let _ = write!(out, "Block {block}");
        if block == graph.start_block() {
            let _ = write!(out, " (start)");
        }
        if block == graph.end_block() {
            let _ = write!(out, " (end)");
        }
        let _ = writeln!(out);

        for &pred in graph.block_preds(block) {
            let _ = writeln!(out, "  pred {pred}");
        }

        for node in graph.node_ids() {
            if graph.block_of(node) != block {
                continue;
            }
            let data = graph.node(node);
            let _ = write!(out, "  {node}: {}", data.kind.name());
            match data.kind {
                NodeKind::Const { value } => {
                    let _ = write!(out, " {value}");
                }
                NodeKind::Proj { num } => {
                    let _ = write!(out, " {num}");
                }
                NodeKind::Cmp { relation } => {
                    let _ = write!(out, " {relation:?}");
                }
                _ => {}
            }
            let _ = write!(out, " [{}]", data.mode);
            for &pred in &data.preds {
                let _ = write!(out, " {pred}");
            }
            let _ = writeln!(out);
        }
    }

    out
}
