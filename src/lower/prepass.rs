//! Swap-problem pre-pass.
//!
//! Parallel phi copies can form cycles (`x <- y; y <- x`): the copies written
//! into a shared predecessor block would overwrite a value the other copy
//! still has to read. A phi whose value is consumed by another phi of the
//! same block therefore reads its accumulator register into a fresh
//! temporary once, before any further use; the copies then write the
//! accumulators while every consumer reads the temporaries.
//!
//! The pass is conservative: marking a phi never produces incorrect code,
//! only an extra copy. Memory phis are excluded, they lower to the block's
//! single memory input.

use std::collections::HashSet;

use crate::ssa::{Graph, Mode, NodeId, NodeKind};

/// Collect the phis that must be read through a temporary register.
pub fn temporaried_phis(graph: &Graph) -> HashSet<NodeId> {
    let mut marked = HashSet::new();

    for node in graph.node_ids() {
        if graph.kind(node) != NodeKind::Phi || graph.mode(node) == Mode::M {
            continue;
        }
        for &operand in graph.preds(node) {
            if graph.kind(operand) == NodeKind::Phi
                && graph.mode(operand) != Mode::M
                && graph.block_of(operand) == graph.block_of(node)
            {
                marked.insert(operand);
            }
        }
    }

    marked
}
