//! Block/edge analysis for critical-edge detection.
//!
//! Walks every source block once before lowering and records the number of
//! incoming control edges and outgoing control edges per block. The map is
//! read-only afterwards; criticality of an edge is a pure predicate over it.

use crate::ssa::{BlockId, Graph};

/// Per-block control-edge counts.
pub struct BlockEdges {
    incoming: Vec<u32>,
    outgoing: Vec<u32>,
}

impl BlockEdges {
    pub fn analyze(graph: &Graph) -> Self {
        let mut incoming = vec![0; graph.block_count()];
        let mut outgoing = vec![0; graph.block_count()];

        for block in graph.block_ids() {
            incoming[block.0 as usize] = graph.block_preds(block).len() as u32;
            for &pred in graph.block_preds(block) {
                outgoing[graph.block_of(pred).0 as usize] += 1;
            }
        }

        BlockEdges { incoming, outgoing }
    }

    pub fn incoming(&self, block: BlockId) -> u32 {
        self.incoming[block.0 as usize]
    }

    pub fn outgoing(&self, block: BlockId) -> u32 {
        self.outgoing[block.0 as usize]
    }

    /// A control edge is critical when its head joins several predecessors
    /// and its tail branches to several successors; phi copies for such an
    /// edge can live in neither end.
    pub fn is_critical(&self, tail: BlockId, head: BlockId) -> bool {
        self.incoming(head) > 1 && self.outgoing(tail) > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssa::{Mode, NodeKind};

    #[test]
    fn diamond_has_no_critical_edges() {
        let mut graph = Graph::new();
        let entry = graph.start_block();
        let then_block = graph.new_block();
        let else_block = graph.new_block();
        let join = graph.new_block();

        let cond = graph.add_node(entry, NodeKind::Cond, Mode::T, vec![]);
        let proj_false = graph.add_node(entry, NodeKind::Proj { num: 0 }, Mode::X, vec![cond]);
        let proj_true = graph.add_node(entry, NodeKind::Proj { num: 1 }, Mode::X, vec![cond]);
        graph.add_block_pred(then_block, proj_true);
        graph.add_block_pred(else_block, proj_false);

        let jmp_then = graph.add_node(then_block, NodeKind::Jmp, Mode::X, vec![]);
        let jmp_else = graph.add_node(else_block, NodeKind::Jmp, Mode::X, vec![]);
        graph.add_block_pred(join, jmp_then);
        graph.add_block_pred(join, jmp_else);

        let edges = BlockEdges::analyze(&graph);
        assert_eq!(edges.outgoing(entry), 2);
        assert_eq!(edges.incoming(join), 2);
        assert!(!edges.is_critical(entry, then_block));
        assert!(!edges.is_critical(then_block, join));
    }

    #[test]
    fn branch_into_join_is_critical() {
        let mut graph = Graph::new();
        let entry = graph.start_block();
        let side = graph.new_block();
        let join = graph.new_block();

        let cond = graph.add_node(entry, NodeKind::Cond, Mode::T, vec![]);
        let proj_false = graph.add_node(entry, NodeKind::Proj { num: 0 }, Mode::X, vec![cond]);
        let proj_true = graph.add_node(entry, NodeKind::Proj { num: 1 }, Mode::X, vec![cond]);
        graph.add_block_pred(side, proj_false);
        graph.add_block_pred(join, proj_true);

        let jmp_side = graph.add_node(side, NodeKind::Jmp, Mode::X, vec![]);
        graph.add_block_pred(join, jmp_side);

        let edges = BlockEdges::analyze(&graph);
        assert!(edges.is_critical(entry, join));
        assert!(!edges.is_critical(side, join));
    }
}
