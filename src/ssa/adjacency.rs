//! Precomputed use lists and control successors.
//!
//! The lowering needs to walk edges against the dependency direction: from a
//! definition to its users, and from a control-flow node to the block it
//! enters. Instead of a mutable back-edge facility on the graph, the maps are
//! built once per method before lowering starts and dropped at teardown.

use super::{BlockId, Graph, NodeId};

/// Reverse adjacency of one graph, read-only after construction.
pub struct Adjacency {
    /// Users of each node, in user-id order.
    uses: Vec<Vec<NodeId>>,
    /// Successor blocks of each control-flow node, in block-id order.
    ctrl_succs: Vec<Vec<BlockId>>,
}

impl Adjacency {
    /// Walk the graph once and record every use and control edge.
    pub fn build(graph: &Graph) -> Self {
        let mut uses = vec![Vec::new(); graph.node_count()];
        let mut ctrl_succs = vec![Vec::new(); graph.node_count()];

        for user in graph.node_ids() {
            for &def in graph.preds(user) {
                uses[def.0 as usize].push(user);
            }
        }
        for block in graph.block_ids() {
            for &pred in graph.block_preds(block) {
                ctrl_succs[pred.0 as usize].push(block);
            }
        }

        Adjacency { uses, ctrl_succs }
    }

    /// Nodes that list `def` as a predecessor.
    pub fn users(&self, def: NodeId) -> &[NodeId] {
        &self.uses[def.0 as usize]
    }

    /// Blocks that list `node` as a control-flow predecessor.
    pub fn ctrl_succs(&self, node: NodeId) -> &[BlockId] {
        &self.ctrl_succs[node.0 as usize]
    }
}
