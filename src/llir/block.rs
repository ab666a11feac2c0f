//! Basic blocks of the LLIR.
//!
//! A block owns an ordered list of nodes (topological within the block),
//! distinguished input nodes, one memory input, an output set, and at most
//! one terminator. Blocks move through a small state machine:
//! `Empty -> Building -> Finished -> Finalized`; the terminator slot is
//! immutable once set, except for the critical-edge retargeting performed by
//! the phi resolver.

use super::node::{LlirBlockId, LlirNodeId};

/// Lifecycle state of a basic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Empty,
    Building,
    Finished,
    Finalized,
}

/// One basic block. Node storage lives in the [`LlirGraph`](super::LlirGraph)
/// arena; the block holds ids only.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    id: LlirBlockId,
    label: String,
    nodes: Vec<LlirNodeId>,
    inputs: Vec<LlirNodeId>,
    memory_input: LlirNodeId,
    outputs: Vec<LlirNodeId>,
    terminator: Option<LlirNodeId>,
    state: BlockState,
}

impl BasicBlock {
    pub(super) fn new(id: LlirBlockId, memory_input: LlirNodeId) -> Self {
        BasicBlock {
            id,
            label: format!("{id}"),
            nodes: vec![memory_input],
            inputs: Vec::new(),
            memory_input,
            outputs: Vec::new(),
            terminator: None,
            state: BlockState::Empty,
        }
    }

    pub fn id(&self) -> LlirBlockId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// All nodes of the block in placement order, inputs and memory input
    /// included. Phi copies land after the terminator; intra-block order is
    /// the scheduler's business.
    pub fn nodes(&self) -> &[LlirNodeId] {
        &self.nodes
    }

    pub fn inputs(&self) -> &[LlirNodeId] {
        &self.inputs
    }

    pub fn memory_input(&self) -> LlirNodeId {
        self.memory_input
    }

    pub fn outputs(&self) -> &[LlirNodeId] {
        &self.outputs
    }

    pub fn terminator(&self) -> Option<LlirNodeId> {
        self.terminator
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub(super) fn push_node(&mut self, node: LlirNodeId) {
        // Phi copies are still placed once the terminator is set; only a
        // finalized block is closed for nodes.
        debug_assert!(
            self.state != BlockState::Finalized,
            "node added to a finalized block"
        );
        self.nodes.push(node);
        if self.state == BlockState::Empty {
            self.state = BlockState::Building;
        }
    }

    pub(super) fn push_input(&mut self, node: LlirNodeId) {
        self.inputs.push(node);
    }

    pub(super) fn push_output(&mut self, node: LlirNodeId) -> bool {
        if self.outputs.contains(&node) {
            return false;
        }
        self.outputs.push(node);
        true
    }

    pub(super) fn set_terminator(&mut self, node: LlirNodeId) {
        debug_assert!(self.terminator.is_none(), "block finished twice");
        self.terminator = Some(node);
        self.state = BlockState::Finished;
    }

    pub(super) fn set_finalized(&mut self) {
        if self.terminator.is_some() {
            self.state = BlockState::Finalized;
        }
    }
}
