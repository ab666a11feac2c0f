// This module provides the LLIR container: a per-method graph holding all
// basic blocks and nodes in stable-index arenas. Blocks and nodes reference
// each other cyclically (node -> block -> nodes -> operands), so ownership is
// centralized here and every reference is a plain id. The typed constructors
// enforce the structural invariants at creation time: one memory input per
// block, at most one input node per (block, register) pair, at most one
// terminator per block, duplicate-free output sets and schedule dependencies.

//! Block-structured low-level IR.
//!
//! The LLIR is a DAG per basic block plus a control-flow graph between
//! blocks. Register-producing nodes write width-tagged virtual registers;
//! side-effecting nodes are threaded on an explicit memory chain; values and
//! memory states crossing a block boundary are declared through per-block
//! input and output sets.

use std::fmt;
use std::fmt::Write as _;

pub mod block;
pub mod node;
pub mod reg;

pub use block::{BasicBlock, BlockState};
pub use node::{
    BinaryOp, CallTarget, LlirBlockId, LlirKind, LlirNode, LlirNodeId, MemoryLocation, Predicate,
};
pub use reg::{VirtualRegGenerator, VirtualRegister, Width};

/// One method's LLIR: blocks, nodes, and the register generator.
#[derive(Debug)]
pub struct LlirGraph {
    blocks: Vec<BasicBlock>,
    nodes: Vec<LlirNode>,
    start_block: LlirBlockId,
    reg_gen: VirtualRegGenerator,
}

impl LlirGraph {
    /// Create a graph containing only its start block.
    pub fn new() -> Self {
        let mut graph = LlirGraph {
            blocks: Vec::new(),
            nodes: Vec::new(),
            start_block: LlirBlockId(0),
            reg_gen: VirtualRegGenerator::new(),
        };
        graph.start_block = graph.new_block();
        graph
    }

    /// Create a fresh basic block with its memory input node.
    pub fn new_block(&mut self) -> LlirBlockId {
        let id = LlirBlockId(self.blocks.len() as u32);
        let memory_input = LlirNodeId(self.nodes.len() as u32);
        self.nodes.push(LlirNode::new(LlirKind::MemoryInput, id));
        self.blocks.push(BasicBlock::new(id, memory_input));
        id
    }

    pub fn new_register(&mut self, width: Width) -> VirtualRegister {
        self.reg_gen.next_register(width)
    }

    pub fn start_block(&self) -> LlirBlockId {
        self.start_block
    }

    pub fn block(&self, id: LlirBlockId) -> &BasicBlock {
        &self.blocks[id.0 as usize]
    }

    pub fn node(&self, id: LlirNodeId) -> &LlirNode {
        &self.nodes[id.0 as usize]
    }

    pub fn block_ids(&self) -> impl Iterator<Item = LlirBlockId> {
        (0..self.blocks.len() as u32).map(LlirBlockId)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn memory_input(&self, block: LlirBlockId) -> LlirNodeId {
        self.block(block).memory_input()
    }

    pub fn terminator(&self, block: LlirBlockId) -> Option<LlirNodeId> {
        self.block(block).terminator()
    }

    /// Successor blocks reached by the block's terminator.
    pub fn block_successors(&self, block: LlirBlockId) -> Vec<LlirBlockId> {
        match self.block(block).terminator() {
            Some(term) => match self.node(term).kind {
                LlirKind::Jump { target } => vec![target],
                LlirKind::Branch {
                    true_target,
                    false_target,
                    ..
                } => vec![true_target, false_target],
                _ => vec![],
            },
            None => vec![],
        }
    }

    /// The block's input node for `register`, if one exists.
    pub fn input_for(&self, block: LlirBlockId, register: VirtualRegister) -> Option<LlirNodeId> {
        self.block(block)
            .inputs()
            .iter()
            .copied()
            .find(|&input| self.node(input).result_register() == Some(register))
    }

    /// The block's input node for `register`, created on first demand.
    ///
    /// A block never carries two input nodes for the same register: a value
    /// consumed several times routes through the one input.
    pub fn get_or_add_input(
        &mut self,
        block: LlirBlockId,
        register: VirtualRegister,
    ) -> LlirNodeId {
        if let Some(input) = self.input_for(block, register) {
            return input;
        }
        let input = self.push_node(block, LlirKind::Input { dst: register });
        self.blocks[block.0 as usize].push_input(input);
        input
    }

    /// Add `node` to the block's output set. Duplicates are ignored.
    pub fn add_output(&mut self, block: LlirBlockId, node: LlirNodeId) {
        self.blocks[block.0 as usize].push_output(node);
    }

    /// Register `terminator` as the block's terminator.
    pub fn finish(&mut self, block: LlirBlockId, terminator: LlirNodeId) {
        debug_assert!(self.node(terminator).is_terminator());
        debug_assert_eq!(self.node(terminator).block, block);
        self.blocks[block.0 as usize].set_terminator(terminator);
    }

    /// Record that `node` must be scheduled after `after`. Duplicate-free.
    pub fn add_schedule_dep(&mut self, node: LlirNodeId, after: LlirNodeId) {
        let deps = &mut self.nodes[node.0 as usize].schedule_after;
        if !deps.contains(&after) {
            deps.push(after);
        }
    }

    /// Move every finished block to the finalized state.
    pub fn finalize_blocks(&mut self) {
        for block in &mut self.blocks {
            block.set_finalized();
        }
    }

    fn push_node(&mut self, block: LlirBlockId, kind: LlirKind) -> LlirNodeId {
        let id = LlirNodeId(self.nodes.len() as u32);
        self.nodes.push(LlirNode::new(kind, block));
        self.blocks[block.0 as usize].push_node(id);
        id
    }

    // ---- typed constructors -------------------------------------------------

    pub fn new_mov_immediate(
        &mut self,
        block: LlirBlockId,
        value: i64,
        width: Width,
    ) -> LlirNodeId {
        let dst = self.new_register(width);
        self.push_node(block, LlirKind::MovImmediate { value, dst })
    }

    /// Immediate move into a caller-provided register (phi copies).
    pub fn new_mov_immediate_into(
        &mut self,
        block: LlirBlockId,
        value: i64,
        dst: VirtualRegister,
    ) -> LlirNodeId {
        self.push_node(block, LlirKind::MovImmediate { value, dst })
    }

    pub fn new_mov_register(&mut self, block: LlirBlockId, src: LlirNodeId) -> LlirNodeId {
        let width = self
            .node(src)
            .result_register()
            .map(|reg| reg.width)
            .unwrap_or(Width::Bit64);
        let dst = self.new_register(width);
        self.push_node(block, LlirKind::MovRegister { src, dst })
    }

    /// Register move into a caller-provided register (phi copies).
    pub fn new_mov_register_into(
        &mut self,
        block: LlirBlockId,
        dst: VirtualRegister,
        src: LlirNodeId,
    ) -> LlirNodeId {
        self.push_node(block, LlirKind::MovRegister { src, dst })
    }

    pub fn new_sign_extend(&mut self, block: LlirBlockId, src: LlirNodeId) -> LlirNodeId {
        let dst = self.new_register(Width::Bit64);
        self.push_node(block, LlirKind::MovSignExtend { src, dst })
    }

    pub fn new_binary(
        &mut self,
        block: LlirBlockId,
        op: BinaryOp,
        lhs: LlirNodeId,
        rhs: LlirNodeId,
        width: Width,
    ) -> LlirNodeId {
        let dst = self.new_register(width);
        self.push_node(block, LlirKind::Binary { op, lhs, rhs, dst })
    }

    pub fn new_mov_load(
        &mut self,
        block: LlirBlockId,
        addr: MemoryLocation,
        mem: LlirNodeId,
        width: Width,
    ) -> LlirNodeId {
        let dst = self.new_register(width);
        self.push_node(block, LlirKind::MovLoad { addr, mem, dst })
    }

    pub fn new_mov_store(
        &mut self,
        block: LlirBlockId,
        addr: MemoryLocation,
        value: LlirNodeId,
        mem: LlirNodeId,
        width: Width,
    ) -> LlirNodeId {
        self.push_node(
            block,
            LlirKind::MovStore {
                addr,
                value,
                mem,
                width,
            },
        )
    }

    pub fn new_div(
        &mut self,
        block: LlirBlockId,
        dividend: LlirNodeId,
        divisor: LlirNodeId,
        mem: LlirNodeId,
        width: Width,
    ) -> LlirNodeId {
        let dst = self.new_register(width);
        self.push_node(
            block,
            LlirKind::Div {
                dividend,
                divisor,
                mem,
                dst,
            },
        )
    }

    pub fn new_mod(
        &mut self,
        block: LlirBlockId,
        dividend: LlirNodeId,
        divisor: LlirNodeId,
        mem: LlirNodeId,
        width: Width,
    ) -> LlirNodeId {
        let dst = self.new_register(width);
        self.push_node(
            block,
            LlirKind::Mod {
                dividend,
                divisor,
                mem,
                dst,
            },
        )
    }

    pub fn new_call(
        &mut self,
        block: LlirBlockId,
        target: CallTarget,
        mem: LlirNodeId,
        args: Vec<LlirNodeId>,
        result: Option<Width>,
    ) -> LlirNodeId {
        let dst = result.map(|width| self.new_register(width));
        self.push_node(
            block,
            LlirKind::Call {
                target,
                mem,
                args,
                dst,
            },
        )
    }

    pub fn new_cmp(&mut self, block: LlirBlockId, lhs: LlirNodeId, rhs: LlirNodeId) -> LlirNodeId {
        self.push_node(block, LlirKind::Cmp { lhs, rhs })
    }

    pub fn new_jump(&mut self, block: LlirBlockId, target: LlirBlockId) -> LlirNodeId {
        self.push_node(block, LlirKind::Jump { target })
    }

    pub fn new_branch(
        &mut self,
        block: LlirBlockId,
        predicate: Predicate,
        cmp: LlirNodeId,
        true_target: LlirBlockId,
        false_target: LlirBlockId,
    ) -> LlirNodeId {
        self.push_node(
            block,
            LlirKind::Branch {
                predicate,
                cmp,
                true_target,
                false_target,
            },
        )
    }

    pub fn new_return(&mut self, block: LlirBlockId, value: Option<LlirNodeId>) -> LlirNodeId {
        self.push_node(block, LlirKind::Return { value })
    }

    // ---- critical-edge retargeting -----------------------------------------

    /// Point a jump terminator at a new target block.
    pub fn retarget_jump(&mut self, jump: LlirNodeId, new_target: LlirBlockId) {
        match &mut self.nodes[jump.0 as usize].kind {
            LlirKind::Jump { target } => *target = new_target,
            _ => debug_assert!(false, "retarget_jump on a non-jump node"),
        }
    }

    /// Point one edge of a branch terminator at a new target block.
    pub fn retarget_branch(&mut self, branch: LlirNodeId, true_edge: bool, new_target: LlirBlockId) {
        match &mut self.nodes[branch.0 as usize].kind {
            LlirKind::Branch {
                true_target,
                false_target,
                ..
            } => {
                if true_edge {
                    *true_target = new_target;
                } else {
                    *false_target = new_target;
                }
            }
            _ => debug_assert!(false, "retarget_branch on a non-branch node"),
        }
    }

    // ---- printing ----------------------------------------------------------

    /// Render the graph as deterministic text, blocks label-first.
    pub fn print(&self) -> String {
        let mut out = String::new();
        for block_id in self.block_ids() {
            let block = self.block(block_id);
            let _ = writeln!(out, "{}:", block.label());
            if !block.inputs().is_empty() {
                let _ = write!(out, "  inputs:");
                for &input in block.inputs() {
                    if let Some(reg) = self.node(input).result_register() {
                        let _ = write!(out, " {reg}");
                    }
                }
                let _ = writeln!(out);
            }
            for &node in block.nodes() {
                let _ = writeln!(out, "  {}", self.format_node(node));
            }
            if !block.outputs().is_empty() {
                let _ = write!(out, "  outputs:");
                for &output in block.outputs() {
                    let _ = write!(out, " {}", self.operand_name(output));
                }
                let _ = writeln!(out);
            }
        }
        out
    }

    fn operand_name(&self, node: LlirNodeId) -> String {
        match self.node(node).result_register() {
            Some(reg) => format!("{reg}"),
            None => format!("{node}"),
        }
    }

    fn format_node(&self, id: LlirNodeId) -> String {
        let node = self.node(id);
        match &node.kind {
            LlirKind::MovImmediate { value, dst } => format!("mov ${value} -> {dst}"),
            LlirKind::MovRegister { src, dst } => {
                format!("mov {} -> {dst}", self.operand_name(*src))
            }
            LlirKind::MovSignExtend { src, dst } => {
                format!("movsx {} -> {dst}", self.operand_name(*src))
            }
            LlirKind::Binary { op, lhs, rhs, dst } => format!(
                "{} {}, {} -> {dst}",
                op.mnemonic(),
                self.operand_name(*lhs),
                self.operand_name(*rhs)
            ),
            LlirKind::MovLoad { addr, dst, .. } => {
                format!("mov [{}] -> {dst}", self.operand_name(addr.base))
            }
            LlirKind::MovStore { addr, value, .. } => format!(
                "mov {} -> [{}]",
                self.operand_name(*value),
                self.operand_name(addr.base)
            ),
            LlirKind::Div {
                dividend,
                divisor,
                dst,
                ..
            } => format!(
                "idiv {}, {} -> {dst}",
                self.operand_name(*dividend),
                self.operand_name(*divisor)
            ),
            LlirKind::Mod {
                dividend,
                divisor,
                dst,
                ..
            } => format!(
                "imod {}, {} -> {dst}",
                self.operand_name(*dividend),
                self.operand_name(*divisor)
            ),
            LlirKind::Call {
                target, args, dst, ..
            } => {
                let mut text = match target {
                    CallTarget::Method(method) => format!("call {method}("),
                    CallTarget::Allocate => "call alloc(".to_string(),
                };
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        text.push_str(", ");
                    }
                    text.push_str(&self.operand_name(arg));
                }
                text.push(')');
                if let Some(dst) = dst {
                    let _ = write!(text, " -> {dst}");
                }
                text
            }
            LlirKind::Input { dst } => format!("input {dst}"),
            LlirKind::MemoryInput => "meminput".to_string(),
            LlirKind::Cmp { lhs, rhs } => format!(
                "cmp {}, {}",
                self.operand_name(*lhs),
                self.operand_name(*rhs)
            ),
            LlirKind::Jump { target } => format!("jmp {}", self.block(*target).label()),
            LlirKind::Branch {
                predicate,
                true_target,
                false_target,
                ..
            } => format!(
                "{} {} else {}",
                predicate.mnemonic(),
                self.block(*true_target).label(),
                self.block(*false_target).label()
            ),
            LlirKind::Return { value } => match value {
                Some(value) => format!("ret {}", self.operand_name(*value)),
                None => "ret".to_string(),
            },
        }
    }
}

impl Default for LlirGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LlirGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}
