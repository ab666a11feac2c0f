// This module implements the lowering driver that maps one method's
// sea-of-nodes graph onto LLIR basic blocks. A depth-first traversal seeded
// at the End node visits every data predecessor before its user, so node
// placement within a block is topological by construction. Control-flow nodes
// additionally pull in the control predecessors of their block, which makes
// the walk reach every block that can reach the end (keep-alive edges cover
// infinite loops). Values and memory states crossing a block boundary are
// routed through per-block input nodes and recorded for output
// materialization; phi copies are deferred to a second phase that runs after
// the traversal, when every operand has been lowered.

//! The per-method lowering driver.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::{LowerError, LowerResult};
use crate::llir::{
    BinaryOp, CallTarget, LlirBlockId, LlirGraph, LlirNodeId, MemoryLocation, Predicate,
    VirtualRegister, Width,
};
use crate::ssa::{Adjacency, BlockId, Graph, MethodId, Mode, Module, NodeId, NodeKind, Relation};

use super::edges::BlockEdges;
use super::prepass::temporaried_phis;

/// Width of a register holding a value of the given mode.
pub(crate) fn mode_width(mode: Mode) -> Option<Width> {
    match mode {
        Mode::Is => Some(Width::Bit32),
        Mode::Ls | Mode::P => Some(Width::Bit64),
        Mode::Bu => Some(Width::Bit8),
        _ => None,
    }
}

/// Lowering state for one method. One instance per method; all traversal
/// bookkeeping is confined here and dropped at teardown.
pub(crate) struct GraphLowering<'m> {
    module: &'m Module,
    method: MethodId,
    pub(crate) graph: &'m Graph,
    pub(crate) adjacency: Adjacency,
    pub(crate) edges: BlockEdges,
    /// Phis that must be read through a temporary register (swap problem).
    temporaried: HashSet<NodeId>,
    pub(crate) llir: LlirGraph,
    /// Source block -> LLIR block. The end block has no counterpart.
    pub(crate) block_map: HashMap<BlockId, LlirBlockId>,
    /// Blocks inserted on critical edges, keyed by (head block, pred index).
    pub(crate) inserted_blocks: HashMap<(BlockId, usize), LlirBlockId>,
    /// Source node -> its LLIR form.
    pub(crate) node_map: HashMap<NodeId, LlirNodeId>,
    /// Nodes that must become outputs of their block, with the register the
    /// consuming input nodes were keyed on. Iterated in source-id order.
    pub(crate) marked_out: BTreeMap<NodeId, VirtualRegister>,
    /// Side effects whose memory state crosses a block boundary.
    pub(crate) memory_outs: BTreeSet<NodeId>,
    /// Accumulator register per value phi. Iterated in source-id order.
    pub(crate) phi_accumulators: BTreeMap<NodeId, VirtualRegister>,
    /// Every phi copy emitted by the resolver, for schedule finalization.
    pub(crate) phi_reg_moves: Vec<LlirNodeId>,
    visited: HashSet<NodeId>,
    parameters: Vec<VirtualRegister>,
}

impl<'m> GraphLowering<'m> {
    pub(crate) fn new(module: &'m Module, method: MethodId) -> Self {
        let graph = &module.method(method).graph;
        let mut lowering = GraphLowering {
            module,
            method,
            graph,
            adjacency: Adjacency::build(graph),
            edges: BlockEdges::analyze(graph),
            temporaried: temporaried_phis(graph),
            llir: LlirGraph::new(),
            block_map: HashMap::new(),
            inserted_blocks: HashMap::new(),
            node_map: HashMap::new(),
            marked_out: BTreeMap::new(),
            memory_outs: BTreeSet::new(),
            phi_accumulators: BTreeMap::new(),
            phi_reg_moves: Vec::new(),
            visited: HashSet::new(),
            parameters: Vec::new(),
        };

        lowering
            .block_map
            .insert(graph.start_block(), lowering.llir.start_block());
        for block in graph.block_ids() {
            if block == graph.start_block() || block == graph.end_block() {
                continue;
            }
            let bb = lowering.llir.new_block();
            lowering.block_map.insert(block, bb);
        }

        lowering
    }

    /// Run all lowering phases.
    pub(crate) fn lower(&mut self) -> LowerResult<()> {
        self.create_parameter_inputs()?;
        self.visit_node(self.graph.end_node())?;
        self.resolve_phis()?;
        self.finalize()?;
        Ok(())
    }

    pub(crate) fn into_result(self) -> (LlirGraph, Vec<VirtualRegister>) {
        (self.llir, self.parameters)
    }

    // ---- shared lookups ----------------------------------------------------

    pub(crate) fn invariant(&self, detail: &'static str, node: NodeId) -> LowerError {
        LowerError::InvariantViolation {
            detail,
            node,
            block: self.graph.block_of(node),
        }
    }

    pub(crate) fn lowered(&self, node: NodeId) -> Option<LlirNodeId> {
        self.node_map.get(&node).copied()
    }

    /// The LLIR block hosting the given source node.
    pub(crate) fn llir_block(&self, node: NodeId) -> LowerResult<LlirBlockId> {
        let block = self.graph.block_of(node);
        self.block_map
            .get(&block)
            .copied()
            .ok_or_else(|| self.invariant("node in a block without LLIR counterpart", node))
    }

    fn bind(&mut self, node: NodeId, llir: LlirNodeId) {
        log::trace!(
            "{} {} -> {} in {}",
            self.graph.kind(node).name(),
            node,
            llir,
            self.llir.node(llir).block,
        );
        self.node_map.insert(node, llir);
    }

    fn value_width(&self, node: NodeId) -> LowerResult<Width> {
        mode_width(self.graph.mode(node))
            .ok_or_else(|| self.invariant("expected a value mode", node))
    }

    // ---- parameters --------------------------------------------------------

    /// Bind the method's parameter projections to input nodes in the start
    /// block, one pre-allocated register per declared parameter.
    fn create_parameter_inputs(&mut self) -> LowerResult<()> {
        let graph = self.graph;
        let module = self.module;
        let descriptor = &module.method(self.method).descriptor;
        for &mode in &descriptor.param_modes {
            let width = mode_width(mode).ok_or_else(|| {
                self.invariant("parameter with a non-value mode", graph.start_node())
            })?;
            let register = self.llir.new_register(width);
            self.parameters.push(register);
        }

        let start_block = self.llir.start_block();
        let mut bindings = Vec::new();
        for &user in self.adjacency.users(graph.start_node()) {
            if !matches!(graph.kind(user), NodeKind::Proj { .. }) || graph.mode(user) != Mode::T {
                continue;
            }
            for &arg in self.adjacency.users(user) {
                if let NodeKind::Proj { num } = graph.kind(arg) {
                    if graph.mode(arg).is_value() {
                        bindings.push((arg, num));
                    }
                }
            }
        }
        for (arg, num) in bindings {
            let register = *self
                .parameters
                .get(num as usize)
                .ok_or_else(|| self.invariant("parameter projection out of range", arg))?;
            let input = self.llir.get_or_add_input(start_block, register);
            self.bind(arg, input);
        }
        Ok(())
    }

    // ---- traversal ---------------------------------------------------------

    /// Depth-first visit: data predecessors first, then the node itself.
    /// Control-flow nodes additionally schedule the control predecessors of
    /// their block so every reachable block is lowered.
    fn visit_node(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        if self.visited.insert(node) {
            for &pred in graph.preds(node) {
                self.visit_node(pred)?;
                if graph.mode(pred) == Mode::M && graph.block_of(pred) != graph.block_of(node) {
                    self.memory_outs.insert(pred);
                }
            }
            self.dispatch(node)?;
        }

        match graph.kind(node) {
            NodeKind::End | NodeKind::Return | NodeKind::Jmp | NodeKind::Cond => {
                for &pred in graph.block_preds(graph.block_of(node)) {
                    self.visit_node(pred)?;
                }
                if graph.kind(node) == NodeKind::End {
                    for &kept in graph.keep_alive_blocks() {
                        for &pred in graph.block_preds(kept) {
                            self.visit_node(pred)?;
                        }
                    }
                }
                if graph.kind(node) == NodeKind::Return {
                    // The memory state reaching a return survives the method.
                    self.memory_outs.insert(graph.preds(node)[0]);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn dispatch(&mut self, node: NodeId) -> LowerResult<()> {
        match self.graph.kind(node) {
            // Handled elsewhere or materialized on demand.
            NodeKind::Start | NodeKind::End | NodeKind::Const { .. } | NodeKind::Address => Ok(()),
            // Compares are placed in the block of the consuming Cond.
            NodeKind::Cmp { .. } => Ok(()),
            NodeKind::Proj { .. } => self.lower_proj(node),
            NodeKind::Add => self.lower_binary(node, BinaryOp::Add),
            NodeKind::Sub => self.lower_binary(node, BinaryOp::Sub),
            NodeKind::Mul => self.lower_binary(node, BinaryOp::Mul),
            NodeKind::Div => self.lower_division(node, false),
            NodeKind::Mod => self.lower_division(node, true),
            NodeKind::And => self.lower_binary(node, BinaryOp::And),
            NodeKind::Xor => self.lower_binary(node, BinaryOp::Xor),
            NodeKind::Shl => self.lower_binary(node, BinaryOp::ShiftLeft),
            NodeKind::Shr => self.lower_binary(node, BinaryOp::ShiftRight),
            NodeKind::Shrs => self.lower_binary(node, BinaryOp::ArithShiftRight),
            NodeKind::Minus => self.lower_minus(node),
            NodeKind::Not => self.lower_not(node),
            NodeKind::Conv => self.lower_conv(node),
            NodeKind::Cond => self.lower_cond(node),
            NodeKind::Jmp => self.lower_jmp(node),
            NodeKind::Return => self.lower_return(node),
            NodeKind::Load { loaded } => self.lower_load(node, loaded),
            NodeKind::Store => self.lower_store(node),
            NodeKind::Call => self.lower_call(node),
            NodeKind::Phi => self.lower_phi(node),
            NodeKind::Unknown => self.lower_unknown(node),
        }
    }

    // ---- cross-block materialization ---------------------------------------

    /// Resolve `def` as a value operand of `user`, inside `user`'s block.
    ///
    /// Constants are materialized at every use site. A definition lowered in
    /// another block is routed through an input node keyed by its target
    /// register, and the definition is marked output-required.
    pub(crate) fn pred_value(&mut self, user: NodeId, def: NodeId) -> LowerResult<LlirNodeId> {
        let user_block = self.llir_block(user)?;

        if let NodeKind::Const { value } = self.graph.kind(def) {
            let width = self.value_width(def)?;
            return Ok(self.llir.new_mov_immediate(user_block, value, width));
        }

        if let Some(def_llir) = self.lowered(def) {
            if self.llir.node(def_llir).block == user_block {
                return Ok(def_llir);
            }
            let Some(register) = self.llir.node(def_llir).result_register() else {
                return Err(self.invariant("cross-block operand does not produce a register", user));
            };
            self.marked_out.insert(def, register);
            return Ok(self.llir.get_or_add_input(user_block, register));
        }

        // Within a block the traversal is topological, so an unlowered
        // definition must live in another block. Reserve its output register
        // now; the definition picks it up during output finalization.
        debug_assert_ne!(self.graph.block_of(def), self.graph.block_of(user));
        let register = match self.marked_out.get(&def) {
            Some(&register) => register,
            None => {
                let width = self.value_width(def)?;
                let register = self.llir.new_register(width);
                self.marked_out.insert(def, register);
                register
            }
        };
        Ok(self.llir.get_or_add_input(user_block, register))
    }

    /// Resolve `def` as the memory operand of `user`: the defining side
    /// effect when same-block, the block's memory input otherwise.
    pub(crate) fn pred_side_effect(&mut self, user: NodeId, def: NodeId) -> LowerResult<LlirNodeId> {
        let user_block = self.llir_block(user)?;
        let def_llir = self
            .lowered(def)
            .ok_or_else(|| self.invariant("side effect used before it was lowered", user))?;
        if self.llir.node(def_llir).block == user_block {
            Ok(def_llir)
        } else {
            self.memory_outs.insert(def);
            Ok(self.llir.memory_input(user_block))
        }
    }

    // ---- per-kind lowering -------------------------------------------------

    fn lower_proj(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        let pred = graph.preds(node)[0];
        match graph.mode(node) {
            // Control projections are handled by the conditional.
            Mode::X => Ok(()),
            Mode::M => {
                if graph.kind(pred) == NodeKind::Start {
                    let bb = self.llir_block(node)?;
                    let mem = self.llir.memory_input(bb);
                    self.bind(node, mem);
                } else {
                    let llir = self
                        .lowered(pred)
                        .ok_or_else(|| self.invariant("memory projection before its side effect", node))?;
                    debug_assert!(self.llir.node(llir).is_side_effect());
                    self.bind(node, llir);
                }
                Ok(())
            }
            _ => {
                if self.node_map.contains_key(&node) {
                    // Parameter projections are pre-bound.
                    return Ok(());
                }
                if self.node_map.contains_key(&pred) {
                    let llir = self.pred_value(node, pred)?;
                    self.bind(node, llir);
                }
                Ok(())
            }
        }
    }

    fn lower_binary(&mut self, node: NodeId, op: BinaryOp) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        let lhs = self.pred_value(node, graph.preds(node)[0])?;
        let rhs = self.pred_value(node, graph.preds(node)[1])?;
        let width = self.value_width(node)?;
        let llir = self.llir.new_binary(bb, op, lhs, rhs, width);
        self.bind(node, llir);
        Ok(())
    }

    /// Division and remainder trap on zero, so they sit on the memory chain
    /// like loads and stores. Predecessors are [memory, dividend, divisor].
    fn lower_division(&mut self, node: NodeId, remainder: bool) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        let mem = self.pred_side_effect(node, graph.preds(node)[0])?;
        let dividend_node = graph.preds(node)[1];
        let dividend = self.pred_value(node, dividend_node)?;
        let divisor = self.pred_value(node, graph.preds(node)[2])?;
        let width = self.value_width(dividend_node)?;
        let llir = if remainder {
            self.llir.new_mod(bb, dividend, divisor, mem, width)
        } else {
            self.llir.new_div(bb, dividend, divisor, mem, width)
        };
        self.bind(node, llir);
        Ok(())
    }

    fn lower_minus(&mut self, node: NodeId) -> LowerResult<()> {
        let bb = self.llir_block(node)?;
        let operand = self.pred_value(node, self.graph.preds(node)[0])?;
        let width = self.value_width(node)?;
        let zero = self.llir.new_mov_immediate(bb, 0, width);
        let llir = self.llir.new_binary(bb, BinaryOp::Sub, zero, operand, width);
        self.bind(node, llir);
        Ok(())
    }

    fn lower_not(&mut self, node: NodeId) -> LowerResult<()> {
        // The boolean inversion is realized at branch time by inverting the
        // branch predicate; over an already-lowered value the Not is a plain
        // alias of its operand.
        let operand = self.graph.preds(node)[0];
        if let Some(llir) = self.lowered(operand) {
            self.bind(node, llir);
        }
        Ok(())
    }

    fn lower_conv(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        let operand = graph.preds(node)[0];
        let from = graph.mode(operand);
        let to = graph.mode(node);
        if from != Mode::Is || to != Mode::Ls {
            return Err(LowerError::UnsupportedConversion {
                from,
                to,
                node,
                block: graph.block_of(node),
            });
        }
        let bb = self.llir_block(node)?;
        let src = self.pred_value(node, operand)?;
        let llir = self.llir.new_sign_extend(bb, src);
        self.bind(node, llir);
        Ok(())
    }

    /// Peel the selector chain of a conditional: any number of `Not`s around
    /// a `Cmp`, each inverting the branch predicate.
    fn branch_predicate(&self, selector: NodeId) -> LowerResult<(NodeId, Predicate)> {
        let graph = self.graph;
        match graph.kind(selector) {
            NodeKind::Not => {
                let (cmp, predicate) = self.branch_predicate(graph.preds(selector)[0])?;
                Ok((cmp, predicate.invert()))
            }
            NodeKind::Cmp { relation } => {
                let predicate = match relation {
                    Relation::Equal => Predicate::Equal,
                    Relation::Less => Predicate::LessThan,
                    Relation::LessEqual => Predicate::LessEqual,
                    Relation::Greater => Predicate::GreaterThan,
                    Relation::GreaterEqual => Predicate::GreaterEqual,
                    other => {
                        return Err(LowerError::UnsupportedBranchPredicate {
                            relation: other,
                            node: selector,
                            block: graph.block_of(selector),
                        })
                    }
                };
                Ok((selector, predicate))
            }
            other => Err(LowerError::UnsupportedNodeKind {
                kind: other.name(),
                node: selector,
                block: graph.block_of(selector),
            }),
        }
    }

    /// The successor block entered through a control-flow node.
    fn ctrl_successor(&self, node: NodeId) -> LowerResult<BlockId> {
        self.adjacency
            .ctrl_succs(node)
            .first()
            .copied()
            .ok_or_else(|| self.invariant("control-flow node without successor block", node))
    }

    /// Resolve the LLIR target of a control edge. On a critical edge this
    /// pre-creates the inserted block (finished with a jump to the original
    /// target) and returns it, so the phi resolver finds it under the same
    /// `(head, pred index)` key.
    fn insert_control_flow_edge(
        &mut self,
        start: NodeId,
        target: BlockId,
    ) -> LowerResult<LlirBlockId> {
        let target_bb = self
            .block_map
            .get(&target)
            .copied()
            .ok_or_else(|| self.invariant("control edge into an unmapped block", start))?;
        let tail = self.graph.block_of(start);
        if !self.edges.is_critical(tail, target) {
            return Ok(target_bb);
        }
        let pred_index = self
            .graph
            .block_preds(target)
            .iter()
            .position(|&pred| pred == start)
            .ok_or_else(|| self.invariant("control edge not registered with its target", start))?;
        let inserted = self.inserted_block(target, pred_index);
        if self.llir.terminator(inserted).is_none() {
            let jump = self.llir.new_jump(inserted, target_bb);
            self.llir.finish(inserted, jump);
        }
        Ok(inserted)
    }

    /// The block inserted on the critical edge `(head, pred index)`, created
    /// lazily so every edge receives at most one.
    pub(crate) fn inserted_block(&mut self, head: BlockId, pred_index: usize) -> LlirBlockId {
        if let Some(&bb) = self.inserted_blocks.get(&(head, pred_index)) {
            return bb;
        }
        let bb = self.llir.new_block();
        log::trace!("inserted {bb} on critical edge into {head} (pred {pred_index})");
        self.inserted_blocks.insert((head, pred_index), bb);
        bb
    }

    fn lower_cond(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        let selector = graph.preds(node)[0];
        let (cmp_node, predicate) = self.branch_predicate(selector)?;

        let lhs = self.pred_value(node, graph.preds(cmp_node)[0])?;
        let rhs = self.pred_value(node, graph.preds(cmp_node)[1])?;
        let cmp = self.llir.new_cmp(bb, lhs, rhs);

        let mut true_proj = None;
        let mut false_proj = None;
        for &user in self.adjacency.users(node) {
            if let NodeKind::Proj { num } = graph.kind(user) {
                if graph.mode(user) != Mode::X {
                    continue;
                }
                match num {
                    0 => false_proj = Some(user),
                    1 => true_proj = Some(user),
                    _ => {
                        return Err(LowerError::MalformedControlProjection {
                            num,
                            node: user,
                            block: graph.block_of(user),
                        })
                    }
                }
            }
        }
        let (true_proj, false_proj) = match (true_proj, false_proj) {
            (Some(t), Some(f)) => (t, f),
            _ => return Err(self.invariant("conditional without both control projections", node)),
        };

        let true_target = self.ctrl_successor(true_proj)?;
        let true_bb = self.insert_control_flow_edge(true_proj, true_target)?;
        let false_target = self.ctrl_successor(false_proj)?;
        let false_bb = self.insert_control_flow_edge(false_proj, false_target)?;

        if self.llir.terminator(bb).is_some() {
            return Err(self.invariant("block has more than one terminator", node));
        }
        let branch = self.llir.new_branch(bb, predicate, cmp, true_bb, false_bb);
        self.bind(node, branch);
        self.llir.finish(bb, branch);
        Ok(())
    }

    fn lower_jmp(&mut self, node: NodeId) -> LowerResult<()> {
        let bb = self.llir_block(node)?;
        let target = self.ctrl_successor(node)?;
        let actual = self.insert_control_flow_edge(node, target)?;
        if self.llir.terminator(bb).is_some() {
            return Err(self.invariant("block has more than one terminator", node));
        }
        let jump = self.llir.new_jump(bb, actual);
        self.llir.finish(bb, jump);
        Ok(())
    }

    fn lower_return(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        let value = if graph.preds(node).len() > 1 {
            Some(self.pred_value(node, graph.preds(node)[1])?)
        } else {
            None
        };
        if self.llir.terminator(bb).is_some() {
            return Err(self.invariant("block has more than one terminator", node));
        }
        let ret = self.llir.new_return(bb, value);
        self.llir.finish(bb, ret);
        Ok(())
    }

    fn lower_load(&mut self, node: NodeId, loaded: Mode) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        let mem = self.pred_side_effect(node, graph.preds(node)[0])?;
        let addr = self.pred_value(node, graph.preds(node)[1])?;
        let width = mode_width(loaded)
            .ok_or_else(|| self.invariant("load of a non-value mode", node))?;
        let llir = self
            .llir
            .new_mov_load(bb, MemoryLocation::base(addr), mem, width);
        self.bind(node, llir);
        Ok(())
    }

    fn lower_store(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        let mem = self.pred_side_effect(node, graph.preds(node)[0])?;
        let addr = self.pred_value(node, graph.preds(node)[1])?;
        let value_node = graph.preds(node)[2];
        let value = self.pred_value(node, value_node)?;
        let width = self.value_width(value_node)?;
        let llir = self
            .llir
            .new_mov_store(bb, MemoryLocation::base(addr), value, mem, width);
        self.bind(node, llir);
        Ok(())
    }

    fn lower_call(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        let mem = self.pred_side_effect(node, graph.preds(node)[0])?;

        // Predecessors are [memory, callee address, arguments...]; memory and
        // pointer never join the argument list.
        let mut args = Vec::new();
        for &arg in graph.preds(node).iter().skip(2) {
            args.push(self.pred_value(node, arg)?);
        }

        let module = self.module;
        let (target, result) = match graph.method_ref(node) {
            Some(callee) => {
                let descriptor = &module.method(callee).descriptor;
                let result = match descriptor.return_mode {
                    Some(mode) => Some(mode_width(mode).ok_or_else(|| {
                        self.invariant("callee returns a non-value mode", node)
                    })?),
                    None => None,
                };
                (CallTarget::Method(callee), result)
            }
            None => {
                if args.len() != 2 {
                    return Err(self.invariant("unresolved call is not an allocation", node));
                }
                (CallTarget::Allocate, Some(Width::Bit64))
            }
        };

        let llir = self.llir.new_call(bb, target, mem, args, result);
        self.bind(node, llir);
        Ok(())
    }

    fn lower_phi(&mut self, node: NodeId) -> LowerResult<()> {
        let graph = self.graph;
        let bb = self.llir_block(node)?;
        if graph.mode(node) == Mode::M {
            // Memory phis collapse into the block's single memory input.
            let mem = self.llir.memory_input(bb);
            self.bind(node, mem);
            return Ok(());
        }

        let width = self.value_width(node)?;
        let accumulator = self.llir.new_register(width);
        self.phi_accumulators.insert(node, accumulator);
        let input = self.llir.get_or_add_input(bb, accumulator);

        if self.temporaried.contains(&node) {
            // Read the accumulator once into a fresh register before any
            // further use; the phi copies of this block may overwrite the
            // accumulator before its last read.
            let copy = self.llir.new_mov_register(bb, input);
            self.bind(node, copy);
        } else {
            self.bind(node, input);
        }
        Ok(())
    }

    fn lower_unknown(&mut self, node: NodeId) -> LowerResult<()> {
        let bb = self.llir_block(node)?;
        let width = self.value_width(node)?;
        let llir = self.llir.new_mov_immediate(bb, 0, width);
        self.bind(node, llir);
        Ok(())
    }
}
