// This module implements the second phase of phi resolution. The traversal
// phase only records each phi's accumulator register and lowers its use site;
// no copy is emitted until every operand of every phi has been lowered. This
// phase then walks the recorded phis in source-id order and materializes one
// copy per predecessor edge: into the predecessor's block, or into the block
// inserted on the edge when it is critical. Cross-block operands are routed
// through input/output sets like any other value. Deferring the copies this
// way removes any need to backpatch moves whose source does not exist yet.

//! Phi resolution: predecessor copies and critical-edge blocks.

use crate::error::{LowerError, LowerResult};
use crate::llir::{LlirBlockId, LlirKind, VirtualRegister};
use crate::ssa::{BlockId, NodeId, NodeKind};

use super::driver::GraphLowering;

impl GraphLowering<'_> {
    /// Emit the predecessor copies of every recorded phi.
    pub(crate) fn resolve_phis(&mut self) -> LowerResult<()> {
        let graph = self.graph;
        let phis: Vec<(NodeId, VirtualRegister)> = self
            .phi_accumulators
            .iter()
            .map(|(&phi, &accumulator)| (phi, accumulator))
            .collect();

        for (phi, accumulator) in phis {
            let head = graph.block_of(phi);
            let head_bb = self.llir_block(phi)?;

            for index in 0..graph.preds(phi).len() {
                let operand = graph.preds(phi)[index];
                let ctrl_pred = *graph
                    .block_preds(head)
                    .get(index)
                    .ok_or_else(|| self.invariant("phi operand without matching control edge", phi))?;
                let tail = graph.block_of(ctrl_pred);

                let place_bb = if self.edges.is_critical(tail, head) {
                    self.inserted_edge_block(head, index, head_bb, ctrl_pred)?
                } else {
                    self.block_map.get(&tail).copied().ok_or_else(|| {
                        self.invariant("phi predecessor in an unmapped block", ctrl_pred)
                    })?
                };

                let mov = if let NodeKind::Const { value } = graph.kind(operand) {
                    self.llir.new_mov_immediate_into(place_bb, value, accumulator)
                } else {
                    let src = self
                        .lowered(operand)
                        .ok_or_else(|| self.invariant("phi operand was never lowered", operand))?;
                    let src = if self.llir.node(src).block != place_bb {
                        let Some(register) = self.llir.node(src).result_register() else {
                            return Err(
                                self.invariant("phi operand does not produce a register", operand)
                            );
                        };
                        self.marked_out.insert(operand, register);
                        self.llir.get_or_add_input(place_bb, register)
                    } else {
                        src
                    };
                    self.llir.new_mov_register_into(place_bb, accumulator, src)
                };

                self.llir.add_output(place_bb, mov);
                self.phi_reg_moves.push(mov);
                log::trace!("phi copy for {phi} edge {index}: {mov} in {place_bb}");
            }
        }
        Ok(())
    }

    /// The inserted block of a critical edge during phi resolution.
    ///
    /// Terminator lowering normally creates the block up front; if this edge
    /// was not reached that way, create it now, finish it with a jump to the
    /// head, and rewrite the tail's terminator onto it. Unknown terminator
    /// kinds at this junction are rejected rather than silently skipped.
    fn inserted_edge_block(
        &mut self,
        head: BlockId,
        index: usize,
        head_bb: LlirBlockId,
        ctrl_pred: NodeId,
    ) -> LowerResult<LlirBlockId> {
        if let Some(&bb) = self.inserted_blocks.get(&(head, index)) {
            return Ok(bb);
        }

        let bb = self.inserted_block(head, index);
        let jump = self.llir.new_jump(bb, head_bb);
        self.llir.finish(bb, jump);

        let tail_bb = self.llir_block(ctrl_pred)?;
        let terminator = self
            .llir
            .terminator(tail_bb)
            .ok_or_else(|| self.invariant("critical edge from an unterminated block", ctrl_pred))?;
        if matches!(self.llir.node(terminator).kind, LlirKind::Jump { .. }) {
            self.llir.retarget_jump(terminator, bb);
        } else if matches!(self.llir.node(terminator).kind, LlirKind::Branch { .. }) {
            let NodeKind::Proj { num } = self.graph.kind(ctrl_pred) else {
                return Err(self.invariant("branch edge without control projection", ctrl_pred));
            };
            match num {
                0 => self.llir.retarget_branch(terminator, false, bb),
                1 => self.llir.retarget_branch(terminator, true, bb),
                _ => {
                    return Err(LowerError::MalformedControlProjection {
                        num,
                        node: ctrl_pred,
                        block: self.graph.block_of(ctrl_pred),
                    })
                }
            }
        } else {
            return Err(
                self.invariant("cannot rewrite this terminator kind on a critical edge", ctrl_pred)
            );
        }
        Ok(bb)
    }
}
