//! Output and schedule finalization.
//!
//! Runs after phi resolution: materializes the recorded output sets (in
//! source-id order, so repeated runs produce identical LLIR) and attaches
//! schedule dependencies to phi copies that overwrite an input register of
//! their block. Outputs and dependencies are sets, so running the pass again
//! over a finalized graph changes nothing.

use crate::error::LowerResult;
use crate::llir::LlirNodeId;
use crate::ssa::NodeId;

use super::driver::GraphLowering;

impl GraphLowering<'_> {
    pub(crate) fn finalize(&mut self) -> LowerResult<()> {
        // Side effects whose memory state crosses a block boundary.
        let memory_outs: Vec<NodeId> = self.memory_outs.iter().copied().collect();
        for def in memory_outs {
            let llir = self
                .lowered(def)
                .ok_or_else(|| self.invariant("memory output was never lowered", def))?;
            let block = self.llir.node(llir).block;
            self.llir.add_output(block, llir);
        }

        // Values that acquired a cross-block consumer.
        let marked: Vec<(NodeId, crate::llir::VirtualRegister)> = self
            .marked_out
            .iter()
            .map(|(&def, &register)| (def, register))
            .collect();
        for (def, register) in marked {
            let llir = self
                .lowered(def)
                .ok_or_else(|| self.invariant("marked output was never lowered", def))?;
            match self.llir.node(llir).result_register() {
                Some(produced) => debug_assert_eq!(produced, register),
                None => {
                    return Err(self.invariant("marked output does not produce a register", def))
                }
            }
            let block = self.llir.node(llir).block;
            self.llir.add_output(block, llir);
        }

        // A phi copy that overwrites one of its block's input registers must
        // follow every other consumer of that input; otherwise a scheduler
        // could clobber the value before its last read.
        for i in 0..self.phi_reg_moves.len() {
            let mov = self.phi_reg_moves[i];
            let Some(target) = self.llir.node(mov).result_register() else {
                continue;
            };
            let block = self.llir.node(mov).block;
            let Some(input) = self.llir.input_for(block, target) else {
                continue;
            };
            let consumers: Vec<LlirNodeId> = self
                .llir
                .block(block)
                .nodes()
                .iter()
                .copied()
                .filter(|&node| node != mov && self.llir.node(node).operands().contains(&input))
                .collect();
            for consumer in consumers {
                log::trace!("schedule dep: {mov} after {consumer}");
                self.llir.add_schedule_dep(mov, consumer);
            }
        }

        self.llir.finalize_blocks();
        Ok(())
    }
}
