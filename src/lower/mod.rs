//! Lowering of sea-of-nodes method graphs into LLIR.
//!
//! The pipeline per method: block/edge analysis, the swap-problem pre-pass,
//! the depth-first lowering traversal, phi resolution, and output/schedule
//! finalization. Methods are lowered sequentially; the core is
//! single-threaded and deterministic, so two runs over the same module
//! produce byte-identical LLIR.

use indexmap::IndexMap;

use crate::error::LowerResult;
use crate::llir::{LlirGraph, VirtualRegister};
use crate::ssa::{dump::dump_graph, MethodId, Module};

pub mod edges;
pub mod prepass;

mod driver;
mod finalize;
mod phi;

pub use edges::BlockEdges;
pub use prepass::temporaried_phis;

use driver::GraphLowering;

/// Knobs of the lowering core. No CLI flags, environment variables, or
/// on-disk state belong to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoweringOptions {
    /// Log a textual dump of each source graph before lowering it.
    pub dump: bool,
    /// Request the pattern-matching instruction selection. The selector is a
    /// separate concern layered on top of this crate; the baseline 1:1
    /// lowering is used either way.
    pub optimize: bool,
}

/// Result of lowering a whole module: one LLIR graph and one ordered
/// parameter register list per method, in method declaration order.
pub struct LoweringResult {
    pub graphs: IndexMap<MethodId, LlirGraph>,
    pub parameters: IndexMap<MethodId, Vec<VirtualRegister>>,
}

/// Lower a single method.
pub fn lower_graph(
    module: &Module,
    method: MethodId,
) -> LowerResult<(LlirGraph, Vec<VirtualRegister>)> {
    let mut lowering = GraphLowering::new(module, method);
    lowering.lower()?;
    Ok(lowering.into_result())
}

/// Lower every method of the module.
///
/// The first failing method aborts the run; its partial output is discarded
/// with the rest. Callers that want per-method salvage can drive
/// [`lower_graph`] themselves.
pub fn lower_module(module: &Module, options: &LoweringOptions) -> LowerResult<LoweringResult> {
    if options.optimize {
        log::debug!("instruction selection requested; running baseline 1:1 lowering");
    }

    let mut result = LoweringResult {
        graphs: IndexMap::new(),
        parameters: IndexMap::new(),
    };
    for method in module.method_ids() {
        let name = &module.method(method).descriptor.name;
        if options.dump {
            log::debug!("{}", dump_graph(&module.method(method).graph, name));
        }
        log::debug!("lowering {name}");
        let (graph, parameters) = lower_graph(module, method)?;
        result.graphs.insert(method, graph);
        result.parameters.insert(method, parameters);
    }
    Ok(result)
}
