//! sealower - lowering of SSA sea-of-nodes graphs to a low-level IR.
//!
//! The crate bridges two structurally different IRs: an optimizer-produced,
//! SSA-form, sea-of-nodes graph per method, and a block-structured low-level
//! IR (LLIR) ready for instruction selection, register allocation, and
//! assembly emission. On the way it resolves phi functions (including the
//! swap problem and critical edges), threads memory side effects across
//! blocks as explicit dependencies, and produces a deterministic, schedulable
//! DAG per basic block.
//!
//! # Usage
//!
//! ```
//! use sealower::ssa::{Graph, MethodDescriptor, Mode, Module, NodeKind};
//! use sealower::{lower_module, LoweringOptions};
//!
//! let mut graph = Graph::new();
//! let block = graph.start_block();
//! let start = graph.start_node();
//! let mem = graph.add_node(block, NodeKind::Proj { num: 0 }, Mode::M, vec![start]);
//! let seven = graph.add_node(block, NodeKind::Const { value: 7 }, Mode::Is, vec![]);
//! let ret = graph.add_node(block, NodeKind::Return, Mode::X, vec![mem, seven]);
//! let end_block = graph.end_block();
//! graph.add_block_pred(end_block, ret);
//!
//! let mut module = Module::new();
//! module.add_method(
//!     MethodDescriptor {
//!         name: "seven".into(),
//!         param_modes: vec![],
//!         return_mode: Some(Mode::Is),
//!     },
//!     graph,
//! );
//!
//! let lowered = lower_module(&module, &LoweringOptions::default()).unwrap();
//! assert_eq!(lowered.graphs.len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`ssa`] - the source-graph model, adjacency maps, and graph dumping
//! - [`llir`] - the LLIR data model: blocks, nodes, virtual registers
//! - [`lower`] - the lowering pipeline: analysis, traversal, phi resolution,
//!   finalization
//! - [`error`] - the failure surface of the core

pub mod error;
pub mod llir;
pub mod lower;
pub mod ssa;

pub use error::{LowerError, LowerResult};
pub use lower::{lower_graph, lower_module, LoweringOptions, LoweringResult};
