//! Error types for the lowering core.
//!
//! Every failure here is compiler-internal: a malformed or unsupported source
//! graph, never bad user input. Lowering of the offending method is aborted
//! and the diagnostic carries the node kind and its block.

use thiserror::Error;

use crate::ssa::{BlockId, Mode, NodeId, Relation};

/// Main error type for graph lowering.
#[derive(Error, Debug)]
pub enum LowerError {
    #[error("unsupported node kind '{kind}' ({node} in {block})")]
    UnsupportedNodeKind {
        kind: &'static str,
        node: NodeId,
        block: BlockId,
    },

    #[error("unsupported conversion {from} -> {to} ({node} in {block})")]
    UnsupportedConversion {
        from: Mode,
        to: Mode,
        node: NodeId,
        block: BlockId,
    },

    #[error("unsupported branch predicate {relation:?} ({node} in {block})")]
    UnsupportedBranchPredicate {
        relation: Relation,
        node: NodeId,
        block: BlockId,
    },

    #[error("control flow projection with number {num} ({node} in {block})")]
    MalformedControlProjection {
        num: u32,
        node: NodeId,
        block: BlockId,
    },

    #[error("invariant violation: {detail} ({node} in {block})")]
    InvariantViolation {
        detail: &'static str,
        node: NodeId,
        block: BlockId,
    },
}

/// Result type alias for lowering operations.
pub type LowerResult<T> = Result<T, LowerError>;
