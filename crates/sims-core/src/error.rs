//! Error types for `sims-core`.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! fatal conditions in the component design (§7): malformed inputs,
//! a `relators_lift` call on a graph that isn't a covering, and precondition
//! violations. Prunes (`relators_may_lift` / `may_be_minimal` returning
//! `false`, a `verified_add_edge` collision) are ordinary `bool` results,
//! never an `Err`, since they are expected, frequent outcomes of the search,
//! not failures.

use thiserror::Error;

use crate::types::{Degree, Letter, Rank};

/// Fatal errors produced by the covering-graph data model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// `rank` was zero.
    #[error("rank must be at least 1")]
    InvalidRank,

    /// A relator letter's absolute value exceeded `rank`, or was zero.
    #[error("relator letter {letter} is out of range for rank {rank}")]
    RelatorLetterOutOfRange { letter: Letter, rank: Rank },

    /// A relator was empty. The original implementation requires every
    /// relator to be a non-empty word; an empty one has no last letter for
    /// the lift-deduction step to close on.
    #[error("relators must be non-empty")]
    EmptyRelator,

    /// A relator reached `MAX_RELATOR_LEN`.
    #[error("relator length {len} reaches the representable maximum")]
    RelatorTooLong { len: usize },

    /// `rank * max_degree` exceeded [`crate::types::MAX_RANK_DEGREE_PRODUCT`].
    #[error("rank * max_degree ({product}) exceeds the safety bound of {bound}")]
    SafetyBoundExceeded { product: u32, bound: u32 },

    /// `relators_lift` was called on a graph that turned out not to be a
    /// covering (some letter had no outgoing edge at the given vertex).
    #[error("relators_lift: the graph is not a covering at vertex {vertex}")]
    NotACovering { vertex: Degree },

    /// A precondition was violated: `permutation_rep` on an incomplete
    /// graph, or `add_edge` into an already-occupied slot.
    #[error("precondition violated: {reason}")]
    PreconditionViolation { reason: String },
}
