//! Data model for the low-index subgroup search engine: covering
//! subgraphs, lift cursors, the relator-lifting and canonical-form
//! pruning tests, and the preallocated frame arena that backs the
//! hot-path depth-first search.
//!
//! `sims-core` has no notion of the search itself (no recursion, no
//! threading); see the `sims-engine` crate for that.

pub mod arena;
pub mod cursor;
pub mod error;
pub mod graph;
pub mod node;
pub mod types;

pub use arena::{Arena, ArenaFrame};
pub use cursor::LiftCursor;
pub use error::SearchError;
pub use graph::{CoveringGraph, OwnedNode};
pub use node::{relators_lift, relators_may_lift, may_be_minimal, HeapNode, LiftCursors};
pub use types::{Degree, Letter, Rank, Relator, RelatorLen, MAX_DEGREE, MAX_RANK_DEGREE_PRODUCT};
