//! Low-index subgroup search engine.
//!
//! Given a finitely presented group's rank, a bound on subgroup index, and
//! its relators split into a "short" list (checked incrementally while
//! the covering graph is built) and a "long" list (checked once a
//! candidate graph is complete), [`enumerate`] returns one permutation
//! representation per conjugacy class of subgroup of index at most
//! `max_degree`.
//!
//! This crate is the search engine only: parsing relators from text,
//! deciding which relators belong in `short` vs. `long`, and picking a
//! thread count are the caller's job.

pub mod error;
mod multi;
mod single;

use sims_core::{CoveringGraph, Degree, HeapNode, Rank, Relator, MAX_DEGREE, MAX_RANK_DEGREE_PRODUCT};

pub use error::EngineError;
pub use sims_core::SearchError;

/// One permutation per generator, describing a transitive action of the
/// free group of the given rank on `{0, ..., degree-1}`.
pub type PermutationRep = Vec<Vec<Degree>>;

/// Enumerate, up to conjugacy, every subgroup of index at most
/// `max_degree` in the group presented by `rank` generators subject to
/// `short` and `long` as relations.
///
/// `num_threads == 1` runs the deterministic single-threaded engine;
/// `num_threads >= 2` runs the work-sharing multi-threaded engine, whose
/// output is the same multiset of representations in a possibly different
/// order. `num_threads == 0` is a [`EngineError::InvalidThreadCount`]:
/// auto-detecting a thread count from the environment belongs to the
/// out-of-scope top-level API this crate is embedded in, not the engine
/// itself.
///
/// # Errors
///
/// Returns [`EngineError::Search`] if `rank` is zero, a relator letter's
/// absolute value exceeds `rank`, a relator is long enough to overflow
/// the relator-length type, or `rank * max_degree` exceeds the safety
/// bound kept to protect worker thread stacks. Returns
/// [`EngineError::InvalidThreadCount`] if `num_threads == 0`.
pub fn enumerate(
    rank: Rank,
    max_degree: Degree,
    short: &[Relator],
    long: &[Relator],
    num_threads: usize,
) -> Result<Vec<PermutationRep>, EngineError> {
    if num_threads == 0 {
        return Err(EngineError::InvalidThreadCount(0));
    }
    validate_inputs(rank, max_degree, short, long)?;

    let root = HeapNode::new(rank, max_degree, short.len())?;
    let nodes = if num_threads == 1 {
        single::enumerate_single_threaded(&root, short, long)?
    } else {
        multi::enumerate_multi_threaded(&root, short, long, num_threads)?
    };

    nodes
        .iter()
        .map(|n| n.permutation_rep().map_err(EngineError::from))
        .collect()
}

fn validate_inputs(
    rank: Rank,
    max_degree: Degree,
    short: &[Relator],
    long: &[Relator],
) -> Result<(), EngineError> {
    if rank == 0 {
        return Err(SearchError::InvalidRank.into());
    }
    if max_degree > MAX_DEGREE {
        return Err(SearchError::SafetyBoundExceeded {
            product: rank as u32 * max_degree as u32,
            bound: MAX_RANK_DEGREE_PRODUCT,
        }
        .into());
    }
    let product = rank as u32 * max_degree as u32;
    if product > MAX_RANK_DEGREE_PRODUCT {
        return Err(SearchError::SafetyBoundExceeded {
            product,
            bound: MAX_RANK_DEGREE_PRODUCT,
        }
        .into());
    }
    for relator in short.iter().chain(long.iter()) {
        if relator.is_empty() {
            return Err(SearchError::EmptyRelator.into());
        }
        if relator.len() as u32 >= sims_core::RelatorLen::MAX as u32 {
            return Err(SearchError::RelatorTooLong { len: relator.len() }.into());
        }
        for &letter in relator {
            if letter == 0 || letter.unsigned_abs() as Rank > rank {
                return Err(SearchError::RelatorLetterOutOfRange { letter, rank }.into());
            }
        }
    }
    Ok(())
}
