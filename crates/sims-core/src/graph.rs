//! The covering-subgraph data model (C1).
//!
//! A [`CoveringGraph`] stores a (possibly partial) directed, rank()-labeled
//! multigraph on vertices `1..=degree()` as two dense matrices, `out` and
//! `in`, each of size `max_degree() * rank()`. Vertex `0` is reserved to
//! mean "no vertex": a zero entry in either matrix means the corresponding
//! edge does not exist yet. If there is an edge labeled `l` from `i` to
//! `j`, then `out[i, l] == j` and `in[j, l] == i`.
//!
//! [`OwnedNode`] is the straightforward heap-owned implementation, used by
//! the single-threaded engine. The arena-indexed implementation used by the
//! work-stealing engine lives in `arena.rs` and implements the same trait.

use std::cell::Cell;

use crate::error::SearchError;
use crate::types::{Degree, Letter, Rank};

/// Read and write access to a covering subgraph's edge matrices.
///
/// Implemented both by [`OwnedNode`] (one heap allocation per node) and by
/// `crate::arena::ArenaFrame` (a borrowed view into a preallocated arena
/// slot, used when cloning a node on every recursive step would dominate
/// runtime).
pub trait CoveringGraph {
    /// Number of (positive) generators.
    fn rank(&self) -> Rank;

    /// Current number of vertices.
    fn degree(&self) -> Degree;

    /// Maximum number of vertices this graph can grow to.
    fn max_degree(&self) -> Degree;

    /// Number of edges added so far (an edge and its formal inverse count
    /// once).
    fn num_edges(&self) -> u32;

    /// A complete graph has an edge for every (vertex, label) pair.
    fn is_complete(&self) -> bool {
        self.num_edges() == self.rank() as u32 * self.degree() as u32
    }

    /// Raw access to the outgoing-edge matrix entry for (vertex, positive
    /// label), 1-indexed in both dimensions. `0` means no edge.
    fn out_entry(&self, vertex: Degree, label: Rank) -> Degree;

    /// Raw access to the incoming-edge matrix entry for (vertex, positive
    /// label), 1-indexed in both dimensions. `0` means no edge.
    fn in_entry(&self, vertex: Degree, label: Rank) -> Degree;

    /// Write the outgoing-edge matrix entry.
    fn set_out_entry(&mut self, vertex: Degree, label: Rank, value: Degree);

    /// Write the incoming-edge matrix entry.
    fn set_in_entry(&mut self, vertex: Degree, label: Rank, value: Degree);

    /// Grow `degree()` and/or `num_edges()` bookkeeping; called by
    /// `add_edge`/`verified_add_edge` after writing the matrices.
    fn set_degree(&mut self, degree: Degree);
    fn set_num_edges(&mut self, num_edges: u32);

    /// The monotone cache used by `first_empty_slot`. `0` means "start the
    /// scan from the beginning".
    fn slot_cache(&self) -> &Cell<u32>;

    /// Follow the edge labeled `letter` (which may be negative) out of
    /// `vertex`. Returns `0` if that edge does not exist.
    fn act_by(&self, letter: Letter, vertex: Degree) -> Degree {
        if letter > 0 {
            self.out_entry(vertex, letter as Rank)
        } else {
            self.in_entry(vertex, (-letter) as Rank)
        }
    }

    /// Add an edge labeled `letter` from `from_vertex` to `to_vertex`,
    /// normalizing a negative label by swapping the endpoints. Does not
    /// check whether the target slots are already occupied; the caller
    /// must guarantee they are empty. One endpoint may be exactly one past
    /// the current degree, in which case the degree grows by one.
    fn add_edge(&mut self, letter: Letter, from_vertex: Degree, to_vertex: Degree) {
        let (label, u, v) = normalize(letter, from_vertex, to_vertex);
        self.set_out_entry(u, label, v);
        self.set_in_entry(v, label, u);
        self.set_num_edges(self.num_edges() + 1);
        let grown = u.max(v);
        if grown == self.degree() + 1 {
            self.set_degree(grown);
        }
    }

    /// Like [`CoveringGraph::add_edge`], but refuses to overwrite an
    /// existing edge ending at `to_vertex` with the same label. Returns
    /// `true` on success.
    fn verified_add_edge(&mut self, letter: Letter, from_vertex: Degree, to_vertex: Degree) -> bool {
        let (label, u, v) = normalize(letter, from_vertex, to_vertex);
        if self.in_entry(v, label) != 0 {
            return false;
        }
        self.add_edge(letter, from_vertex, to_vertex);
        true
    }

    /// The first empty slot in row-major (vertex outer, signed label 1,
    /// -1, 2, -2, ... inner) order, starting the scan at the cached
    /// index. Returns `(0, 0)` if the graph is complete.
    ///
    /// The cache only ever moves forward: a slot once filled is never
    /// revisited by a later call within the same node, because edges are
    /// always added at the lexicographically least empty slot.
    fn first_empty_slot(&self) -> (Letter, Degree) {
        if self.is_complete() {
            return (0, 0);
        }
        let rank = self.rank() as u32;
        let degree = self.degree() as u32;
        let total = degree * 2 * rank;
        let mut idx = self.slot_cache().get();
        while idx < total {
            let (vertex, letter) = decode_slot(idx, rank);
            let occupied = if letter > 0 {
                self.out_entry(vertex, letter as Rank) != 0
            } else {
                self.in_entry(vertex, (-letter) as Rank) != 0
            };
            if !occupied {
                self.slot_cache().set(idx);
                return (letter, vertex);
            }
            idx += 1;
        }
        self.slot_cache().set(idx);
        (0, 0)
    }

    /// The permutation representation on `{0, ..., degree()-1}` induced by
    /// each generator's action. Requires the graph to be complete.
    fn permutation_rep(&self) -> Result<Vec<Vec<Degree>>, SearchError> {
        if !self.is_complete() {
            return Err(SearchError::PreconditionViolation {
                reason: "permutation_rep called on an incomplete graph".to_string(),
            });
        }
        let degree = self.degree();
        let mut reps = Vec::with_capacity(self.rank() as usize);
        for label in 1..=self.rank() {
            let mut perm = Vec::with_capacity(degree as usize);
            for i in 0..degree {
                perm.push(self.out_entry(i + 1, label) - 1);
            }
            reps.push(perm);
        }
        Ok(reps)
    }
}

/// Normalize a signed-label edge spec: a negative label swaps endpoints
/// and negates, so internal storage always keys on a positive label.
fn normalize(letter: Letter, from_vertex: Degree, to_vertex: Degree) -> (Rank, Degree, Degree) {
    if letter < 0 {
        ((-letter) as Rank, to_vertex, from_vertex)
    } else {
        (letter as Rank, from_vertex, to_vertex)
    }
}

/// Decode a linear slot index back into (vertex, signed letter), matching
/// the encoding used by `first_empty_slot`'s scan order: vertex outer,
/// then signed label in the sequence 1, -1, 2, -2, ..., rank, -rank.
fn decode_slot(idx: u32, rank: u32) -> (Degree, Letter) {
    let per_vertex = 2 * rank;
    let vertex = (idx / per_vertex) as Degree + 1;
    let within = idx % per_vertex;
    let label = (within / 2) as Rank + 1;
    let letter = if within % 2 == 0 {
        label as Letter
    } else {
        -(label as Letter)
    };
    (vertex, letter)
}

/// A heap-owned covering graph: one `Vec<Degree>` per matrix.
///
/// This is the node representation used by the single-threaded engine
/// (C4), where a child node is produced by cloning its parent outright.
#[derive(Debug, Clone)]
pub struct OwnedNode {
    rank: Rank,
    max_degree: Degree,
    degree: Degree,
    num_edges: u32,
    out: Vec<Degree>,
    r#in: Vec<Degree>,
    slot_cache: Cell<u32>,
}

impl OwnedNode {
    /// A fresh node with no edges and a single vertex (the basepoint).
    pub fn new(rank: Rank, max_degree: Degree) -> Result<Self, SearchError> {
        if rank == 0 {
            return Err(SearchError::InvalidRank);
        }
        let product = rank as u32 * max_degree as u32;
        if product > crate::types::MAX_RANK_DEGREE_PRODUCT {
            return Err(SearchError::SafetyBoundExceeded {
                product,
                bound: crate::types::MAX_RANK_DEGREE_PRODUCT,
            });
        }
        let cells = rank as usize * max_degree as usize;
        Ok(OwnedNode {
            rank,
            max_degree,
            degree: 1,
            num_edges: 0,
            out: vec![0; cells],
            r#in: vec![0; cells],
            slot_cache: Cell::new(0),
        })
    }

    fn index(&self, vertex: Degree, label: Rank) -> usize {
        (vertex as usize - 1) * self.rank as usize + (label as usize - 1)
    }
}

impl CoveringGraph for OwnedNode {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn degree(&self) -> Degree {
        self.degree
    }

    fn max_degree(&self) -> Degree {
        self.max_degree
    }

    fn num_edges(&self) -> u32 {
        self.num_edges
    }

    fn out_entry(&self, vertex: Degree, label: Rank) -> Degree {
        self.out[self.index(vertex, label)]
    }

    fn in_entry(&self, vertex: Degree, label: Rank) -> Degree {
        self.r#in[self.index(vertex, label)]
    }

    fn set_out_entry(&mut self, vertex: Degree, label: Rank, value: Degree) {
        let idx = self.index(vertex, label);
        self.out[idx] = value;
    }

    fn set_in_entry(&mut self, vertex: Degree, label: Rank, value: Degree) {
        let idx = self.index(vertex, label);
        self.r#in[idx] = value;
    }

    fn set_degree(&mut self, degree: Degree) {
        self.degree = degree;
    }

    fn set_num_edges(&mut self, num_edges: u32) {
        self.num_edges = num_edges;
    }

    fn slot_cache(&self) -> &Cell<u32> {
        &self.slot_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_has_one_vertex_and_no_edges() {
        let n = OwnedNode::new(2, 4).unwrap();
        assert_eq!(n.degree(), 1);
        assert_eq!(n.num_edges(), 0);
        assert!(!n.is_complete());
    }

    #[test]
    fn add_edge_grows_degree_and_sets_both_matrices() {
        let mut n = OwnedNode::new(2, 4).unwrap();
        n.add_edge(1, 1, 2);
        assert_eq!(n.degree(), 2);
        assert_eq!(n.num_edges(), 1);
        assert_eq!(n.act_by(1, 1), 2);
        assert_eq!(n.act_by(-1, 2), 1);
    }

    #[test]
    fn negative_letter_add_edge_swaps_endpoints() {
        let mut n = OwnedNode::new(2, 4).unwrap();
        n.add_edge(-1, 2, 1);
        assert_eq!(n.act_by(1, 1), 2);
        assert_eq!(n.act_by(-1, 2), 1);
    }

    #[test]
    fn verified_add_edge_rejects_collision() {
        let mut n = OwnedNode::new(1, 3).unwrap();
        assert!(n.verified_add_edge(1, 1, 2));
        assert!(!n.verified_add_edge(1, 3, 2));
        assert_eq!(n.num_edges(), 1);
    }

    #[test]
    fn first_empty_slot_is_row_major_signed_order() {
        let n = OwnedNode::new(2, 3).unwrap();
        assert_eq!(n.first_empty_slot(), (1, 1));
    }

    #[test]
    fn first_empty_slot_reports_complete_as_zero_zero() {
        let mut n = OwnedNode::new(1, 2).unwrap();
        n.add_edge(1, 1, 2);
        assert!(n.is_complete());
        assert_eq!(n.first_empty_slot(), (0, 0));
    }

    #[test]
    fn permutation_rep_requires_completeness() {
        let n = OwnedNode::new(1, 2).unwrap();
        assert!(n.permutation_rep().is_err());
    }

    #[test]
    fn permutation_rep_on_complete_graph() {
        let mut n = OwnedNode::new(1, 2).unwrap();
        n.add_edge(1, 1, 2);
        n.add_edge(1, 2, 1);
        let reps = n.permutation_rep().unwrap();
        assert_eq!(reps, vec![vec![1, 0]]);
    }
}
