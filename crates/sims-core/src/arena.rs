//! Preallocated node arena (C3).
//!
//! Deep DFS recursion through [`crate::node`]'s pruning tests allocates a
//! new node at every branch. [`OwnedNode`](crate::graph::OwnedNode) clones
//! are fine for the top-level single-threaded walk, but a worker's inner
//! loop can recurse up to `1 + max_degree * rank` frames deep, and cloning
//! two `Vec`s per frame there shows up in profiles. An [`Arena`]
//! preallocates every frame's storage once, up front, and a child frame is
//! produced by copying cell values within the same buffer rather than by
//! allocating.
//!
//! Each matrix/cursor cell is a `Cell<T>`, so an [`ArenaFrame`] only needs
//! a shared reference to the arena plus its own depth index: two frames at
//! different depths never alias the same cells, so there is no actual
//! data race, and `Cell`'s interior mutability lets the borrow checker see
//! that without `unsafe`.
//!
//! Because every frame lives in one contiguous allocation, the lift
//! cursor's "finished" state is still represented the way the original
//! memory layout represents it, a vertex value of `Degree::MAX`, rather
//! than as a third array of discriminants; [`ArenaFrame`] translates that
//! encoding to and from [`LiftCursor`] at the trait boundary. `SearchNode`
//! (the heap-owned node used outside the hot loop) uses the real enum
//! throughout instead.

use std::cell::Cell;

use crate::cursor::LiftCursor;
use crate::graph::CoveringGraph;
use crate::node::{HeapNode, LiftCursors};
use crate::types::{Degree, Rank, RelatorLen};

const FINISHED: Degree = Degree::MAX;

/// A preallocated buffer of DFS frames, each a full covering-graph +
/// lift-cursor state.
pub struct Arena {
    rank: Rank,
    max_degree: Degree,
    num_relators: usize,
    frame_count: usize,
    edge_stride: usize,
    cursor_stride: usize,
    out: Vec<Cell<Degree>>,
    inc: Vec<Cell<Degree>>,
    lift_vertex: Vec<Cell<Degree>>,
    lift_index: Vec<Cell<RelatorLen>>,
    degree: Vec<Cell<Degree>>,
    num_edges: Vec<Cell<u32>>,
    slot_cache: Vec<Cell<u32>>,
    next_frame: Cell<usize>,
}

impl Arena {
    /// Allocate an arena sized for `1 + max_degree * rank` frames (the
    /// worst-case DFS depth: every recursive step adds one edge, and a
    /// complete graph has `max_degree * rank` edges) and seed frame 0 with
    /// `root`.
    pub fn new(root: &HeapNode) -> Self {
        let rank = root.rank();
        let max_degree = root.max_degree();
        let num_relators = root.num_relators();
        let frame_count = 1 + max_degree as usize * rank as usize;
        let edge_stride = rank as usize * max_degree as usize;
        let cursor_stride = num_relators * max_degree as usize;

        let arena = Arena {
            rank,
            max_degree,
            num_relators,
            frame_count,
            edge_stride,
            cursor_stride,
            out: (0..frame_count * edge_stride).map(|_| Cell::new(0)).collect(),
            inc: (0..frame_count * edge_stride).map(|_| Cell::new(0)).collect(),
            lift_vertex: (0..frame_count * cursor_stride)
                .map(|_| Cell::new(0))
                .collect(),
            lift_index: (0..frame_count * cursor_stride)
                .map(|_| Cell::new(0))
                .collect(),
            degree: (0..frame_count).map(|_| Cell::new(0)).collect(),
            num_edges: (0..frame_count).map(|_| Cell::new(0)).collect(),
            slot_cache: (0..frame_count).map(|_| Cell::new(0)).collect(),
            next_frame: Cell::new(1),
        };
        arena.seed_root(root);
        arena
    }

    fn seed_root(&self, root: &HeapNode) {
        self.degree[0].set(root.degree());
        self.num_edges[0].set(root.num_edges());
        self.slot_cache[0].set(0);
        for vertex in 1..=root.degree() {
            for label in 1..=root.rank() {
                let idx = self.edge_index(0, vertex, label);
                self.out[idx].set(root.out_entry(vertex, label));
                self.inc[idx].set(root.in_entry(vertex, label));
            }
        }
        for n in 0..root.num_relators() {
            for v in 0..root.max_degree() {
                let idx = self.cursor_index(0, n, v);
                match root.cursor(n, v) {
                    LiftCursor::Finished => self.lift_vertex[idx].set(FINISHED),
                    LiftCursor::Pending { vertex, index } => {
                        self.lift_vertex[idx].set(vertex);
                        self.lift_index[idx].set(index);
                    }
                }
            }
        }
    }

    fn edge_index(&self, depth: usize, vertex: Degree, label: Rank) -> usize {
        depth * self.edge_stride + (vertex as usize - 1) * self.rank as usize + (label as usize - 1)
    }

    fn cursor_index(&self, depth: usize, relator: usize, vertex: Degree) -> usize {
        depth * self.cursor_stride + relator * self.max_degree as usize + vertex as usize
    }

    /// The arena frame at depth 0, the root passed to [`Arena::new`].
    pub fn root(&self) -> ArenaFrame<'_> {
        ArenaFrame {
            arena: self,
            depth: 0,
        }
    }

    /// Allocate the next unused frame as a bitwise copy of `parent`,
    /// returning a handle to it. Panics if the arena's depth bound (sized
    /// for the worst-case DFS) is exceeded, which would indicate a bug in
    /// the recursion's depth accounting.
    pub fn child_of(&self, parent: &ArenaFrame<'_>) -> ArenaFrame<'_> {
        let depth = self.next_frame.get();
        assert!(
            depth < self.frame_count,
            "arena exhausted: DFS recursed deeper than the 1 + max_degree*rank bound"
        );
        self.next_frame.set(depth + 1);

        let src_edges = parent.depth * self.edge_stride..(parent.depth + 1) * self.edge_stride;
        let dst_edges = depth * self.edge_stride..(depth + 1) * self.edge_stride;
        for (src, dst) in src_edges.zip(dst_edges) {
            self.out[dst].set(self.out[src].get());
            self.inc[dst].set(self.inc[src].get());
        }

        let src_cursors = parent.depth * self.cursor_stride..(parent.depth + 1) * self.cursor_stride;
        let dst_cursors = depth * self.cursor_stride..(depth + 1) * self.cursor_stride;
        for (src, dst) in src_cursors.zip(dst_cursors) {
            self.lift_vertex[dst].set(self.lift_vertex[src].get());
            self.lift_index[dst].set(self.lift_index[src].get());
        }

        self.degree[depth].set(self.degree[parent.depth].get());
        self.num_edges[depth].set(self.num_edges[parent.depth].get());
        self.slot_cache[depth].set(self.slot_cache[parent.depth].get());

        ArenaFrame {
            arena: self,
            depth,
        }
    }

    /// Release every frame past the root for reuse by a sibling branch.
    /// Call this after a recursive call returns, so that the next sibling
    /// allocates starting from the same depth instead of growing forever.
    pub fn reset_to(&self, depth: usize) {
        self.next_frame.set(depth + 1);
    }
}

/// A handle to one frame of an [`Arena`]: a full covering-graph and
/// lift-cursor state, addressed by depth instead of by pointer.
#[derive(Clone, Copy)]
pub struct ArenaFrame<'a> {
    arena: &'a Arena,
    depth: usize,
}

impl<'a> ArenaFrame<'a> {
    /// The depth (frame index) this handle refers to.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Build a child frame of `self` in the same arena.
    pub fn child(&self) -> ArenaFrame<'a> {
        self.arena.child_of(self)
    }

    /// Release every frame allocated at a greater depth than `self` for
    /// reuse. Call this after a recursive call on a child of `self`
    /// returns, so the next sibling branch reuses the same frame slot
    /// instead of growing the arena's high-water mark with every sibling.
    pub fn release_children(&self) {
        self.arena.reset_to(self.depth);
    }
}

impl CoveringGraph for ArenaFrame<'_> {
    fn rank(&self) -> Rank {
        self.arena.rank
    }

    fn degree(&self) -> Degree {
        self.arena.degree[self.depth].get()
    }

    fn max_degree(&self) -> Degree {
        self.arena.max_degree
    }

    fn num_edges(&self) -> u32 {
        self.arena.num_edges[self.depth].get()
    }

    fn out_entry(&self, vertex: Degree, label: Rank) -> Degree {
        self.arena.out[self.arena.edge_index(self.depth, vertex, label)].get()
    }

    fn in_entry(&self, vertex: Degree, label: Rank) -> Degree {
        self.arena.inc[self.arena.edge_index(self.depth, vertex, label)].get()
    }

    fn set_out_entry(&mut self, vertex: Degree, label: Rank, value: Degree) {
        self.arena.out[self.arena.edge_index(self.depth, vertex, label)].set(value);
    }

    fn set_in_entry(&mut self, vertex: Degree, label: Rank, value: Degree) {
        self.arena.inc[self.arena.edge_index(self.depth, vertex, label)].set(value);
    }

    fn set_degree(&mut self, degree: Degree) {
        self.arena.degree[self.depth].set(degree);
    }

    fn set_num_edges(&mut self, num_edges: u32) {
        self.arena.num_edges[self.depth].set(num_edges);
    }

    fn slot_cache(&self) -> &Cell<u32> {
        &self.arena.slot_cache[self.depth]
    }
}

impl LiftCursors for ArenaFrame<'_> {
    fn num_relators(&self) -> usize {
        self.arena.num_relators
    }

    fn cursor(&self, relator: usize, vertex: Degree) -> LiftCursor {
        let idx = self.arena.cursor_index(self.depth, relator, vertex);
        let v = self.arena.lift_vertex[idx].get();
        if v == FINISHED {
            LiftCursor::Finished
        } else {
            LiftCursor::Pending {
                vertex: v,
                index: self.arena.lift_index[idx].get(),
            }
        }
    }

    fn set_cursor(&mut self, relator: usize, vertex: Degree, cursor: LiftCursor) {
        let idx = self.arena.cursor_index(self.depth, relator, vertex);
        match cursor {
            LiftCursor::Finished => self.arena.lift_vertex[idx].set(FINISHED),
            LiftCursor::Pending { vertex, index } => {
                self.arena.lift_vertex[idx].set(vertex);
                self.arena.lift_index[idx].set(index);
            }
        }
    }
}

/// Copy an arena frame's state out into a heap-owned [`HeapNode`], for
/// handing a subgraph across a boundary the arena can't follow (e.g.
/// queuing it for another worker thread).
impl From<ArenaFrame<'_>> for HeapNode {
    fn from(frame: ArenaFrame<'_>) -> Self {
        let mut node = HeapNode::new(frame.rank(), frame.max_degree(), frame.arena.num_relators)
            .expect("arena frame was built from a valid HeapNode");
        for vertex in 1..=frame.degree() {
            for label in 1..=frame.rank() {
                node.set_out_entry(vertex, label, frame.out_entry(vertex, label));
                node.set_in_entry(vertex, label, frame.in_entry(vertex, label));
            }
        }
        node.set_degree(frame.degree());
        node.set_num_edges(frame.num_edges());
        for n in 0..frame.arena.num_relators {
            for v in 0..frame.max_degree() {
                node.set_cursor(n, v, frame.cursor(n, v));
            }
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::HeapNode;

    #[test]
    fn child_frame_copies_parent_state() {
        let mut root = HeapNode::new(2, 3, 1).unwrap();
        root.add_edge(1, 1, 2);
        let arena = Arena::new(&root);
        let parent = arena.root();
        assert_eq!(parent.degree(), 2);
        assert_eq!(parent.act_by(1, 1), 2);

        let mut child = parent.child();
        child.add_edge(2, 2, 3);
        assert_eq!(child.degree(), 3);
        assert_eq!(child.act_by(1, 1), 2);
        assert_eq!(child.act_by(2, 2), 3);
        // Parent frame is untouched by writes into the child.
        assert_eq!(parent.degree(), 2);
        assert_eq!(parent.act_by(2, 2), 0);
    }

    #[test]
    fn round_trips_through_heap_node() {
        let mut root = HeapNode::new(1, 2, 1).unwrap();
        root.add_edge(1, 1, 2);
        let arena = Arena::new(&root);
        let frame = arena.root();
        let back: HeapNode = frame.into();
        assert_eq!(back.degree(), 2);
        assert_eq!(back.act_by(1, 1), 2);
    }
}
