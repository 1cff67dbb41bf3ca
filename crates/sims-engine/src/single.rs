//! Single-threaded search engine (C4).
//!
//! A depth-first search over an [`Arena`]-backed [`ArenaFrame`]: at each
//! incomplete frame, locate the first empty slot, branch over every
//! target vertex that would not immediately collide, and recurse into a
//! fresh arena frame for each surviving branch. Grounded in
//! `simsTree.cpp::_recurse` (the reference implementation's
//! single-threaded walk).

use sims_core::{
    may_be_minimal, relators_lift, relators_may_lift, Arena, ArenaFrame, CoveringGraph, HeapNode,
    Relator,
};

use crate::error::EngineError;

/// Enumerate every complete covering graph reachable from `root` for
/// which every relator in `short` lifts at every step and every relator
/// in `long` lifts once the graph is complete, in the deterministic order
/// produced by always branching over increasing candidate vertices at the
/// lexicographically-least empty slot.
pub fn enumerate_single_threaded(
    root: &HeapNode,
    short: &[Relator],
    long: &[Relator],
) -> Result<Vec<HeapNode>, EngineError> {
    let arena = Arena::new(root);
    let mut results = Vec::new();
    recurse(arena.root(), short, long, &mut results)?;
    Ok(results)
}

fn recurse(
    frame: ArenaFrame<'_>,
    short: &[Relator],
    long: &[Relator],
    results: &mut Vec<HeapNode>,
) -> Result<(), EngineError> {
    if frame.is_complete() {
        if relators_lift(&frame, long)? {
            let mut fresh: HeapNode = frame.into();
            if relators_may_lift(&mut fresh, short, (0, 0), 0) {
                results.push(fresh);
            }
        }
        return Ok(());
    }

    let (letter, u) = frame.first_empty_slot();
    let m = (frame.degree() + 1).min(frame.max_degree());
    for v in 1..=m {
        if frame.act_by(-letter, v) != 0 {
            continue;
        }
        let mut child = frame.child();
        child.add_edge(letter, u, v);
        if !relators_may_lift(&mut child, short, (letter, u), v) {
            frame.release_children();
            continue;
        }
        if !may_be_minimal(&child) {
            frame.release_children();
            continue;
        }
        recurse(child, short, long, results)?;
        frame.release_children();
    }
    Ok(())
}
