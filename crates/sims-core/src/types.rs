//! Scalar types shared by the covering-graph data model.
//!
//! Widths are fixed to match the reference implementation: vertices and
//! degrees fit a `u8` (so `max_degree` is capped well below the thousand or
//! so that keeps recursion-depth * frame-size within a small thread stack),
//! ranks and relator lengths fit a `u16`, and letters are the signed
//! counterpart of rank.

/// Number of (positive) generators of the finitely presented group.
pub type Rank = u16;

/// A vertex index, or the current/maximal degree of a covering graph.
///
/// `0` is reserved to mean "no vertex" in slot/edge lookups.
/// [`MAX_DEGREE`] is the largest degree this crate will construct; the one
/// value above it, `Degree::MAX`, is reserved as the [`crate::cursor::LiftCursor::Finished`]
/// sentinel analogue (see `cursor.rs`).
pub type Degree = u8;

/// Largest degree this crate will construct a covering graph for.
///
/// `Degree::MAX` itself is reserved so that a "finished" lift cursor can
/// never collide with a real vertex index.
pub const MAX_DEGREE: Degree = Degree::MAX - 1;

/// A signed generator index: `+k` is the `k`-th generator, `-k` its inverse.
/// Letters are always non-zero and `abs(letter) <= rank`.
pub type Letter = i16;

/// Index into a relator word, or a relator's length.
pub type RelatorLen = u16;

/// Largest relator length representable by [`RelatorLen`].
pub const MAX_RELATOR_LEN: RelatorLen = RelatorLen::MAX;

/// A word in the free group: a sequence of non-zero signed letters.
pub type Relator = Vec<Letter>;

/// The highest `rank * max_degree` product this crate will accept.
///
/// A safety margin so that the arena-backed engines (C3/C5) stay within a
/// small worker-thread stack, not inherent to the algorithm; an
/// implementation using only the heap-owned node could relax it.
pub const MAX_RANK_DEGREE_PRODUCT: u32 = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_degree_leaves_room_for_finished_sentinel() {
        assert_eq!(MAX_DEGREE, 254);
        assert_ne!(MAX_DEGREE, Degree::MAX);
    }
}
