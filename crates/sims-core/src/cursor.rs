//! The per-(relator, basepoint) lift cursor.
//!
//! The reference implementation tracks two parallel arrays keyed by
//! `(relator index, vertex)`: a "lift vertex" (the far end of the longest
//! prefix of the relator that currently lifts from that vertex, or a
//! sentinel meaning the relator already closes into a loop there) and a
//! "lift index" (where to resume walking the relator next time). The
//! sentinel shares the vertex type's value space with real vertex indices.
//!
//! Rust has cheap sum types, so the two states the sentinel distinguishes
//! (`Finished` vs. "there is more of the relator left to walk") are an enum
//! instead. "No progress yet" is not a third state: it is simply
//! `Pending { vertex: v, index: 0 }`, the same representation the
//! reference implementation uses to seed every cursor before any edge
//! exists.

use crate::types::{Degree, RelatorLen};

/// Where a single relator's lift from a single basepoint currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftCursor {
    /// The relator has been shown to lift to a loop at its basepoint.
    /// This is permanent for the lifetime of the node: once a cursor is
    /// `Finished` it is never revisited.
    Finished,
    /// The relator's walk from the basepoint has followed existing edges
    /// up to (but not including) letter `index`, arriving at `vertex`. The
    /// edge for letter `index` out of `vertex` does not exist yet.
    Pending { vertex: Degree, index: RelatorLen },
}

impl LiftCursor {
    /// The cursor for a relator that has not been walked at all yet: the
    /// lift of the empty prefix from `basepoint` is `basepoint` itself.
    pub fn fresh(basepoint: Degree) -> Self {
        LiftCursor::Pending {
            vertex: basepoint,
            index: 0,
        }
    }

    /// `true` for [`LiftCursor::Finished`].
    pub fn is_finished(&self) -> bool {
        matches!(self, LiftCursor::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cursor_has_no_progress() {
        let c = LiftCursor::fresh(4);
        assert_eq!(
            c,
            LiftCursor::Pending {
                vertex: 4,
                index: 0
            }
        );
        assert!(!c.is_finished());
    }

    #[test]
    fn finished_is_finished() {
        assert!(LiftCursor::Finished.is_finished());
    }
}
