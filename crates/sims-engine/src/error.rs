//! Error types for `sims-engine`.

use thiserror::Error;

pub use sims_core::SearchError;

/// Fatal errors from a call to [`crate::enumerate`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// A malformed input or an internal precondition violation, reported
    /// by the data model (`sims-core`).
    #[error(transparent)]
    Search(#[from] SearchError),

    /// `num_threads` was zero, or the multi-threaded engine was invoked
    /// directly with fewer than two threads.
    #[error("num_threads must be nonzero, and at least 2 to run multi-threaded (got {0})")]
    InvalidThreadCount(usize),

    /// A worker thread in the multi-threaded engine panicked before
    /// reporting a result. The panic payload is not `Send + 'static` in
    /// general, so only a description survives across the join.
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_error_converts_via_from() {
        let err: EngineError = SearchError::InvalidRank.into();
        assert_eq!(err.to_string(), "rank must be at least 1");
    }
}
