//! The solver seam and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::region::SolveResult;
use crate::request::SolveRequest;

/// Cooperative cancellation token handed to the solver.
///
/// The solve is the one long-running step of a recompute; the token is its
/// only suspension point. A solver checks the token periodically inside
/// its iteration and stops early when it is cancelled, returning whatever
/// partial regions it has produced so far. There is no timeout and no
/// retry; a cancelled solve is simply over.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; safe from another thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A 2D adaptive-clearing algorithm.
///
/// The engine treats implementations as black boxes: their region order,
/// point order and link classification are trusted as-is, including the
/// collision-avoidance guarantees behind `LinkClear` links. An
/// implementation must honor the [`CancelToken`] and may return a partial
/// result after cancellation — partial results are valid input for motion
/// generation.
pub trait AdaptiveSolver {
    /// Solve the request into ordered clearing regions.
    fn solve(&self, request: &SolveRequest, cancel: &CancelToken) -> SolveResult;
}
