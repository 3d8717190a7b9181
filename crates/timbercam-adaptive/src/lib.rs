#![warn(missing_docs)]

//! Adaptive clearing toolpath engine for timber joinery machining.
//!
//! Given the outlines of a joint face and its stock, this crate drives a
//! 2D adaptive-clearing solver, stages the result over depth passes,
//! expands it into a motion program with helix-ramped entries, and places
//! that program into the joint's real position and orientation in the
//! assembly.
//!
//! # Pipeline
//!
//! 1. [`SolveRequest`] — everything that influences the 2D solve
//! 2. [`SolveCache`] — skips re-solving when the request is unchanged
//! 3. [`AdaptiveSolver`] — the black-box 2D clearing algorithm
//! 4. [`DepthParams`] — Z staging from start depth to final depth
//! 5. [`generate_program`] — depth-staged motion commands
//! 6. [`placement`] — coordinate completion and rigid frame placement
//!
//! [`AdaptiveOperation`] wires the stages together for one joint feature.
//!
//! # Example
//!
//! ```
//! use timbercam_adaptive::{
//!     AdaptiveOperation, AdaptiveSolver, CancelToken, SolveRequest, SolveResult,
//! };
//! use timbercam_outline::{mortise_slot, stock_rectangle};
//!
//! // Any 2D adaptive-clearing implementation plugs in at the trait seam.
//! struct NoopSolver;
//!
//! impl AdaptiveSolver for NoopSolver {
//!     fn solve(&self, _request: &SolveRequest, _cancel: &CancelToken) -> SolveResult {
//!         SolveResult::empty()
//!     }
//! }
//!
//! let mut op = AdaptiveOperation::default();
//! op.depths.step_down = 10.0;
//! op.depths.final_depth = -60.0;
//!
//! let base = mortise_slot(70.0, 30.0);
//! let stock = stock_rectangle(102.0, 102.0);
//! let program = op
//!     .execute(&base, &stock, &NoopSolver, &CancelToken::new())
//!     .unwrap();
//! assert!(program.is_empty()); // nothing to cut is a valid outcome
//! ```

mod cache;
mod depth;
mod error;
mod motion;
mod op;
pub mod placement;
mod region;
mod request;
mod solver;

pub use cache::SolveCache;
pub use depth::{DepthParams, MIN_STEP_DOWN};
pub use error::{AdaptiveError, Result};
pub use motion::{
    generate_program, MotionCommand, MotionParams, MotionProgram, MotionVerb,
    MIN_HELIX_ANGLE_DEG,
};
pub use op::AdaptiveOperation;
pub use placement::{Frame, ToolOrientation};
pub use region::{MotionKind, PathSegment, Region, SolveResult};
pub use request::{CutSide, OperationKind, SolveRequest, MIN_TOLERANCE};
pub use solver::{AdaptiveSolver, CancelToken};
