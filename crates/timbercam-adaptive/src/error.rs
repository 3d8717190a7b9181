//! Error types for the adaptive engine.

use thiserror::Error;
use timbercam_outline::OutlineError;

/// Errors that can occur during an adaptive recompute.
///
/// Out-of-range parameters are never errors — they clamp to safe floors.
/// Solver cancellation is not an error either; it yields a partial result.
#[derive(Error, Debug)]
pub enum AdaptiveError {
    /// A face boundary failed extraction (open, non-planar, degenerate).
    #[error("invalid geometry input: {0}")]
    InvalidGeometry(#[from] OutlineError),

    /// The target frame normal has zero length.
    #[error("target frame normal has zero length")]
    ZeroLengthNormal,

    /// The target frame direction has zero length.
    #[error("target frame direction has zero length")]
    ZeroLengthDirection,
}

/// Result type for adaptive engine operations.
pub type Result<T> = std::result::Result<T, AdaptiveError>;
