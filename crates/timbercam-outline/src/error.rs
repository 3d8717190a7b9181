//! Error types for outline extraction.

use thiserror::Error;

/// Errors that can occur while extracting an outline from a face boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutlineError {
    /// The boundary has no segments.
    #[error("boundary has no segments")]
    Empty,

    /// The boundary does not close back onto its start point.
    #[error("boundary is not closed: gap of {0} between end and start")]
    NotClosed(f64),

    /// The boundary does not lie in a single z = const plane.
    #[error("boundary is not planar: z varies by {0}")]
    NotPlanar(f64),

    /// An arc segment whose start and end are not equidistant from its center.
    #[error("arc radius mismatch: {start} at start, {end} at end")]
    ArcRadiusMismatch {
        /// Distance from the arc start to the center.
        start: f64,
        /// Distance from the arc end to the center.
        end: f64,
    },
}

/// Result type for outline operations.
pub type Result<T> = std::result::Result<T, OutlineError>;
