//! Solve request assembly.

use serde::{Deserialize, Serialize};
use timbercam_outline::Outline;

/// Lower bound on the solver tolerance, in mm. Values below this are
/// silently clamped.
pub const MIN_TOLERANCE: f64 = 0.001;

/// What the operation removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// Clear the whole region down to the base face.
    Clearing,
    /// Follow the base contour only.
    Profiling,
}

/// Which side of the base face the tool cuts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutSide {
    /// Cut outside the base contour (tenons, tongues).
    Outside,
    /// Cut inside the base contour (mortises, holes).
    Inside,
}

/// Everything that influences the 2D solve, and nothing else.
///
/// Two requests that compare equal produce identical solver output, so
/// equality gates cache reuse (see [`crate::SolveCache`]). Depth, feed and
/// placement parameters deliberately stay out: they only affect the motion
/// program, which is cheap to regenerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Tool diameter in mm.
    pub tool_diameter: f64,
    /// Solver tolerance in mm; held at [`MIN_TOLERANCE`] or above.
    pub tolerance: f64,
    /// Stepover as a percentage of the tool diameter (0–100).
    pub stepover_percent: f64,
    /// Upper bound on the helix entry diameter in mm; 0 lets the solver
    /// choose.
    pub helix_diameter_limit: f64,
    /// Clearing or profiling.
    pub operation: OperationKind,
    /// Inside or outside the base contour.
    pub side: CutSide,
    /// Plunge inside the region and clear toward the edges.
    pub force_inside_out: bool,
    /// Link length threshold, as a multiple of the tool diameter, below
    /// which the tool stays near depth between cuts.
    pub keep_tool_down_ratio: f64,
    /// Radial stock allowance left for a finishing operation, in mm.
    pub stock_to_leave: f64,
    /// Outline of the feature face being machined.
    pub base: Outline,
    /// Outline of the stock face bounding the operation.
    pub stock: Outline,
}

impl SolveRequest {
    /// Clamp the tolerance to its floor. Call after field-wise construction.
    pub fn clamped(mut self) -> Self {
        self.tolerance = self.tolerance.max(MIN_TOLERANCE);
        self
    }

    /// Stepover as a fraction of the tool diameter.
    pub fn stepover_fraction(&self) -> f64 {
        0.01 * self.stepover_percent
    }

    /// Stepover distance in mm.
    pub fn stepover_distance(&self) -> f64 {
        self.stepover_fraction() * self.tool_diameter
    }
}
