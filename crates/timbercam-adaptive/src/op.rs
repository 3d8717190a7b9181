//! The adaptive operation driver.
//!
//! Ties the pipeline together for one joint feature: outline extraction,
//! solve-request assembly, cache consultation, the 2D solve, motion
//! program generation and frame placement. One call to
//! [`AdaptiveOperation::execute`] is one recompute.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use timbercam_outline::{PlanarBoundary, DEFAULT_DEFLECTION};

use crate::cache::SolveCache;
use crate::depth::DepthParams;
use crate::error::Result;
use crate::motion::{generate_program, MotionParams, MotionProgram};
use crate::placement::{place, Frame};
use crate::request::{CutSide, OperationKind, SolveRequest};
use crate::solver::{AdaptiveSolver, CancelToken};

/// One adaptive milling operation on one joint feature.
///
/// Holds the full configuration surface plus the per-feature solve cache.
/// The heights, feeds and frame can change freely between recomputes
/// without invalidating the cache; only the fields that enter the
/// [`SolveRequest`] do that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveOperation {
    /// Clearing or profiling.
    pub operation: OperationKind,
    /// Side of the base face the tool cuts on.
    pub side: CutSide,
    /// Solver accuracy/performance trade-off, in mm.
    pub tolerance: f64,
    /// Stepover as a percentage of the tool diameter.
    pub stepover_percent: f64,
    /// Upper bound on the helix entry diameter, in mm; 0 lets the solver
    /// choose.
    pub helix_diameter_limit: f64,
    /// Plunge inside the region and clear toward the edges.
    pub force_inside_out: bool,
    /// Link length threshold for staying near depth, as a multiple of the
    /// tool diameter.
    pub keep_tool_down_ratio: f64,
    /// Radial stock allowance for a later finishing operation, in mm.
    pub stock_to_leave: f64,
    /// Tool diameter in mm.
    pub tool_diameter: f64,
    /// Heights and depth staging.
    pub depths: DepthParams,
    /// Lift, helix angle and feeds.
    pub motion: MotionParams,
    /// Target frame of the feature in the assembly.
    #[serde(skip, default = "Frame::canonical")]
    pub frame: Frame,
    /// Cached solve state from the previous recompute.
    pub cache: SolveCache,
}

impl Default for AdaptiveOperation {
    fn default() -> Self {
        Self {
            operation: OperationKind::Clearing,
            side: CutSide::Inside,
            tolerance: 0.1,
            stepover_percent: 20.0,
            helix_diameter_limit: 0.0,
            force_inside_out: false,
            keep_tool_down_ratio: 3.0,
            stock_to_leave: 0.0,
            tool_diameter: 12.0,
            depths: DepthParams::default(),
            motion: MotionParams::default(),
            frame: Frame::canonical(),
            cache: SolveCache::new(),
        }
    }
}

impl AdaptiveOperation {
    /// Recompute the placed motion program for this operation.
    ///
    /// The 2D solve is skipped when the assembled request matches the
    /// cached one. A cancelled solve yields a partial (possibly empty)
    /// program; invalid geometry or a degenerate frame fails the whole
    /// recompute.
    pub fn execute(
        &mut self,
        base: &PlanarBoundary,
        stock: &PlanarBoundary,
        solver: &dyn AdaptiveSolver,
        cancel: &CancelToken,
    ) -> Result<MotionProgram> {
        info!("adaptive toolpath processing started");
        let started = Instant::now();

        let base_outline = base.discretize(DEFAULT_DEFLECTION)?;
        let stock_outline = stock.discretize(DEFAULT_DEFLECTION)?;

        let request = SolveRequest {
            tool_diameter: self.tool_diameter,
            tolerance: self.tolerance,
            stepover_percent: self.stepover_percent,
            helix_diameter_limit: self.helix_diameter_limit,
            operation: self.operation,
            side: self.side,
            force_inside_out: self.force_inside_out,
            keep_tool_down_ratio: self.keep_tool_down_ratio,
            stock_to_leave: self.stock_to_leave,
            base: base_outline,
            stock: stock_outline,
        }
        .clamped();

        let result = match self.cache.lookup(&request) {
            Some(cached) => {
                debug!("solve request unchanged, reusing cached result");
                cached.clone()
            }
            None => {
                let result = solver.solve(&request, cancel);
                self.cache.store(request, result.clone());
                result
            }
        };

        let mut program =
            generate_program(&result, &self.depths, &self.motion, self.tool_diameter);
        place(&mut program, &self.frame)?;

        info!(
            elapsed = ?started.elapsed(),
            commands = program.len(),
            regions = result.regions.len(),
            "adaptive toolpath processing done"
        );
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{MotionKind, PathSegment, Region, SolveResult};
    use std::cell::Cell;
    use timbercam_math::{Point3, Vec3};
    use timbercam_outline::{mortise_slot, stock_rectangle, Point2d, Point3d};

    /// Solver double that counts invocations.
    struct CountingSolver {
        calls: Cell<usize>,
    }

    impl CountingSolver {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl AdaptiveSolver for CountingSolver {
        fn solve(&self, _request: &SolveRequest, _cancel: &CancelToken) -> SolveResult {
            self.calls.set(self.calls.get() + 1);
            SolveResult {
                regions: vec![Region {
                    helix_center: Point2d::new(0.0, 0.0),
                    start_point: Point2d::new(2.0, 0.0),
                    paths: vec![PathSegment::new(
                        MotionKind::Cutting,
                        vec![Point2d::new(2.0, 0.0), Point2d::new(2.0, 5.0)],
                    )],
                }],
            }
        }
    }

    fn operation() -> AdaptiveOperation {
        AdaptiveOperation {
            depths: DepthParams {
                clearance_height: 80.0,
                safe_height: 75.0,
                start_depth: 0.0,
                step_down: 10.0,
                finish_step: 0.0,
                final_depth: -60.0,
            },
            ..AdaptiveOperation::default()
        }
    }

    #[test]
    fn test_cache_skips_second_solve() {
        let mut op = operation();
        let solver = CountingSolver::new();
        let cancel = CancelToken::new();
        let base = mortise_slot(70.0, 30.0);
        let stock = stock_rectangle(102.0, 102.0);

        let first = op.execute(&base, &stock, &solver, &cancel).unwrap();
        assert_eq!(solver.calls.get(), 1);

        let second = op.execute(&base, &stock, &solver, &cancel).unwrap();
        assert_eq!(solver.calls.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_changed_parameter_resolves() {
        let mut op = operation();
        let solver = CountingSolver::new();
        let cancel = CancelToken::new();
        let base = mortise_slot(70.0, 30.0);
        let stock = stock_rectangle(102.0, 102.0);

        op.execute(&base, &stock, &solver, &cancel).unwrap();
        op.stepover_percent = 35.0;
        op.execute(&base, &stock, &solver, &cancel).unwrap();
        assert_eq!(solver.calls.get(), 2);
    }

    #[test]
    fn test_motion_change_reuses_cache() {
        let mut op = operation();
        let solver = CountingSolver::new();
        let cancel = CancelToken::new();
        let base = mortise_slot(70.0, 30.0);
        let stock = stock_rectangle(102.0, 102.0);

        let deep = op.execute(&base, &stock, &solver, &cancel).unwrap();
        op.depths.final_depth = -30.0;
        let shallow = op.execute(&base, &stock, &solver, &cancel).unwrap();
        assert_eq!(solver.calls.get(), 1);
        assert!(shallow.len() < deep.len());
    }

    #[test]
    fn test_invalid_geometry_is_fatal() {
        let mut op = operation();
        let solver = CountingSolver::new();
        let cancel = CancelToken::new();

        let mut open = PlanarBoundary::new(Point3d::new(0.0, 0.0, 0.0));
        open.line_to(Point3d::new(10.0, 0.0, 0.0));
        let stock = stock_rectangle(102.0, 102.0);

        let err = op.execute(&open, &stock, &solver, &cancel).unwrap_err();
        assert!(matches!(err, crate::AdaptiveError::InvalidGeometry(_)));
        assert_eq!(solver.calls.get(), 0);
    }

    #[test]
    fn test_program_is_placed() {
        let mut op = operation();
        op.frame = Frame::new(Point3::new(0.0, 50.0, 50.0), Vec3::z(), Vec3::y());
        let solver = CountingSolver::new();
        let cancel = CancelToken::new();
        let base = mortise_slot(70.0, 30.0);
        let stock = stock_rectangle(102.0, 102.0);

        let program = op.execute(&base, &stock, &solver, &cancel).unwrap();
        // First command is the entry rapid at the helix start, shifted by
        // the frame position.
        let (x, y, z) = program.commands[0].position().unwrap();
        assert!((x - 2.0).abs() < 1e-9);
        assert!((y - 50.0).abs() < 1e-9);
        assert!((z - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_clamped_into_request() {
        let mut op = operation();
        op.tolerance = 1e-9;
        let solver = CountingSolver::new();
        let cancel = CancelToken::new();
        let base = mortise_slot(70.0, 30.0);
        let stock = stock_rectangle(102.0, 102.0);

        op.execute(&base, &stock, &solver, &cancel).unwrap();
        // A recompute with the tolerance raised to exactly the floor hits
        // the cache: both clamp to the same request.
        op.tolerance = crate::request::MIN_TOLERANCE;
        op.execute(&base, &stock, &solver, &cancel).unwrap();
        assert_eq!(solver.calls.get(), 1);
    }
}
