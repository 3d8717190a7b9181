#![warn(missing_docs)]

//! Built-in contour-parallel clearing solver for the timbercam engine.
//!
//! Implements the [`AdaptiveSolver`] seam with offset rings: the base
//! contour is offset in stepover increments, the rings are ordered so the
//! tool plunges where it has room and works toward uncut material, and the
//! hops between rings are classified by the keep-tool-down threshold.
//!
//! The engine treats any solver as a black box; this one honors the same
//! contract an external adaptive-clearing library would — region and point
//! order are cut order, cancellation yields a partial result.

mod rings;

use tracing::debug;

use timbercam_adaptive::{
    AdaptiveSolver, CancelToken, CutSide, MotionKind, OperationKind, PathSegment, Region,
    SolveRequest, SolveResult,
};
use timbercam_outline::{Outline, Point2d};

use rings::{bounds, closed_polyline, offset_rings, Ring};

/// Contour-parallel ring solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingSolver;

impl RingSolver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    fn clearing(
        &self,
        request: &SolveRequest,
        base: &[Point2d],
        cancel: &CancelToken,
    ) -> SolveResult {
        let tool = request.tool_diameter;
        let first_inset = tool / 2.0 + request.stock_to_leave;
        // A zero stepover would never terminate.
        let stepover = request.stepover_distance().max(0.01 * tool);
        let polyline = closed_polyline(base);

        let mut levels: Vec<Vec<Ring>> = Vec::new();
        match request.side {
            CutSide::Inside => {
                let mut distance = first_inset;
                loop {
                    if cancel.is_cancelled() {
                        debug!("solve cancelled, returning partial result");
                        break;
                    }
                    let level = offset_rings(&polyline, -distance);
                    if level.is_empty() {
                        break;
                    }
                    levels.push(level);
                    distance += stepover;
                }
                // Cut from the innermost level toward the contour: the
                // plunge happens where the helix has room.
                levels.reverse();
            }
            CutSide::Outside => {
                let reach = outward_reach(request, base);
                let mut distance = first_inset;
                while distance <= reach {
                    if cancel.is_cancelled() {
                        debug!("solve cancelled, returning partial result");
                        break;
                    }
                    let level = offset_rings(&polyline, distance);
                    if level.is_empty() {
                        break;
                    }
                    levels.push(level);
                    distance += stepover;
                }
                if !request.force_inside_out {
                    // Default: approach the feature from the stock edge.
                    levels.reverse();
                }
            }
        }

        let rings: Vec<Ring> = levels.into_iter().flatten().collect();
        if rings.is_empty() {
            return SolveResult::empty();
        }

        let start = rings[0].start();
        let helix_center = match request.side {
            CutSide::Inside => {
                helix_center_for(&rings[0], start, tool, request.helix_diameter_limit)
            }
            // Plunging at the stock edge needs no helix room.
            CutSide::Outside => start,
        };

        let paths = assemble_paths(&rings, request.keep_tool_down_ratio * tool);
        debug!(rings = rings.len(), "clearing solve complete");
        SolveResult {
            regions: vec![Region {
                helix_center,
                start_point: start,
                paths,
            }],
        }
    }

    fn profiling(
        &self,
        request: &SolveRequest,
        base: &[Point2d],
        cancel: &CancelToken,
    ) -> SolveResult {
        if cancel.is_cancelled() {
            return SolveResult::empty();
        }
        let offset = request.tool_diameter / 2.0 + request.stock_to_leave;
        let signed = match request.side {
            CutSide::Inside => -offset,
            CutSide::Outside => offset,
        };
        let rings = offset_rings(&closed_polyline(base), signed);
        if rings.is_empty() {
            return SolveResult::empty();
        }

        let start = rings[0].start();
        let paths = assemble_paths(&rings, request.keep_tool_down_ratio * request.tool_diameter);
        SolveResult {
            regions: vec![Region {
                // Profile entries plunge straight on the contour.
                helix_center: start,
                start_point: start,
                paths,
            }],
        }
    }
}

impl AdaptiveSolver for RingSolver {
    fn solve(&self, request: &SolveRequest, cancel: &CancelToken) -> SolveResult {
        let Some(base) = first_subpath(&request.base) else {
            return SolveResult::empty();
        };
        match request.operation {
            OperationKind::Clearing => self.clearing(request, base, cancel),
            OperationKind::Profiling => self.profiling(request, base, cancel),
        }
    }
}

/// First sub-path with enough points to form an area.
fn first_subpath(outline: &Outline) -> Option<&[Point2d]> {
    outline
        .subpaths
        .iter()
        .find(|p| p.len() >= 3)
        .map(|p| p.as_slice())
}

/// Turn ordered rings into link and cutting segments.
fn assemble_paths(rings: &[Ring], keep_down_length: f64) -> Vec<PathSegment> {
    let mut paths = Vec::with_capacity(rings.len() * 2);
    let mut previous_end: Option<Point2d> = None;
    for ring in rings {
        if let Some(prev) = previous_end {
            let hop = prev.distance_to(&ring.start());
            let kind = if hop <= keep_down_length {
                MotionKind::LinkClear
            } else {
                MotionKind::LinkNotClear
            };
            paths.push(PathSegment::new(kind, vec![ring.start()]));
        }
        paths.push(PathSegment::new(MotionKind::Cutting, ring.points.clone()));
        // Rings close back onto their start.
        previous_end = Some(ring.start());
    }
    paths
}

/// Helix center for the first ring: its centroid, pulled toward the start
/// point until the helix diameter fits the limit (or the tool diameter
/// when no limit is set).
fn helix_center_for(ring: &Ring, start: Point2d, tool: f64, limit: f64) -> Point2d {
    let cap = if limit > 0.0 {
        limit.min(tool) / 2.0
    } else {
        tool / 2.0
    };
    let centroid = ring.centroid();
    let dist = centroid.distance_to(&start);
    if dist <= cap {
        return centroid;
    }
    let t = cap / dist;
    Point2d::new(
        start.x + (centroid.x - start.x) * t,
        start.y + (centroid.y - start.y) * t,
    )
}

/// How far outward rings must run to clear everything inside the stock:
/// from the base contour's bounding-box center to the farthest stock
/// corner, plus a tool radius. Coarse on purpose; outer rings may overrun
/// the stock corners slightly.
fn outward_reach(request: &SolveRequest, base: &[Point2d]) -> f64 {
    let Some(stock) = first_subpath(&request.stock) else {
        return 0.0;
    };
    let (smin, smax) = bounds(stock);
    let (bmin, bmax) = bounds(base);
    let cx = (bmin.x + bmax.x) / 2.0;
    let cy = (bmin.y + bmax.y) / 2.0;
    let corners = [
        (smin.x, smin.y),
        (smax.x, smin.y),
        (smin.x, smax.y),
        (smax.x, smax.y),
    ];
    let mut reach: f64 = 0.0;
    for (x, y) in corners {
        reach = reach.max(((x - cx).powi(2) + (y - cy).powi(2)).sqrt());
    }
    reach + request.tool_diameter / 2.0
}
