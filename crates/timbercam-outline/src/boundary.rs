//! Planar face boundaries and their discretization.

use serde::{Deserialize, Serialize};

use crate::error::{OutlineError, Result};
use crate::{Outline, Point2d, Point3d};

/// Default chord deflection for boundary discretization, in mm.
pub const DEFAULT_DEFLECTION: f64 = 1e-4;

/// Coincidence tolerance for closure, planarity and arc checks, in mm.
const GEOMETRY_TOL: f64 = 1e-6;

/// A segment of a planar boundary wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundarySegment {
    /// Straight segment.
    Line {
        /// End point.
        to: Point3d,
    },
    /// Circular arc segment.
    Arc {
        /// End point.
        to: Point3d,
        /// Arc center.
        center: Point3d,
        /// Counter-clockwise direction.
        ccw: bool,
    },
}

impl BoundarySegment {
    /// End point of the segment.
    pub fn end_point(&self) -> Point3d {
        match self {
            BoundarySegment::Line { to } => *to,
            BoundarySegment::Arc { to, .. } => *to,
        }
    }
}

/// A closed wire of line and arc segments lying in a z = const plane.
///
/// This is the contact surface with the geometry kernel: the kernel hands
/// over a face's outer wire, the engine turns it into an [`Outline`] via
/// [`discretize`](PlanarBoundary::discretize). Malformed wires (open, or
/// not planar) are rejected, never repaired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarBoundary {
    /// Starting point of the wire.
    pub start: Point3d,
    /// Segments forming the wire, in traversal order.
    pub segments: Vec<BoundarySegment>,
}

impl PlanarBoundary {
    /// Create a new boundary starting at the given point.
    pub fn new(start: Point3d) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    /// Append a line segment.
    pub fn line_to(&mut self, to: Point3d) {
        self.segments.push(BoundarySegment::Line { to });
    }

    /// Append an arc segment.
    pub fn arc_to(&mut self, to: Point3d, center: Point3d, ccw: bool) {
        self.segments.push(BoundarySegment::Arc { to, center, ccw });
    }

    /// End point of the wire.
    pub fn end_point(&self) -> Point3d {
        self.segments
            .last()
            .map(|s| s.end_point())
            .unwrap_or(self.start)
    }

    /// Check if the wire closes back onto its start point.
    pub fn is_closed(&self) -> bool {
        !self.segments.is_empty() && self.end_point().distance_to(&self.start) <= GEOMETRY_TOL
    }

    /// Discretize the wire into a single closed 2D sub-path.
    ///
    /// Arcs are sampled so that no chord deviates from the true arc by more
    /// than `deflection`. The returned sub-path repeats the start point at
    /// the end. Fails on open or non-planar wires.
    pub fn discretize(&self, deflection: f64) -> Result<Outline> {
        if self.segments.is_empty() {
            return Err(OutlineError::Empty);
        }
        let gap = self.end_point().distance_to(&self.start);
        if gap > GEOMETRY_TOL {
            return Err(OutlineError::NotClosed(gap));
        }
        let spread = self.z_spread();
        if spread > GEOMETRY_TOL {
            return Err(OutlineError::NotPlanar(spread));
        }

        let deflection = deflection.max(1e-9);
        let mut points = vec![self.start.to_2d()];
        let mut current = self.start.to_2d();

        for segment in &self.segments {
            match segment {
                BoundarySegment::Line { to } => {
                    current = to.to_2d();
                    points.push(current);
                }
                BoundarySegment::Arc { to, center, ccw } => {
                    let c = center.to_2d();
                    let end = to.to_2d();
                    let r_start = current.distance_to(&c);
                    let r_end = end.distance_to(&c);
                    if (r_start - r_end).abs() > GEOMETRY_TOL {
                        return Err(OutlineError::ArcRadiusMismatch {
                            start: r_start,
                            end: r_end,
                        });
                    }
                    sample_arc(&mut points, current, end, c, r_start, *ccw, deflection);
                    current = end;
                }
            }
        }

        Ok(Outline::single(points))
    }

    /// Largest deviation of any control point's z from the start z.
    fn z_spread(&self) -> f64 {
        let z0 = self.start.z;
        let mut spread: f64 = 0.0;
        for segment in &self.segments {
            spread = spread.max((segment.end_point().z - z0).abs());
            if let BoundarySegment::Arc { center, .. } = segment {
                spread = spread.max((center.z - z0).abs());
            }
        }
        spread
    }
}

/// Append arc sample points from `from` (exclusive) to `to` (inclusive).
fn sample_arc(
    points: &mut Vec<Point2d>,
    from: Point2d,
    to: Point2d,
    center: Point2d,
    radius: f64,
    ccw: bool,
    deflection: f64,
) {
    if radius <= GEOMETRY_TOL {
        points.push(to);
        return;
    }

    let start_angle = (from.y - center.y).atan2(from.x - center.x);
    let end_angle = (to.y - center.y).atan2(to.x - center.x);
    let mut sweep = if ccw {
        end_angle - start_angle
    } else {
        start_angle - end_angle
    };
    if sweep < 0.0 {
        sweep += 2.0 * std::f64::consts::PI;
    }

    // Largest angular step whose chord sagitta stays within the deflection.
    let max_step = if deflection >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - deflection / radius).acos()
    };
    let steps = (sweep / max_step).ceil().max(1.0) as usize;

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let angle = if ccw {
            start_angle + sweep * t
        } else {
            start_angle - sweep * t
        };
        if i == steps {
            // Land exactly on the segment end point.
            points.push(to);
        } else {
            points.push(Point2d::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> PlanarBoundary {
        let mut boundary = PlanarBoundary::new(Point3d::new(0.0, 0.0, 0.0));
        boundary.line_to(Point3d::new(1.0, 0.0, 0.0));
        boundary.line_to(Point3d::new(1.0, 1.0, 0.0));
        boundary.line_to(Point3d::new(0.0, 1.0, 0.0));
        boundary.line_to(Point3d::new(0.0, 0.0, 0.0));
        boundary
    }

    #[test]
    fn test_square_discretize() {
        let outline = unit_square().discretize(DEFAULT_DEFLECTION).unwrap();
        assert_eq!(outline.subpaths.len(), 1);
        let path = &outline.subpaths[0];
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn test_open_boundary_rejected() {
        let mut boundary = PlanarBoundary::new(Point3d::new(0.0, 0.0, 0.0));
        boundary.line_to(Point3d::new(1.0, 0.0, 0.0));
        boundary.line_to(Point3d::new(1.0, 1.0, 0.0));
        let err = boundary.discretize(DEFAULT_DEFLECTION).unwrap_err();
        assert!(matches!(err, OutlineError::NotClosed(_)));
    }

    #[test]
    fn test_empty_boundary_rejected() {
        let boundary = PlanarBoundary::new(Point3d::new(0.0, 0.0, 0.0));
        assert_eq!(
            boundary.discretize(DEFAULT_DEFLECTION),
            Err(OutlineError::Empty)
        );
    }

    #[test]
    fn test_non_planar_rejected() {
        let mut boundary = PlanarBoundary::new(Point3d::new(0.0, 0.0, 0.0));
        boundary.line_to(Point3d::new(1.0, 0.0, 0.0));
        boundary.line_to(Point3d::new(1.0, 1.0, 0.5));
        boundary.line_to(Point3d::new(0.0, 0.0, 0.0));
        let err = boundary.discretize(DEFAULT_DEFLECTION).unwrap_err();
        assert!(matches!(err, OutlineError::NotPlanar(_)));
    }

    #[test]
    fn test_circle_deflection() {
        // Full circle out of two half arcs, radius 10
        let mut boundary = PlanarBoundary::new(Point3d::new(10.0, 0.0, 0.0));
        let center = Point3d::new(0.0, 0.0, 0.0);
        boundary.arc_to(Point3d::new(-10.0, 0.0, 0.0), center, true);
        boundary.arc_to(Point3d::new(10.0, 0.0, 0.0), center, true);

        let deflection = 0.01;
        let outline = boundary.discretize(deflection).unwrap();
        let path = &outline.subpaths[0];
        assert!(path.len() > 10);
        assert_eq!(path.first(), path.last());

        // Every sample must sit on the circle; every chord midpoint must
        // stay within the deflection of it.
        for p in path {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!((r - 10.0).abs() < 1e-9);
        }
        for pair in path.windows(2) {
            let mx = (pair[0].x + pair[1].x) / 2.0;
            let my = (pair[0].y + pair[1].y) / 2.0;
            let sagitta = 10.0 - (mx * mx + my * my).sqrt();
            assert!(sagitta <= deflection + 1e-9);
        }
    }

    #[test]
    fn test_finer_deflection_more_points() {
        let mut coarse = PlanarBoundary::new(Point3d::new(5.0, 0.0, 0.0));
        let center = Point3d::new(0.0, 0.0, 0.0);
        coarse.arc_to(Point3d::new(-5.0, 0.0, 0.0), center, true);
        coarse.arc_to(Point3d::new(5.0, 0.0, 0.0), center, true);
        let fine = coarse.clone();

        let coarse_count = coarse.discretize(0.1).unwrap().point_count();
        let fine_count = fine.discretize(0.001).unwrap().point_count();
        assert!(fine_count > coarse_count);
    }
}
