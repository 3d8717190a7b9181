//! Solver output: regions and their path segments.
//!
//! Region order and in-region point order come from the solver and are
//! authoritative — they encode cut sequence and collision avoidance in the
//! 2D plane. No downstream stage may reorder them.

use serde::{Deserialize, Serialize};
use timbercam_outline::Point2d;

/// How the tool moves along a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    /// Material-removing move at pass depth.
    Cutting,
    /// Repositioning move over already-cleared stock; a small lift is
    /// enough.
    LinkClear,
    /// Repositioning move over uncleared stock; requires a full retract.
    LinkNotClear,
}

/// A run of consecutive points sharing one motion kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Motion kind for every point in this segment.
    pub kind: MotionKind,
    /// Points visited in order.
    pub points: Vec<Point2d>,
}

impl PathSegment {
    /// Create a new segment.
    pub fn new(kind: MotionKind, points: Vec<Point2d>) -> Self {
        Self { kind, points }
    }
}

/// One contiguous clearing area with its own entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Center of the helix entry.
    pub helix_center: Point2d,
    /// First cutting position; the helix radius is the distance from the
    /// center to this point.
    pub start_point: Point2d,
    /// Path segments in cut order.
    pub paths: Vec<PathSegment>,
}

impl Region {
    /// Radius of the helix entry for this region.
    pub fn helix_radius(&self) -> f64 {
        self.helix_center.distance_to(&self.start_point)
    }
}

/// Ordered solver output. May be partial after a cancelled solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Regions in cut order.
    pub regions: Vec<Region>,
}

impl SolveResult {
    /// A result with nothing to cut.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the result produces no motion at all.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() || self.regions[0].paths.is_empty()
    }

    /// Total number of path points across all regions.
    pub fn point_count(&self) -> usize {
        self.regions
            .iter()
            .flat_map(|r| r.paths.iter())
            .map(|p| p.points.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helix_radius() {
        let region = Region {
            helix_center: Point2d::new(0.0, 0.0),
            start_point: Point2d::new(3.0, 4.0),
            paths: Vec::new(),
        };
        assert!((region.helix_radius() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_result() {
        assert!(SolveResult::empty().is_empty());

        // A region with no paths still counts as empty output.
        let result = SolveResult {
            regions: vec![Region {
                helix_center: Point2d::new(0.0, 0.0),
                start_point: Point2d::new(0.0, 0.0),
                paths: Vec::new(),
            }],
        };
        assert!(result.is_empty());
    }

    #[test]
    fn test_point_count() {
        let result = SolveResult {
            regions: vec![Region {
                helix_center: Point2d::new(0.0, 0.0),
                start_point: Point2d::new(1.0, 0.0),
                paths: vec![
                    PathSegment::new(
                        MotionKind::Cutting,
                        vec![Point2d::new(1.0, 0.0), Point2d::new(2.0, 0.0)],
                    ),
                    PathSegment::new(MotionKind::LinkClear, vec![Point2d::new(3.0, 0.0)]),
                ],
            }],
        };
        assert_eq!(result.point_count(), 3);
        assert!(!result.is_empty());
    }
}
