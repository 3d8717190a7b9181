#![warn(missing_docs)]

//! Planar face boundaries and 2D outline extraction for timbercam.
//!
//! A machining feature is described to the toolpath engine by the boundary
//! of its face: a closed wire of line and arc segments lying in a single
//! plane. This crate discretizes such boundaries into [`Outline`]s — the
//! ordered, deflection-tolerant 2D polylines the adaptive solver consumes —
//! and provides the joint-face constructors (mortise slot, stock rectangle)
//! used throughout the timber joinery operations.

mod boundary;
mod error;
mod faces;

pub use boundary::{BoundarySegment, PlanarBoundary, DEFAULT_DEFLECTION};
pub use error::{OutlineError, Result};
pub use faces::{mortise_slot, stock_rectangle};

use serde::{Deserialize, Serialize};

/// A point in the 2D machining plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2d {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    pub fn distance_to(&self, other: &Point2d) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point2d {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A point on a planar boundary, carried in 3D until planarity is checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Point3d {
    /// Create a new 3D point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection into the boundary plane (z discarded).
    pub fn to_2d(&self) -> Point2d {
        Point2d::new(self.x, self.y)
    }

    /// Distance to another point.
    pub fn distance_to(&self, other: &Point3d) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// An ordered set of closed 2D polylines describing one planar region.
///
/// Each sub-path is a closed loop: its first and last points coincide.
/// Boundary extraction always produces a single sub-path; the type allows
/// several because solver output and multi-contour stock may carry more.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// The sub-paths, each a closed sequence of points.
    pub subpaths: Vec<Vec<Point2d>>,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an outline holding a single sub-path.
    pub fn single(points: Vec<Point2d>) -> Self {
        Self {
            subpaths: vec![points],
        }
    }

    /// Whether the outline holds no points at all.
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|p| p.is_empty())
    }

    /// Total number of points across all sub-paths.
    pub fn point_count(&self) -> usize {
        self.subpaths.iter().map(|p| p.len()).sum()
    }
}
