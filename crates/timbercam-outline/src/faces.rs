//! Joint-face boundary constructors.
//!
//! Faces are authored in the canonical frame: centered on the origin, in
//! the z = 0 plane, with the feature normal along +Z and the feature
//! direction (the slot's long axis) along +Y. Placement into the assembly
//! happens after toolpath generation.

use crate::{PlanarBoundary, Point3d};

/// Boundary of a mortise slot: a rectangle of the given `width` capped by
/// two half circles, `length` measured over the caps.
///
/// `length` must be at least `width`; equal values degenerate to a circle.
pub fn mortise_slot(length: f64, width: f64) -> PlanarBoundary {
    let half_w = width / 2.0;
    let cap = length / 2.0 - half_w;

    // Corner points, one per quadrant.
    let p0 = Point3d::new(half_w, cap, 0.0);
    let p1 = Point3d::new(-half_w, cap, 0.0);
    let p2 = Point3d::new(-half_w, -cap, 0.0);
    let p3 = Point3d::new(half_w, -cap, 0.0);

    let mut boundary = PlanarBoundary::new(p0);
    boundary.arc_to(p1, Point3d::new(0.0, cap, 0.0), true);
    boundary.line_to(p2);
    boundary.arc_to(p3, Point3d::new(0.0, -cap, 0.0), true);
    boundary.line_to(p0);
    boundary
}

/// Boundary of a rectangular stock face, `length` along X and `width`
/// along Y, centered on the origin.
pub fn stock_rectangle(length: f64, width: f64) -> PlanarBoundary {
    let half_l = length / 2.0;
    let half_w = width / 2.0;

    let mut boundary = PlanarBoundary::new(Point3d::new(-half_l, -half_w, 0.0));
    boundary.line_to(Point3d::new(half_l, -half_w, 0.0));
    boundary.line_to(Point3d::new(half_l, half_w, 0.0));
    boundary.line_to(Point3d::new(-half_l, half_w, 0.0));
    boundary.line_to(Point3d::new(-half_l, -half_w, 0.0));
    boundary
}
