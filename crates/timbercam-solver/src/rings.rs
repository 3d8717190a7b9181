//! Polyline preparation and offset ring collection.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use timbercam_outline::Point2d;

/// Vertex dedup tolerance for polyline preparation, in mm.
const DEDUP_TOL: f64 = 0.01;

/// One closed offset ring, sampled at its vertices.
#[derive(Debug, Clone)]
pub struct Ring {
    /// Ring vertices; the first point is repeated at the end.
    pub points: Vec<Point2d>,
}

impl Ring {
    /// First vertex of the ring.
    pub fn start(&self) -> Point2d {
        self.points[0]
    }

    /// Vertex centroid of the ring.
    pub fn centroid(&self) -> Point2d {
        // The closing vertex repeats the first; skip it.
        let n = self.points.len() - 1;
        let mut x = 0.0;
        let mut y = 0.0;
        for p in &self.points[..n] {
            x += p.x;
            y += p.y;
        }
        Point2d::new(x / n as f64, y / n as f64)
    }
}

/// Build a clean clockwise closed polyline from a sub-path.
///
/// Consecutive duplicates and the closing vertex are dropped and the
/// winding normalized, so that negative offsets inset and positive
/// offsets grow the contour regardless of the input orientation.
pub fn closed_polyline(points: &[Point2d]) -> Polyline {
    let mut clean: Vec<Point2d> = Vec::with_capacity(points.len());
    for p in points {
        match clean.last() {
            Some(last) if last.distance_to(p) <= DEDUP_TOL => {}
            _ => clean.push(*p),
        }
    }
    if clean.len() > 1 {
        let first = clean[0];
        if clean[clean.len() - 1].distance_to(&first) <= DEDUP_TOL {
            clean.pop();
        }
    }

    let mut signed_area = 0.0;
    for i in 0..clean.len() {
        let p1 = clean[i];
        let p2 = clean[(i + 1) % clean.len()];
        signed_area += p1.x * p2.y - p2.x * p1.y;
    }
    if signed_area > 0.0 {
        clean.reverse();
    }

    let mut polyline = Polyline::new();
    for p in clean {
        polyline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    polyline.set_is_closed(true);
    polyline
}

/// Offset the contour by `distance` (negative insets a clockwise contour)
/// and sample every resulting loop at its vertices.
pub fn offset_rings(polyline: &Polyline, distance: f64) -> Vec<Ring> {
    let mut rings = Vec::new();
    if polyline.vertex_data.len() < 3 {
        return rings;
    }
    for offset_path in polyline.parallel_offset(distance) {
        let mut points: Vec<Point2d> = offset_path
            .vertex_data
            .iter()
            .map(|v| Point2d::new(v.x, v.y))
            .collect();
        if points.len() < 3 {
            continue;
        }
        points.push(points[0]);
        rings.push(Ring { points });
    }
    rings
}

/// Axis-aligned bounding box of a point set.
pub fn bounds(points: &[Point2d]) -> (Point2d, Point2d) {
    let mut min = Point2d::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2d::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point2d> {
        let h = size / 2.0;
        vec![
            Point2d::new(-h, -h),
            Point2d::new(h, -h),
            Point2d::new(h, h),
            Point2d::new(-h, h),
            Point2d::new(-h, -h),
        ]
    }

    #[test]
    fn test_closed_polyline_drops_closing_vertex() {
        let polyline = closed_polyline(&square(10.0));
        assert_eq!(polyline.vertex_data.len(), 4);
        assert!(polyline.is_closed());
    }

    #[test]
    fn test_inset_shrinks() {
        let polyline = closed_polyline(&square(40.0));
        let rings = offset_rings(&polyline, -5.0);
        assert_eq!(rings.len(), 1);
        let (min, max) = bounds(&rings[0].points);
        assert!((max.x - 15.0).abs() < 1e-6);
        assert!((min.x + 15.0).abs() < 1e-6);
        assert!((max.y - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_inset_past_collapse_is_empty() {
        let polyline = closed_polyline(&square(40.0));
        assert!(offset_rings(&polyline, -30.0).is_empty());
    }

    #[test]
    fn test_outward_offset_grows() {
        let polyline = closed_polyline(&square(40.0));
        let rings = offset_rings(&polyline, 5.0);
        assert_eq!(rings.len(), 1);
        let (min, max) = bounds(&rings[0].points);
        assert!(max.x >= 25.0 - 1e-6);
        assert!(min.y <= -25.0 + 1e-6);
    }

    #[test]
    fn test_ring_centroid() {
        let polyline = closed_polyline(&square(40.0));
        let rings = offset_rings(&polyline, -5.0);
        let c = rings[0].centroid();
        assert!(c.x.abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
    }
}
