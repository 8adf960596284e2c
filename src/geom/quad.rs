//! Quadrilateral surface elements.
//!
//! Corner order defines the orientation: the normal is taken from
//! `(v0 - v1) x (v1 - v2)`, i.e. it points towards the side from which the
//! corners appear counter-clockwise.

use crate::{Point, Vector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pts: [Point; 4],
}

impl Quad {
    pub fn new(pts: [Point; 4]) -> Self {
        Self { pts }
    }

    pub fn vertices(&self) -> &[Point; 4] {
        &self.pts
    }

    /// Mean of the 4 corners.
    pub fn centroid(&self) -> Point {
        let [p0, p1, p2, p3] = self.pts;
        let v = Vector::from_points(p0, p1)
            + Vector::from_points(p0, p2)
            + Vector::from_points(p0, p3);
        p0 + v * 0.25
    }

    /// Unit normal of the first corner triangle, None for degenerate corners.
    pub fn normal(&self) -> Option<Vector> {
        self.diagonal_crosses().0.normalize()
    }

    /// Approximate area from the two opposite corner cross products.
    ///
    /// Exact for planar trapezoids and parallelograms.
    pub fn area(&self) -> f64 {
        let (c1, c2) = self.diagonal_crosses();
        0.5 * (c1.length() + c2.length())
    }

    fn diagonal_crosses(&self) -> (Vector, Vector) {
        let [p0, p1, p2, p3] = self.pts;
        let e1 = p0 - p1;
        let e2 = p1 - p2;
        let e3 = p2 - p3;
        let e4 = p3 - p0;
        (e1.cross(e2), e3.cross(e4))
    }

    /// Splits the quad into 4 children through its edge midpoints.
    ///
    /// Each child keeps the winding (and so the normal) of the parent.
    /// Child `k` contains corner `k` of the parent.
    pub fn subdivide(&self) -> [Quad; 4] {
        let [v0, v1, v2, v3] = self.pts;
        let m01 = Point::midpoint(v0, v1);
        let m12 = Point::midpoint(v1, v2);
        let m23 = Point::midpoint(v2, v3);
        let m30 = Point::midpoint(v3, v0);
        let c = Point::midpoint(m01, m23);

        [
            Quad::new([v0, m01, c, m30]),
            Quad::new([m01, v1, m12, c]),
            Quad::new([c, m12, v2, m23]),
            Quad::new([m30, c, m23, v3]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Quad {
        Quad::new([
            Point::new(0., 0., 0.),
            Point::new(1., 0., 0.),
            Point::new(1., 1., 0.),
            Point::new(0., 1., 0.),
        ])
    }

    #[test]
    fn test_centroid_normal_area() {
        let q = unit_square();
        assert!(q.centroid().is_close(&Point::new(0.5, 0.5, 0.)));
        assert_eq!(q.normal().unwrap(), Vector::new(0., 0., 1.));
        assert!((q.area() - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_reversed_winding_flips_normal() {
        let [p0, p1, p2, p3] = *unit_square().vertices();
        let q = Quad::new([p3, p2, p1, p0]);
        assert_eq!(q.normal().unwrap(), Vector::new(0., 0., -1.));
    }

    #[test]
    fn test_trapezoid_area() {
        let q = Quad::new([
            Point::new(0., 0., 0.),
            Point::new(2., 0., 0.),
            Point::new(1.5, 1., 0.),
            Point::new(0.5, 1., 0.),
        ]);
        assert!((q.area() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_normal() {
        let p = Point::new(1., 1., 1.);
        let q = Quad::new([p, p, p, p]);
        assert!(q.normal().is_none());
        assert_eq!(q.area(), 0.);
    }

    #[test]
    fn test_subdivide() {
        let q = Quad::new([
            Point::new(0., 0., 0.),
            Point::new(3., 0., 0.),
            Point::new(2., 2., 0.),
            Point::new(0., 1., 0.),
        ]);
        let children = q.subdivide();
        let child_area: f64 = children.iter().map(|c| c.area()).sum();
        assert!((child_area - q.area()).abs() < 1e-9);
        for (k, child) in children.iter().enumerate() {
            assert!(child.normal().unwrap().is_close(&q.normal().unwrap()));
            assert!(child.vertices().contains(&q.vertices()[k]));
        }
    }
}
