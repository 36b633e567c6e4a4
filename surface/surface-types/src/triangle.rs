//! Triangle of node positions.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry;

/// Positions of the three corner nodes of one surface triangle.
///
/// Obtained from [`SurfaceMesh::triangle`](crate::SurfaceMesh::triangle),
/// which keeps the face's node order, so the outward side is the one the
/// corners wind counter-clockwise around.
///
/// # Example
///
/// ```
/// use surface_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 2.0),
///     Point3::new(4.0, 0.0, 2.0),
///     Point3::new(0.0, 4.0, 2.0),
/// );
///
/// let mid = tri.point_at([0.5, 0.25, 0.25]);
/// assert_eq!(mid, Point3::new(1.0, 1.0, 2.0));
/// assert!(tri.unit_normal().z > 0.99);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// Position of the face's first node.
    pub v0: Point3<f64>,
    /// Position of the face's second node.
    pub v1: Point3<f64>,
    /// Position of the face's third node.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Triangle with corners in the given order.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// The corners as an array, first node first.
    #[inline]
    #[must_use]
    pub const fn corners(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// `(v1 - v0) x (v2 - v0)`; its length is twice the area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Outward unit normal. Zero when the corners are collinear.
    #[inline]
    #[must_use]
    pub fn unit_normal(&self) -> Vector3<f64> {
        geometry::normal_vector(&self.v0, &self.v1, &self.v2)
    }

    /// Signed area in the XY plane, positive for counter-clockwise corners
    /// seen from `+Z`. Heights are ignored, as on a flat surface.
    #[inline]
    #[must_use]
    pub fn signed_area_2d(&self) -> f64 {
        geometry::triangle_area_signed_2d(&self.v0, &self.v1, &self.v2)
    }

    /// Point with barycentric `weights` over `v0`, `v1`, `v2`.
    ///
    /// Weights are applied as given; they need not sum to one.
    #[must_use]
    pub fn point_at(&self, weights: [f64; 3]) -> Point3<f64> {
        Point3::from(
            self.v0.coords * weights[0] + self.v1.coords * weights[1] + self.v2.coords * weights[2],
        )
    }

    /// Mean of the three corners.
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        self.point_at([1.0 / 3.0; 3])
    }

    /// Signed height of `xyz` above the triangle's plane, measured along
    /// [`unit_normal`](Self::unit_normal). Zero for collinear corners.
    #[must_use]
    pub fn height_of(&self, xyz: &Point3<f64>) -> f64 {
        geometry::signed_distance_from_plane(&self.unit_normal(), &self.v0, xyz)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Tilted so neither the normal nor the heights are axis aligned.
    fn tilted() -> Triangle {
        Triangle::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn normal_points_away_from_origin() {
        let n = tilted().unit_normal();
        let k = 1.0 / 3.0_f64.sqrt();
        assert_relative_eq!(n, Vector3::new(k, k, k), epsilon = 1e-12);
        assert_relative_eq!(tilted().normal_unnormalized().norm(), 3.0_f64.sqrt());
    }

    #[test]
    fn reversed_corners_flip_orientation() {
        let tri = tilted();
        let reversed = Triangle::new(tri.v0, tri.v2, tri.v1);
        assert_relative_eq!(reversed.unit_normal(), -tri.unit_normal(), epsilon = 1e-12);
        assert_relative_eq!(reversed.signed_area_2d(), -tri.signed_area_2d());
    }

    #[test]
    fn height_is_signed() {
        let tri = tilted();
        assert_relative_eq!(tri.height_of(&Point3::origin()), -1.0 / 3.0_f64.sqrt());
        assert_relative_eq!(tri.height_of(&Point3::new(1.0, 1.0, 1.0)), 2.0 / 3.0_f64.sqrt());
        assert_relative_eq!(tri.height_of(&tri.centroid()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn corner_weights_select_corners() {
        let tri = tilted();
        for (i, corner) in tri.corners().iter().enumerate() {
            let mut weights = [0.0; 3];
            weights[i] = 1.0;
            assert_eq!(tri.point_at(weights), *corner);
        }
    }

    #[test]
    fn collinear_corners() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
        );
        assert_eq!(tri.unit_normal(), Vector3::zeros());
        assert_eq!(tri.signed_area_2d(), 0.0);
        assert_eq!(tri.height_of(&Point3::new(0.0, 0.0, 5.0)), 0.0);
    }
}
