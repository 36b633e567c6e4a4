//! Geometric primitives used by surface projection.
//!
//! Free functions over `nalgebra` points and vectors. They never fail:
//! degenerate input yields zero vectors or `None` as documented per function.

use nalgebra::{Point3, Vector3};

/// Denominator below which a ray is treated as parallel to a plane.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Unit normal of the triangle `p1, p2, p3` by the right-hand rule.
///
/// Returns the zero vector for a zero-area triangle.
///
/// # Example
///
/// ```
/// use surface_types::geometry::normal_vector;
/// use surface_types::Point3;
///
/// let n = normal_vector(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
/// );
/// assert!((n.z - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn normal_vector(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Vector3<f64> {
    let n = (p2 - p1).cross(&(p3 - p1));
    let len = n.norm();
    if len > 0.0 {
        n / len
    } else {
        Vector3::zeros()
    }
}

/// Signed distance of `xyz` from the plane through `point_on_plane` with unit `normal`.
///
/// Positive on the side the normal points to.
#[inline]
#[must_use]
pub fn signed_distance_from_plane(
    normal: &Vector3<f64>,
    point_on_plane: &Point3<f64>,
    xyz: &Point3<f64>,
) -> f64 {
    normal.dot(&(xyz - point_on_plane))
}

/// Orthogonal projection of `xyz` onto the plane through `point_on_plane` with unit `normal`.
#[inline]
#[must_use]
pub fn project_point_to_plane(
    xyz: &Point3<f64>,
    point_on_plane: &Point3<f64>,
    normal: &Vector3<f64>,
) -> Point3<f64> {
    xyz - normal * signed_distance_from_plane(normal, point_on_plane, xyz)
}

/// Signed area of the triangle `p1, p2, p3` using only X and Y.
///
/// Positive for CCW winding viewed from `+Z`.
#[inline]
#[must_use]
pub fn triangle_area_signed_2d(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> f64 {
    let a = p2 - p1;
    let b = p3 - p1;
    a.x.mul_add(b.y, -(a.y * b.x)) * 0.5
}

/// Area of the triangle `p1, p2, p3`, negated when its winding opposes `normal`.
///
/// # Example
///
/// ```
/// use surface_types::geometry::triangle_area_signed_3d;
/// use surface_types::{Point3, Vector3};
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 1.0, 0.0);
/// assert!(triangle_area_signed_3d(&Vector3::z(), &a, &b, &c) > 0.0);
/// assert!(triangle_area_signed_3d(&Vector3::z(), &a, &c, &b) < 0.0);
/// ```
#[must_use]
pub fn triangle_area_signed_3d(
    normal: &Vector3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> f64 {
    let cross = (p2 - p1).cross(&(p3 - p1));
    let area = cross.norm() * 0.5;
    if normal.dot(&cross) < 0.0 {
        -area
    } else {
        area
    }
}

/// Unsigned area of the triangle `p1, p2, p3`.
#[inline]
#[must_use]
pub fn triangle_area(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> f64 {
    (p2 - p1).cross(&(p3 - p1)).norm() * 0.5
}

/// Intersect a ray with the plane of the triangle `p1, p2, p3`.
///
/// The ray starts at `origin` and heads along `direction` (any length). The
/// parameter returned with the hit point is measured along the normalized
/// direction and may be negative when the plane lies behind the origin.
///
/// Returns `None` when the ray is parallel to the plane, the direction is
/// zero, or the triangle has no area.
#[must_use]
pub fn ray_intersect_plane(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
) -> Option<(Point3<f64>, f64)> {
    let normal = normal_vector(p1, p2, p3);
    let dir_len = direction.norm();
    if dir_len <= 0.0 || normal.norm_squared() <= 0.0 {
        return None;
    }
    let dir = direction / dir_len;

    let denom = normal.dot(&dir);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = normal.dot(&(p1 - origin)) / denom;
    Some((origin + dir * t, t))
}

/// Perpendicular foot of `xyz` on the infinite line through `a` and `b`.
///
/// Returns `a` when the two line points coincide.
#[must_use]
pub fn line_foot(a: &Point3<f64>, b: &Point3<f64>, xyz: &Point3<f64>) -> Point3<f64> {
    let v = b - a;
    let len_sq = v.norm_squared();
    if len_sq > 0.0 {
        a + v * ((xyz - a).dot(&v) / len_sq)
    } else {
        *a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_distance_sign() {
        let n = Vector3::z();
        let p = Point3::new(1.0, 1.0, 2.0);
        assert_relative_eq!(
            signed_distance_from_plane(&n, &p, &Point3::new(0.0, 0.0, 5.0)),
            3.0
        );
        assert_relative_eq!(
            signed_distance_from_plane(&n, &p, &Point3::new(0.0, 0.0, -1.0)),
            -3.0
        );
    }

    #[test]
    fn project_onto_tilted_plane() {
        let n = Vector3::new(1.0, 1.0, 0.0).normalize();
        let on_plane = project_point_to_plane(&Point3::new(2.0, 2.0, 7.0), &Point3::origin(), &n);
        assert_relative_eq!(on_plane.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(on_plane.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(on_plane.z, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn signed_area_2d_ignores_z() {
        let a = Point3::new(0.0, 0.0, 3.0);
        let b = Point3::new(2.0, 0.0, -1.0);
        let c = Point3::new(0.0, 2.0, 9.0);
        assert_relative_eq!(triangle_area_signed_2d(&a, &b, &c), 2.0);
        assert_relative_eq!(triangle_area_signed_2d(&a, &c, &b), -2.0);
    }

    #[test]
    fn zero_area_is_not_negative() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 0.0);
        let mid = Point3::new(0.5, 0.5, 0.0);
        let area = triangle_area_signed_3d(&Vector3::z(), &a, &b, &mid);
        assert!(area >= 0.0);
        assert_relative_eq!(triangle_area(&a, &b, &mid), 0.0);
    }

    #[test]
    fn ray_from_origin_hits_plane() {
        let p1 = Point3::new(0.0, 0.0, 2.0);
        let p2 = Point3::new(1.0, 0.0, 2.0);
        let p3 = Point3::new(0.0, 1.0, 2.0);
        let hit = ray_intersect_plane(&p1, &p2, &p3, &Point3::origin(), &Vector3::new(1.0, 1.0, 4.0));
        let (point, t) = hit.unwrap_or((Point3::origin(), f64::NAN));
        assert_relative_eq!(point.z, 2.0, epsilon = 1e-12);
        assert_relative_eq!(point.x, 0.5, epsilon = 1e-12);
        assert!(t > 0.0);
    }

    #[test]
    fn ray_parallel_to_plane() {
        let p1 = Point3::new(0.0, 0.0, 2.0);
        let p2 = Point3::new(1.0, 0.0, 2.0);
        let p3 = Point3::new(0.0, 1.0, 2.0);
        let hit = ray_intersect_plane(&p1, &p2, &p3, &Point3::origin(), &Vector3::x());
        assert!(hit.is_none());
    }

    #[test]
    fn foot_on_line() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(4.0, 0.0, 0.0);
        let q = line_foot(&a, &b, &Point3::new(1.0, 3.0, -2.0));
        assert_relative_eq!(q.x, 1.0);
        assert_relative_eq!(q.y, 0.0);

        // Degenerate edge collapses to the first endpoint
        let q = line_foot(&a, &a, &Point3::new(1.0, 3.0, -2.0));
        assert_relative_eq!(q.x, 0.0);
    }
}
