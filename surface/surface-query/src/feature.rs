//! Nearest surface feature search.
//!
//! Finds the closest point on a triangulated surface and classifies it as
//! lying on a node, inside an edge, or inside a triangle.

use std::fmt;

use nalgebra::Point3;
use surface_types::SurfaceMesh;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Kind of surface feature nearest to a query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeatureKind {
    /// Closest point coincides with a node.
    Node,
    /// Closest point lies inside an edge.
    Edge,
    /// Closest point lies inside a triangle.
    Triangle,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Node => "NODE",
            Self::Edge => "EDGE",
            Self::Triangle => "TRIANGLE",
        };
        f.write_str(name)
    }
}

/// Closest point on a surface.
///
/// `weights[i]` belongs to `nodes[i]`. Weights are exact zeros for nodes not
/// touching the closest point, so the number of positive weights decides
/// [`FeatureKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NearestFeature {
    /// Triangle holding the closest point.
    pub triangle: usize,
    /// Node indices of that triangle, in winding order.
    pub nodes: [usize; 3],
    /// Barycentric weights of the closest point (sum to 1).
    pub weights: [f64; 3],
    /// The closest point itself.
    pub point: Point3<f64>,
    /// Distance from the query to the closest point.
    pub distance: f64,
    /// Feature kind.
    pub kind: FeatureKind,
}

impl NearestFeature {
    /// Node with the largest weight (first wins ties).
    #[must_use]
    pub fn nearest_node(&self) -> usize {
        let mut best = 0;
        for i in 1..3 {
            if self.weights[i] > self.weights[best] {
                best = i;
            }
        }
        self.nodes[best]
    }
}

/// Closest point on triangle `v0 v1 v2` to `point`, as barycentric weights.
///
/// Uses Ericson's Voronoi region classification. Points landing in a vertex
/// or edge region get exact zero weights for the nodes not involved.
///
/// # Example
///
/// ```
/// use surface_query::closest_point_barycentric;
/// use surface_types::Point3;
///
/// let w = closest_point_barycentric(
///     Point3::new(0.5, -1.0, 0.0),
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// assert_eq!(w[2], 0.0);
/// assert!((w[0] - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn closest_point_barycentric(
    point: Point3<f64>,
    v0: Point3<f64>,
    v1: Point3<f64>,
    v2: Point3<f64>,
) -> [f64; 3] {
    let ab = v1 - v0;
    let ac = v2 - v0;
    let ap = point - v0;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);

    // Vertex region outside A
    if d1 <= 0.0 && d2 <= 0.0 {
        return [1.0, 0.0, 0.0];
    }

    let bp = point - v1;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);

    // Vertex region outside B
    if d3 >= 0.0 && d4 <= d3 {
        return [0.0, 1.0, 0.0];
    }

    // Edge region of AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return [1.0 - v, v, 0.0];
    }

    let cp = point - v2;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);

    // Vertex region outside C
    if d6 >= 0.0 && d5 <= d6 {
        return [0.0, 0.0, 1.0];
    }

    // Edge region of AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return [1.0 - w, 0.0, w];
    }

    // Edge region of BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return [0.0, 1.0 - w, w];
    }

    // Face region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    [1.0 - v - w, v, w]
}

/// Search every triangle of `mesh` for the point closest to `xyz`.
///
/// The triangle with the strictly smallest distance wins, so among equally
/// close triangles the lowest index is kept.
///
/// # Errors
///
/// Returns [`QueryError::NonFiniteQuery`] for a NaN or infinite query and
/// [`QueryError::EmptySurface`] when no valid triangle exists.
pub fn find_nearest_feature(mesh: &SurfaceMesh, xyz: &Point3<f64>) -> QueryResult<NearestFeature> {
    if !xyz.coords.iter().all(|c| c.is_finite()) {
        return Err(QueryError::NonFiniteQuery {
            x: xyz.x,
            y: xyz.y,
            z: xyz.z,
        });
    }

    let mut best: Option<(f64, NearestFeature)> = None;

    for triangle in 0..mesh.triangle_count() {
        let (Some(nodes), Some(tri)) = (mesh.face_nodes(triangle), mesh.triangle(triangle)) else {
            continue;
        };

        let weights = closest_point_barycentric(*xyz, tri.v0, tri.v1, tri.v2);
        let point = tri.point_at(weights);
        let dist_sq = (xyz - point).norm_squared();

        if best.as_ref().map_or(true, |(d, _)| dist_sq < *d) {
            best = Some((
                dist_sq,
                NearestFeature {
                    triangle,
                    nodes,
                    weights,
                    point,
                    distance: dist_sq.sqrt(),
                    kind: classify(&weights),
                },
            ));
        }
    }

    best.map(|(_, f)| f).ok_or(QueryError::EmptySurface)
}

fn classify(weights: &[f64; 3]) -> FeatureKind {
    match weights.iter().filter(|&&w| w > 0.0).count() {
        0 | 1 => FeatureKind::Node,
        2 => FeatureKind::Edge,
        _ => FeatureKind::Triangle,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use surface_types::{unit_octahedron, unit_square};

    #[test]
    fn interior_point_of_square() {
        let f = find_nearest_feature(&unit_square(), &Point3::new(0.25, 0.25, 0.0)).unwrap();
        assert_eq!(f.kind, FeatureKind::Triangle);
        assert_eq!(f.triangle, 0);
        assert_eq!(f.nodes, [0, 1, 3]);
        assert_relative_eq!(f.weights[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(f.weights[1], 0.25, epsilon = 1e-12);
        assert_relative_eq!(f.weights[2], 0.25, epsilon = 1e-12);
        assert_relative_eq!(f.distance, 0.0);
        assert_eq!(f.nearest_node(), 0);
    }

    #[test]
    fn diagonal_point_lands_on_edge() {
        let f = find_nearest_feature(&unit_square(), &Point3::new(0.5, 0.5, 0.0)).unwrap();
        assert_eq!(f.kind, FeatureKind::Edge);
        assert_eq!(f.triangle, 0);
        assert_eq!(f.weights, [0.0, 0.5, 0.5]);
    }

    #[test]
    fn point_beyond_corner_is_node() {
        let f = find_nearest_feature(&unit_square(), &Point3::new(-1.0, -1.0, 2.0)).unwrap();
        assert_eq!(f.kind, FeatureKind::Node);
        assert_eq!(f.nearest_node(), 0);
        assert_relative_eq!(f.distance, 6.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn point_above_face_keeps_height() {
        let f = find_nearest_feature(&unit_square(), &Point3::new(0.7, 0.8, -3.0)).unwrap();
        assert_eq!(f.kind, FeatureKind::Triangle);
        assert_eq!(f.triangle, 1);
        assert_relative_eq!(f.distance, 3.0, epsilon = 1e-12);
        assert_relative_eq!(f.point.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn octahedron_face_centre() {
        let c = 1.0 / 3.0;
        let f = find_nearest_feature(&unit_octahedron(), &Point3::new(c, c, c)).unwrap();
        assert_eq!(f.kind, FeatureKind::Triangle);
        assert_eq!(f.triangle, 0);
    }

    #[test]
    fn weights_sum_to_one() {
        let v0 = Point3::new(0.0, 0.0, 0.0);
        let v1 = Point3::new(2.0, 0.0, 0.0);
        let v2 = Point3::new(0.0, 3.0, 0.0);
        for p in [
            Point3::new(0.3, 0.4, 1.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(1.0, -2.0, 0.0),
        ] {
            let w = closest_point_barycentric(p, v0, v1, v2);
            assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_non_finite_and_empty() {
        let err = find_nearest_feature(&unit_square(), &Point3::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(err, Err(QueryError::NonFiniteQuery { .. })));

        let empty = SurfaceMesh::default();
        let err = find_nearest_feature(&empty, &Point3::origin());
        assert!(matches!(err, Err(QueryError::EmptySurface)));
    }

    #[test]
    fn display_kind() {
        assert_eq!(FeatureKind::Edge.to_string(), "EDGE");
    }
}
