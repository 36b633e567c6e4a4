//! Projection location resolution.
//!
//! Determines which surface feature (node, edge, triangle) a query point is
//! nearest to, how far above or below the surface it lies, and which
//! triangles are candidates for the projection.

use std::fmt;

use nalgebra::{Point3, Vector3};
use surface_query::{FeatureKind, ProjectionSurface};
use surface_types::geometry;
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};
use crate::params::DISTANCE_CONSISTENCY_TOLERANCE;
use crate::record::BarycentricProjection;

/// Where on a surface a query point lands.
///
/// Created per query and consumed by the triangle or edge projector.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionLocation {
    /// Feature the point is nearest to.
    pub kind: FeatureKind,
    /// The query point.
    pub point: Point3<f64>,
    /// Nearest point on the surface.
    pub surface_point: Point3<f64>,
    /// Contributing nodes; unused slots are `None`.
    pub nodes: [Option<usize>; 3],
    /// Weights of `nodes`; unused slots are 0.
    pub weights: [f64; 3],
    /// Signed distance from the surface (positive above).
    pub signed_distance: f64,
    /// Unsigned distance reported by the nearest-feature search.
    pub absolute_distance: f64,
    /// Candidate triangles, nearest first.
    ///
    /// Node: the node's tiles in walk order starting at the nearest. Edge:
    /// the nearest triangle, then the triangle across the edge if any.
    /// Triangle: the nearest triangle only.
    pub triangles: Vec<usize>,
    /// Contributing node with the largest weight.
    pub nearest_node: usize,
    /// Coordinate of `nearest_node`.
    pub nearest_node_xyz: Point3<f64>,
}

impl ProjectionLocation {
    /// First candidate triangle.
    #[must_use]
    pub fn nearest_triangle(&self) -> Option<usize> {
        self.triangles.first().copied()
    }

    /// Triangle across the nearest edge, for edge locations.
    #[must_use]
    pub fn opposite_triangle(&self) -> Option<usize> {
        match self.kind {
            FeatureKind::Edge => self.triangles.get(1).copied(),
            FeatureKind::Node | FeatureKind::Triangle => None,
        }
    }

    /// Replace node/edge data with a triangle projection's data.
    pub(crate) fn adopt(&mut self, proj: &BarycentricProjection) {
        self.kind = FeatureKind::Triangle;
        self.nodes = proj.triangle_nodes.map(Some);
        self.weights = proj.triangle_areas;
        self.signed_distance = proj.signed_distance_above_surface;
        self.absolute_distance = proj.signed_distance_above_surface.abs();
    }
}

impl fmt::Display for ProjectionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.point;
        let s = &self.surface_point;
        let n = &self.nearest_node_xyz;
        let triangles = self
            .triangles
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let nodes = self
            .nodes
            .iter()
            .map(|n| n.map_or_else(|| "-1".to_string(), |n| n.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        let [w0, w1, w2] = self.weights;
        write!(
            f,
            "Type={} Pos=({},{},{}) SurfacePos=({},{},{}) Triangles=({triangles}) \
             AbsDistance={} SignedDistance={} Nodes=({nodes}) Weights=({w0},{w1},{w2}) \
             NearestNode={} Node-XYZ=({},{},{})",
            self.kind,
            p.x,
            p.y,
            p.z,
            s.x,
            s.y,
            s.z,
            self.absolute_distance,
            self.signed_distance,
            self.nearest_node,
            n.x,
            n.y,
            n.z
        )
    }
}

/// Resolve where `xyz` lands on `surface`.
///
/// # Errors
///
/// - [`ProjectError::Query`] if the nearest-feature search fails
/// - [`ProjectError::TopologyInconsistency`] if the search result does not
///   match the surface topology (missing node data, nearest triangle not
///   around the nearest node, weight count not matching the feature kind)
/// - [`ProjectError::GeometryInconsistency`] if `|signed distance|` exceeds
///   the search distance by more than 0.01
pub fn resolve_location<S: ProjectionSurface + ?Sized>(
    surface: &S,
    xyz: &Point3<f64>,
) -> ProjectResult<ProjectionLocation> {
    let feature = surface.nearest_feature(xyz)?;

    let mut nodes = [None; 3];
    let mut weights = [0.0; 3];
    let mut count = 0;
    let mut nearest: Option<(usize, f64)> = None;
    for (&node, &weight) in feature.nodes.iter().zip(&feature.weights) {
        if weight > 0.0 {
            nodes[count] = Some(node);
            weights[count] = weight;
            count += 1;
            if nearest.map_or(true, |(_, w)| weight > w) {
                nearest = Some((node, weight));
            }
        }
    }
    let Some((nearest_node, _)) = nearest else {
        return Err(ProjectError::topology("nearest node is invalid"));
    };

    let expected = match feature.kind {
        FeatureKind::Node => 1,
        FeatureKind::Edge => 2,
        FeatureKind::Triangle => 3,
    };
    if count != expected {
        return Err(ProjectError::topology(format!(
            "nearest {} has {count} positive weights",
            feature.kind
        )));
    }

    let coordinate = |node: usize| {
        surface
            .coordinate(node)
            .ok_or_else(|| ProjectError::topology(format!("node {node} has no coordinate")))
    };
    let normal = |node: usize| {
        surface
            .normal(node)
            .ok_or_else(|| ProjectError::topology(format!("node {node} has no normal")))
    };

    let (signed_distance, triangles) = match feature.kind {
        FeatureKind::Node => {
            let c = coordinate(nearest_node)?;
            let sign = side_sign(&normal(nearest_node)?, &c, xyz);
            let tiles = surface.node_tiles(nearest_node);
            let start = tiles
                .iter()
                .position(|&t| t == feature.triangle)
                .ok_or_else(|| {
                    ProjectError::topology(format!(
                        "nearest triangle {} is not a tile of nearest node {nearest_node}",
                        feature.triangle
                    ))
                })?;
            let mut ordered = Vec::with_capacity(tiles.len());
            ordered.extend_from_slice(&tiles[start..]);
            ordered.extend_from_slice(&tiles[..start]);
            ((xyz - c).norm() * sign, ordered)
        }
        FeatureKind::Edge => {
            let (Some(n0), Some(n1)) = (nodes[0], nodes[1]) else {
                return Err(ProjectError::topology("edge location without two nodes"));
            };
            let avg = (normal(n0)? + normal(n1)?)
                .try_normalize(0.0)
                .unwrap_or_else(Vector3::zeros);
            let sign = side_sign(&avg, &feature.point, xyz);
            let mut triangles = vec![feature.triangle];
            triangles.extend(surface.triangle_sharing_edge(n0, n1, feature.triangle));
            ((xyz - feature.point).norm() * sign, triangles)
        }
        FeatureKind::Triangle => {
            let tri_normal = surface.triangle_normal(feature.triangle).ok_or_else(|| {
                ProjectError::topology(format!("triangle {} has no normal", feature.triangle))
            })?;
            let c1 = coordinate(feature.nodes[0])?;
            (
                geometry::signed_distance_from_plane(&tri_normal, &c1, xyz),
                vec![feature.triangle],
            )
        }
    };

    let location = ProjectionLocation {
        kind: feature.kind,
        point: *xyz,
        surface_point: feature.point,
        nodes,
        weights,
        signed_distance,
        absolute_distance: feature.distance,
        triangles,
        nearest_node,
        nearest_node_xyz: coordinate(nearest_node)?,
    };

    let difference = signed_distance.abs() - feature.distance;
    if difference > DISTANCE_CONSISTENCY_TOLERANCE {
        return Err(ProjectError::GeometryInconsistency {
            difference,
            location: location.to_string(),
        });
    }

    debug!(location = %location, "Resolved projection location");
    Ok(location)
}

/// `1` when `xyz` is strictly above the plane, `-1` otherwise.
fn side_sign(normal: &Vector3<f64>, on_plane: &Point3<f64>, xyz: &Point3<f64>) -> f64 {
    if geometry::signed_distance_from_plane(normal, on_plane, xyz) > 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use surface_query::{IndexedSurface, NearestFeature, QueryResult};
    use surface_types::{unit_octahedron, unit_square, Structure, SurfaceType};

    fn square() -> IndexedSurface {
        IndexedSurface::new(unit_square()).unwrap()
    }

    #[test]
    fn triangle_location_inside_square() {
        let loc = resolve_location(&square(), &Point3::new(0.25, 0.25, 0.5)).unwrap();
        assert_eq!(loc.kind, FeatureKind::Triangle);
        assert_eq!(loc.triangles, vec![0]);
        assert_eq!(loc.nodes, [Some(0), Some(1), Some(3)]);
        assert_eq!(loc.nearest_node, 0);
        assert_relative_eq!(loc.signed_distance, 0.5, epsilon = 1e-12);
        assert_relative_eq!(loc.absolute_distance, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn triangle_location_below_is_negative() {
        let loc = resolve_location(&square(), &Point3::new(0.75, 0.6, -0.25)).unwrap();
        assert_eq!(loc.triangles, vec![1]);
        assert_relative_eq!(loc.signed_distance, -0.25, epsilon = 1e-12);
    }

    #[test]
    fn edge_location_on_diagonal() {
        let loc = resolve_location(&square(), &Point3::new(0.5, 0.5, 0.0)).unwrap();
        assert_eq!(loc.kind, FeatureKind::Edge);
        assert_eq!(loc.triangles, vec![0, 1]);
        assert_eq!(loc.opposite_triangle(), Some(1));
        assert_eq!(loc.nodes, [Some(1), Some(3), None]);
        assert_eq!(loc.weights, [0.5, 0.5, 0.0]);
        // Ties keep the first contributing node
        assert_eq!(loc.nearest_node, 1);
        // On the surface the sign falls to -1 but the magnitude is zero
        assert_relative_eq!(loc.signed_distance.abs(), 0.0);
    }

    #[test]
    fn boundary_edge_has_single_candidate() {
        let loc = resolve_location(&square(), &Point3::new(0.5, -0.5, 1.0)).unwrap();
        assert_eq!(loc.kind, FeatureKind::Edge);
        assert_eq!(loc.triangles, vec![0]);
        assert_eq!(loc.opposite_triangle(), None);
        // Distance to the edge foot (0.5, 0, 0)
        assert_relative_eq!(loc.signed_distance, 1.25_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn node_location_rotates_tiles() {
        // Beyond corner 2 of the square; its only tile is 1
        let loc = resolve_location(&square(), &Point3::new(2.0, 2.0, 0.0)).unwrap();
        assert_eq!(loc.kind, FeatureKind::Node);
        assert_eq!(loc.nearest_node, 2);
        assert_eq!(loc.triangles, vec![1]);
        assert_eq!(loc.nodes, [Some(2), None, None]);
        // In-plane offset lies on the negative side by convention
        assert_relative_eq!(loc.signed_distance, -(2.0_f64.sqrt()), epsilon = 1e-12);

        // Outside the octahedron tip, nearest triangle is moved to the front
        let oct = IndexedSurface::new(unit_octahedron()).unwrap();
        let loc = resolve_location(&oct, &Point3::new(0.0, 0.0, 3.0)).unwrap();
        assert_eq!(loc.kind, FeatureKind::Node);
        assert_eq!(loc.nearest_node, 4);
        assert_eq!(loc.triangles.len(), 4);
        assert_eq!(loc.nearest_triangle(), Some(0));
        assert_relative_eq!(loc.signed_distance, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn display_lists_fields() {
        let loc = resolve_location(&square(), &Point3::new(0.5, 0.5, 0.0)).unwrap();
        let text = loc.to_string();
        assert!(text.starts_with("Type=EDGE"));
        assert!(text.contains("Triangles=(0,1)"));
        assert!(text.contains("Nodes=(1,3,-1)"));
    }

    /// Surface whose search reports a nearest triangle that is not a tile of the node.
    struct BrokenTiles(IndexedSurface);

    impl ProjectionSurface for BrokenTiles {
        fn node_count(&self) -> usize {
            self.0.node_count()
        }
        fn triangle_count(&self) -> usize {
            self.0.triangle_count()
        }
        fn coordinate(&self, node: usize) -> Option<Point3<f64>> {
            self.0.coordinate(node)
        }
        fn normal(&self, node: usize) -> Option<Vector3<f64>> {
            self.0.normal(node)
        }
        fn triangle(&self, triangle: usize) -> Option<[usize; 3]> {
            self.0.triangle(triangle)
        }
        fn triangle_normal(&self, triangle: usize) -> Option<Vector3<f64>> {
            self.0.triangle_normal(triangle)
        }
        fn triangle_sharing_edge(&self, n0: usize, n1: usize, exclude: usize) -> Option<usize> {
            self.0.triangle_sharing_edge(n0, n1, exclude)
        }
        fn node_tiles(&self, _node: usize) -> &[usize] {
            &[]
        }
        fn nearest_feature(&self, xyz: &Point3<f64>) -> QueryResult<NearestFeature> {
            self.0.nearest_feature(xyz)
        }
        fn surface_type(&self) -> SurfaceType {
            self.0.surface_type()
        }
        fn structure(&self) -> Structure {
            self.0.structure()
        }
        fn spherical_radius(&self) -> f64 {
            self.0.spherical_radius()
        }
        fn mean_edge_length(&self) -> f64 {
            self.0.mean_edge_length()
        }
    }

    #[test]
    fn node_not_in_tiles_is_topology_error() {
        let broken = BrokenTiles(square());
        let err = resolve_location(&broken, &Point3::new(2.0, 2.0, 0.0)).unwrap_err();
        assert!(matches!(err, ProjectError::TopologyInconsistency { .. }));
    }
}
