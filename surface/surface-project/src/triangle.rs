//! Barycentric (triangle) projection.
//!
//! The point-in-triangle test, conversion of node and edge locations to a
//! triangle, and the search around the nearest node when the first
//! candidate does not contain the point.

use nalgebra::{Point3, Vector3};
use surface_query::{FeatureKind, ProjectionSurface};
use surface_types::{geometry, SurfaceType};
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};
use crate::location::ProjectionLocation;
use crate::record::BarycentricProjection;

/// Outcome of the signed-area test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Containment {
    /// All three areas strictly positive.
    Inside,
    /// All areas pass the tolerance but at least one is not positive.
    OnBoundary,
    /// At least one area fails the tolerance.
    Outside,
}

/// Point-in-triangle test with per-call visited flags.
///
/// Each triangle is examined at most once over the life of the value;
/// later checks of the same triangle return `None` without touching it.
pub(crate) struct ContainmentTest<'s, S: ProjectionSurface + ?Sized> {
    surface: &'s S,
    surface_type: SurfaceType,
    visited: Vec<bool>,
}

impl<'s, S: ProjectionSurface + ?Sized> ContainmentTest<'s, S> {
    pub(crate) fn new(surface: &'s S) -> Self {
        Self {
            surface,
            surface_type: surface.surface_type(),
            visited: vec![false; surface.triangle_count()],
        }
    }

    /// Test whether `xyz` lies in `triangle`, accepting areas down to `tolerance`.
    ///
    /// Returns `None` when the triangle was already examined, is out of range,
    /// does not contain the point, or (spherical surfaces) is parallel to the
    /// ray from the origin through the point.
    pub(crate) fn check(
        &mut self,
        triangle: usize,
        xyz: &Point3<f64>,
        tolerance: f64,
    ) -> Option<BarycentricProjection> {
        let seen = self.visited.get_mut(triangle)?;
        if *seen {
            return None;
        }
        *seen = true;

        let nodes = self.surface.triangle(triangle)?;
        let v1 = self.surface.coordinate(nodes[0])?;
        let v2 = self.surface.coordinate(nodes[1])?;
        let v3 = self.surface.coordinate(nodes[2])?;

        let mut normal = geometry::normal_vector(&v1, &v2, &v3);
        let query = match self.surface_type {
            SurfaceType::Flat => {
                normal = Vector3::z();
                Point3::new(xyz.x, xyz.y, 0.0)
            }
            SurfaceType::Spherical => {
                let (hit, _) =
                    geometry::ray_intersect_plane(&v1, &v2, &v3, &Point3::origin(), &xyz.coords)?;
                hit
            }
            SurfaceType::Generic3D => geometry::project_point_to_plane(xyz, &v1, &normal),
        };

        let (containment, areas) =
            triangle_areas(self.surface_type, [&v1, &v2, &v3], &normal, &query, tolerance);
        if containment == Containment::Outside {
            return None;
        }

        Some(BarycentricProjection {
            valid: true,
            degenerate: containment == Containment::OnBoundary,
            triangle_nodes: nodes,
            triangle_areas: areas,
            signed_distance_above_surface: geometry::signed_distance_from_plane(&normal, &v1, xyz),
            surface_node_count: self.surface.node_count(),
        })
    }

    /// Number of triangles examined so far.
    #[cfg(test)]
    pub(crate) fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }
}

/// Signed areas of `query` against the three edges of a triangle.
///
/// `areas[i]` is the area opposite `p[i]`. Evaluation stops at the first
/// area failing the tolerance. Flat surfaces use the XY signed area with a
/// strict comparison; other surfaces use the normal-signed 3D area with a
/// non-strict one. Areas are left unnormalized; a zero-area triangle
/// reports `[1, 0, 0]`.
fn triangle_areas(
    surface_type: SurfaceType,
    p: [&Point3<f64>; 3],
    normal: &Vector3<f64>,
    query: &Point3<f64>,
    tolerance: f64,
) -> (Containment, [f64; 3]) {
    let [p1, p2, p3] = p;
    let mut areas = [0.0; 3];

    let (inside, triangle_area) = match surface_type {
        SurfaceType::Flat => {
            let signed = geometry::triangle_area_signed_2d;
            let passes = |a: f64| a > tolerance;
            areas[0] = signed(p2, p3, query);
            let inside = passes(areas[0]) && {
                areas[1] = signed(p3, p1, query);
                passes(areas[1])
            } && {
                areas[2] = signed(p1, p2, query);
                passes(areas[2])
            };
            (inside, signed(p1, p2, p3))
        }
        SurfaceType::Spherical | SurfaceType::Generic3D => {
            let signed = |a, b| geometry::triangle_area_signed_3d(normal, a, b, query);
            let passes = |a: f64| a >= tolerance;
            areas[0] = signed(p2, p3);
            let inside = passes(areas[0]) && {
                areas[1] = signed(p3, p1);
                passes(areas[1])
            } && {
                areas[2] = signed(p1, p2);
                passes(areas[2])
            };
            (inside, geometry::triangle_area(p1, p2, p3))
        }
    };

    if !inside {
        return (Containment::Outside, areas);
    }

    let containment = if areas.iter().all(|&a| a > 0.0) {
        Containment::Inside
    } else {
        Containment::OnBoundary
    };
    if triangle_area <= 0.0 {
        areas = [1.0, 0.0, 0.0];
    }
    (containment, areas)
}

/// Force a node or edge location onto its first candidate triangle.
///
/// The containment test runs with an unbounded tolerance so the point is
/// always accepted; the location then becomes a triangle location with the
/// projection's nodes, areas and signed distance.
pub(crate) fn convert_to_triangle<S: ProjectionSurface + ?Sized>(
    test: &mut ContainmentTest<'_, S>,
    location: &mut ProjectionLocation,
) -> Option<BarycentricProjection> {
    let first = location.nearest_triangle()?;
    let proj = test.check(first, &location.point, f64::NEG_INFINITY)?;
    location.adopt(&proj);
    Some(proj)
}

/// Produce a barycentric projection for `location`.
///
/// Node and edge locations are converted onto their first candidate
/// triangle. Triangle locations are tested against their triangle with
/// `tolerance`. If neither yields a projection, the tiles of the nearest
/// node are searched (first non-degenerate hit wins, else the first
/// degenerate hit), and finally a point within the nearest-node tolerance
/// is projected onto the node itself.
///
/// Returns the projection and whether the location was altered by
/// conversion.
///
/// # Errors
///
/// Returns [`ProjectError::TriangleProjectionFailed`] when nothing contains
/// the point.
pub(crate) fn project_to_triangle<S: ProjectionSurface + ?Sized>(
    test: &mut ContainmentTest<'_, S>,
    location: &mut ProjectionLocation,
    tolerance: f64,
    nearest_node_tolerance_sq: f64,
) -> ProjectResult<(BarycentricProjection, bool)> {
    let xyz = location.point;

    let (first, altered) = match location.kind {
        FeatureKind::Node | FeatureKind::Edge => {
            let proj = convert_to_triangle(test, location);
            let altered = proj.is_some();
            (proj, altered)
        }
        FeatureKind::Triangle => (
            location
                .nearest_triangle()
                .and_then(|t| test.check(t, &xyz, tolerance)),
            false,
        ),
    };
    if let Some(proj) = first {
        return Ok((proj, altered));
    }

    debug!(
        nearest_node = location.nearest_node,
        "First candidate rejected, searching tiles of nearest node"
    );
    if let Some(proj) = search_node_tiles(test, location.nearest_node, &xyz, tolerance) {
        return Ok((proj, altered));
    }

    let dist_sq = (xyz - location.nearest_node_xyz).norm_squared();
    if dist_sq <= nearest_node_tolerance_sq {
        let n = location.nearest_node;
        return Ok((
            BarycentricProjection {
                valid: true,
                degenerate: true,
                triangle_nodes: [n, n, n],
                triangle_areas: [1.0, 0.0, 0.0],
                signed_distance_above_surface: location.signed_distance,
                surface_node_count: test.surface.node_count(),
            },
            altered,
        ));
    }

    Err(ProjectError::triangle_failed(format!(
        "no triangle contains the point; nearest node {} is {:.6} away (tolerance {:.6})",
        location.nearest_node,
        dist_sq.sqrt(),
        nearest_node_tolerance_sq.sqrt()
    )))
}

/// Test each unvisited tile of `node`.
fn search_node_tiles<S: ProjectionSurface + ?Sized>(
    test: &mut ContainmentTest<'_, S>,
    node: usize,
    xyz: &Point3<f64>,
    tolerance: f64,
) -> Option<BarycentricProjection> {
    let surface = test.surface;
    let mut degenerate = None;
    for &tile in surface.node_tiles(node) {
        if let Some(proj) = test.check(tile, xyz, tolerance) {
            if !proj.degenerate {
                return Some(proj);
            }
            degenerate.get_or_insert(proj);
        }
    }
    degenerate
}
