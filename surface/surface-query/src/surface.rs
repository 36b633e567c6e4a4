//! Queryable surface abstraction.

use nalgebra::{Point3, Vector3};
use surface_topology::TopologyHelper;
use surface_types::{Structure, SurfaceMesh, SurfaceType};
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::feature::{find_nearest_feature, NearestFeature};

/// Read-only view of a triangulated surface used by projection.
///
/// The trait is object safe so surfaces of different concrete types can be
/// mixed behind `&dyn ProjectionSurface`.
pub trait ProjectionSurface {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of triangles.
    fn triangle_count(&self) -> usize;

    /// Position of `node`.
    fn coordinate(&self, node: usize) -> Option<Point3<f64>>;

    /// Unit outward normal of `node`.
    fn normal(&self, node: usize) -> Option<Vector3<f64>>;

    /// Node indices of `triangle`, in winding order.
    fn triangle(&self, triangle: usize) -> Option<[usize; 3]>;

    /// Unit normal of `triangle`.
    fn triangle_normal(&self, triangle: usize) -> Option<Vector3<f64>>;

    /// The triangle other than `exclude` using the edge `n0`-`n1`.
    fn triangle_sharing_edge(&self, n0: usize, n1: usize, exclude: usize) -> Option<usize>;

    /// Triangles using `node`, ordered around it.
    fn node_tiles(&self, node: usize) -> &[usize];

    /// Closest surface feature to `xyz`.
    ///
    /// # Errors
    ///
    /// Fails for a non-finite query or a surface without triangles.
    fn nearest_feature(&self, xyz: &Point3<f64>) -> QueryResult<NearestFeature>;

    /// Geometric kind of the surface.
    fn surface_type(&self) -> SurfaceType;

    /// Anatomical structure of the surface.
    fn structure(&self) -> Structure;

    /// Mean node distance from the origin.
    fn spherical_radius(&self) -> f64;

    /// Mean edge length.
    fn mean_edge_length(&self) -> f64;
}

/// A [`SurfaceMesh`] with precomputed topology and normals.
///
/// Missing node normals are filled in from the incident faces when the
/// surface is built.
///
/// # Example
///
/// ```
/// use surface_query::{IndexedSurface, ProjectionSurface, FeatureKind};
/// use surface_types::{unit_square, Point3};
///
/// let surface = IndexedSurface::new(unit_square()).unwrap();
/// let f = surface.nearest_feature(&Point3::new(0.25, 0.25, 1.0)).unwrap();
/// assert_eq!(f.kind, FeatureKind::Triangle);
/// ```
#[derive(Debug, Clone)]
pub struct IndexedSurface {
    mesh: SurfaceMesh,
    topology: TopologyHelper,
    triangle_normals: Vec<Vector3<f64>>,
    mean_edge_length: f64,
    radius: f64,
}

impl IndexedSurface {
    /// Wrap `mesh` for querying.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Topology`] if a triangle references a missing
    /// node or repeats a node.
    pub fn new(mut mesh: SurfaceMesh) -> QueryResult<Self> {
        let topology = TopologyHelper::new(&mesh)?;
        mesh.fill_missing_normals();

        let triangle_normals = (0..mesh.triangle_count())
            .map(|t| mesh.triangle(t).map_or_else(Vector3::zeros, |tri| tri.unit_normal()))
            .collect();
        let mean_edge_length = topology.mean_edge_length(&mesh);
        let radius = mesh.spherical_radius();

        debug!(
            nodes = mesh.node_count(),
            triangles = mesh.triangle_count(),
            surface_type = %mesh.surface_type,
            mean_edge_length,
            "Indexed surface"
        );

        Ok(Self {
            mesh,
            topology,
            triangle_normals,
            mean_edge_length,
            radius,
        })
    }

    /// Underlying mesh.
    #[must_use]
    pub const fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// Topology lookups.
    #[must_use]
    pub const fn topology(&self) -> &TopologyHelper {
        &self.topology
    }
}

impl TryFrom<SurfaceMesh> for IndexedSurface {
    type Error = QueryError;

    fn try_from(mesh: SurfaceMesh) -> Result<Self, Self::Error> {
        Self::new(mesh)
    }
}

impl ProjectionSurface for IndexedSurface {
    fn node_count(&self) -> usize {
        self.mesh.node_count()
    }

    fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    fn coordinate(&self, node: usize) -> Option<Point3<f64>> {
        self.mesh.coordinate(node)
    }

    fn normal(&self, node: usize) -> Option<Vector3<f64>> {
        self.mesh.vertices.get(node).and_then(|v| v.normal)
    }

    fn triangle(&self, triangle: usize) -> Option<[usize; 3]> {
        self.mesh.face_nodes(triangle)
    }

    fn triangle_normal(&self, triangle: usize) -> Option<Vector3<f64>> {
        self.triangle_normals.get(triangle).copied()
    }

    fn triangle_sharing_edge(&self, n0: usize, n1: usize, exclude: usize) -> Option<usize> {
        self.topology.triangle_sharing_edge(n0, n1, exclude)
    }

    fn node_tiles(&self, node: usize) -> &[usize] {
        self.topology.node_tiles(node)
    }

    fn nearest_feature(&self, xyz: &Point3<f64>) -> QueryResult<NearestFeature> {
        find_nearest_feature(&self.mesh, xyz)
    }

    fn surface_type(&self) -> SurfaceType {
        self.mesh.surface_type
    }

    fn structure(&self) -> Structure {
        self.mesh.structure
    }

    fn spherical_radius(&self) -> f64 {
        self.radius
    }

    fn mean_edge_length(&self) -> f64 {
        self.mean_edge_length
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use surface_types::{unit_octahedron, unit_square, Vertex};

    #[test]
    fn normals_filled_on_build() {
        let mut square = unit_square();
        for v in &mut square.vertices {
            v.normal = None;
        }
        let surface = IndexedSurface::new(square).unwrap();
        for node in 0..surface.node_count() {
            assert_relative_eq!(surface.normal(node).unwrap().z, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn triangle_normals_cached() {
        let surface = IndexedSurface::new(unit_octahedron()).unwrap();
        let n = surface.triangle_normal(0).unwrap();
        let expected = Vector3::new(1.0, 1.0, 1.0).normalize();
        assert_relative_eq!(n, expected, epsilon = 1e-12);
        assert!(surface.triangle_normal(8).is_none());
        assert_relative_eq!(surface.spherical_radius(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn works_as_trait_object() {
        let surface = IndexedSurface::new(unit_square()).unwrap();
        let dyn_surface: &dyn ProjectionSurface = &surface;
        assert_eq!(dyn_surface.triangle(1), Some([1, 2, 3]));
        assert_eq!(dyn_surface.node_tiles(1), &[1, 0]);
        assert_eq!(dyn_surface.triangle_sharing_edge(1, 3, 0), Some(1));
        assert_eq!(dyn_surface.surface_type(), SurfaceType::Flat);
    }

    #[test]
    fn rejects_broken_topology() {
        let mut square = unit_square();
        square.faces.push([0, 1, 7]);
        assert!(matches!(
            IndexedSurface::try_from(square),
            Err(QueryError::Topology(_))
        ));
    }

    #[test]
    fn isolated_node_keeps_no_normal() {
        let mut square = unit_square();
        square.vertices.push(Vertex::from_coords(3.0, 3.0, 0.0));
        let surface = IndexedSurface::new(square).unwrap();
        assert!(surface.normal(4).is_none());
        assert!(surface.node_tiles(4).is_empty());
    }
}
