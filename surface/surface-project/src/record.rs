//! Projection records.

use std::fmt;

use nalgebra::Point3;
use surface_query::ProjectionSurface;
use surface_types::{geometry, Structure};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point expressed relative to one surface triangle.
///
/// `triangle_areas[i]` is the signed sub-triangle area opposite
/// `triangle_nodes[i]`. The areas are raw, not divided by the triangle
/// area, so they do not sum to 1. Use [`BarycentricProjection::weights`]
/// for convex weights.
///
/// # Example
///
/// ```
/// use surface_project::BarycentricProjection;
///
/// let proj = BarycentricProjection::default();
/// assert!(!proj.valid);
/// assert!(proj.weights().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarycentricProjection {
    /// Projection succeeded.
    pub valid: bool,
    /// Point lies on an edge or vertex of the triangle.
    pub degenerate: bool,
    /// Triangle node indices, in winding order.
    pub triangle_nodes: [usize; 3],
    /// Unnormalized signed areas, one per node.
    pub triangle_areas: [f64; 3],
    /// Signed distance of the point above the triangle plane.
    pub signed_distance_above_surface: f64,
    /// Node count of the surface projected onto.
    pub surface_node_count: usize,
}

impl BarycentricProjection {
    /// Areas divided by their sum.
    ///
    /// Returns `None` for an invalid projection or areas summing to zero.
    #[must_use]
    pub fn weights(&self) -> Option<[f64; 3]> {
        if !self.valid {
            return None;
        }
        let total: f64 = self.triangle_areas.iter().sum();
        if total.abs() <= f64::EPSILON {
            return None;
        }
        Some(self.triangle_areas.map(|a| a / total))
    }

    /// True when this projection was made on a surface with as many nodes as `surface`.
    #[must_use]
    pub fn is_compatible_with<S: ProjectionSurface + ?Sized>(&self, surface: &S) -> bool {
        self.surface_node_count == surface.node_count()
    }

    /// Point on `surface` the projection refers to.
    #[must_use]
    pub fn surface_position<S: ProjectionSurface + ?Sized>(
        &self,
        surface: &S,
    ) -> Option<Point3<f64>> {
        let weights = self.weights()?;
        let mut coords = nalgebra::Vector3::zeros();
        for (node, w) in self.triangle_nodes.iter().zip(weights) {
            coords += surface.coordinate(*node)?.coords * w;
        }
        Some(Point3::from(coords))
    }

    /// Surface position moved along the triangle normal by the signed distance.
    ///
    /// A collapsed triangle (all nodes equal) uses the node normal.
    #[must_use]
    pub fn projected_position<S: ProjectionSurface + ?Sized>(
        &self,
        surface: &S,
    ) -> Option<Point3<f64>> {
        let on_surface = self.surface_position(surface)?;
        let [a, b, c] = self.triangle_nodes;
        let mut normal = geometry::normal_vector(
            &surface.coordinate(a)?,
            &surface.coordinate(b)?,
            &surface.coordinate(c)?,
        );
        if normal.norm_squared() == 0.0 {
            normal = surface.normal(a)?;
        }
        Some(on_surface + normal * self.signed_distance_above_surface)
    }
}

impl fmt::Display for BarycentricProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [n0, n1, n2] = self.triangle_nodes;
        let [a0, a1, a2] = self.triangle_areas;
        write!(
            f,
            "Barycentric valid={} degenerate={} nodes=({n0}, {n1}, {n2}) areas=({a0:.6}, {a1:.6}, {a2:.6}) distance={:.6}",
            self.valid, self.degenerate, self.signed_distance_above_surface
        )
    }
}

/// A point expressed relative to a surface edge and its two triangles.
///
/// Triangle vertex triples are stored with first and last entries swapped
/// relative to the surface winding. When the edge lies on an open boundary
/// the second triangle is all zeros and `phi_r` is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VanEssenProjection {
    /// Projection succeeded.
    pub valid: bool,
    /// Edge endpoints `iR`, `jR`.
    pub vertex: [usize; 2],
    /// Coordinates of the edge endpoints.
    pub vertex_anatomical: [Point3<f64>; 2],
    /// Node triples of the nearest triangle and its neighbour across the edge.
    pub tri_vertices: [[usize; 3]; 2],
    /// Coordinates of `tri_vertices`.
    pub tri_anatomical: [[Point3<f64>; 3]; 2],
    /// Angle between the two triangle normals, radians.
    pub phi_r: f64,
    /// Angle between the nearest triangle normal and the edge-to-point direction, radians.
    pub theta_r: f64,
    /// Position of the edge foot measured from `iR`, as a fraction of edge length.
    pub frac_ri: f64,
    /// Position of the edge foot measured from `jR`, as a fraction of edge length.
    pub frac_rj: f64,
    /// Distance from the edge foot to the point.
    pub d_r: f64,
    /// Node count of the surface projected onto.
    pub surface_node_count: usize,
}

impl Default for VanEssenProjection {
    fn default() -> Self {
        let origin = Point3::origin();
        Self {
            valid: false,
            vertex: [0, 0],
            vertex_anatomical: [origin; 2],
            tri_vertices: [[0; 3]; 2],
            tri_anatomical: [[origin; 3]; 2],
            phi_r: 0.0,
            theta_r: 0.0,
            frac_ri: 0.0,
            frac_rj: 0.0,
            d_r: 0.0,
            surface_node_count: 0,
        }
    }
}

impl VanEssenProjection {
    /// Foot of the point on the edge, from the stored endpoint coordinates.
    #[must_use]
    pub fn edge_point(&self) -> Option<Point3<f64>> {
        if !self.valid {
            return None;
        }
        let [i, j] = self.vertex_anatomical;
        Some(i + (j - i) * self.frac_ri)
    }
}

impl fmt::Display for VanEssenProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [i, j] = self.vertex;
        write!(
            f,
            "VanEssen valid={} edge=({i}, {j}) phiR={:.6} thetaR={:.6} fracRI={:.6} fracRJ={:.6} dR={:.6}",
            self.valid, self.phi_r, self.theta_r, self.frac_ri, self.frac_rj, self.d_r
        )
    }
}

/// An item to project and its projection results.
///
/// # Example
///
/// ```
/// use surface_project::ProjectedItem;
/// use surface_types::Point3;
///
/// let item = ProjectedItem::new(Point3::new(1.0, 2.0, 3.0));
/// assert!(item.has_valid_position());
/// assert!(!item.is_projected());
///
/// assert!(!ProjectedItem::default().has_valid_position());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectedItem {
    /// Stereotaxic position to project; `None` if unknown.
    pub stereotaxic: Option<Point3<f64>>,
    /// Triangle projection slot.
    pub barycentric: BarycentricProjection,
    /// Edge projection slot.
    pub van_essen: VanEssenProjection,
    /// Structure of the surface used for the projection.
    pub structure: Structure,
}

impl ProjectedItem {
    /// Create an unprojected item at `position`.
    #[must_use]
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            stereotaxic: Some(position),
            ..Default::default()
        }
    }

    /// The stereotaxic position if present and finite.
    #[must_use]
    pub fn valid_position(&self) -> Option<Point3<f64>> {
        self.stereotaxic
            .filter(|p| p.coords.iter().all(|c| c.is_finite()))
    }

    /// True when the stereotaxic position is present and finite.
    #[must_use]
    pub fn has_valid_position(&self) -> bool {
        self.valid_position().is_some()
    }

    /// True when either projection slot is valid.
    #[must_use]
    pub const fn is_projected(&self) -> bool {
        self.barycentric.valid || self.van_essen.valid
    }

    /// Mark both projection slots invalid.
    pub fn clear_projections(&mut self) {
        self.barycentric.valid = false;
        self.van_essen.valid = false;
    }

    /// Projected position of a barycentric projection on `surface`.
    ///
    /// Edge projections return `None`; use [`VanEssenProjection::edge_point`].
    #[must_use]
    pub fn projected_position<S: ProjectionSurface + ?Sized>(
        &self,
        surface: &S,
    ) -> Option<Point3<f64>> {
        self.barycentric.projected_position(surface)
    }
}
