//! Single-item projection.

use nalgebra::Point3;
use surface_query::{FeatureKind, ProjectionSurface};
use tracing::{debug, warn};

use crate::error::{ProjectError, ProjectResult};
use crate::location::resolve_location;
use crate::params::ProjectorParams;
use crate::record::ProjectedItem;
use crate::select::select_nearest_surface;
use crate::triangle::{project_to_triangle, ContainmentTest};
use crate::validate::ValidationReport;
use crate::van_essen::project_van_essen;

/// Projects items onto the nearest of one or more surfaces.
///
/// Holds shared references to the surfaces; they are never modified. Each
/// projection call keeps its own scratch state, so a projector can be
/// shared between threads when the surfaces can.
///
/// # Example
///
/// ```
/// use surface_project::{ProjectedItem, SurfaceProjector};
/// use surface_query::IndexedSurface;
/// use surface_types::{unit_square, Point3};
///
/// let surface = IndexedSurface::new(unit_square()).unwrap();
/// let projector = SurfaceProjector::new(&surface);
///
/// let mut item = ProjectedItem::new(Point3::new(0.25, 0.25, 2.0));
/// projector.project_item(&mut item).unwrap();
///
/// assert!(item.barycentric.valid);
/// assert_eq!(item.barycentric.triangle_nodes, [0, 1, 3]);
/// assert!((item.barycentric.signed_distance_above_surface - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceProjector<'a, S: ProjectionSurface + ?Sized> {
    surfaces: Vec<&'a S>,
    nearest_node_tolerances_sq: Vec<f64>,
    params: ProjectorParams,
}

impl<'a, S: ProjectionSurface + ?Sized> SurfaceProjector<'a, S> {
    /// Projector for a single surface with default params.
    #[must_use]
    pub fn new(surface: &'a S) -> Self {
        Self::with_surfaces(vec![surface])
    }

    /// Projector choosing among `surfaces` per item.
    ///
    /// An empty list is accepted; every projection then fails with
    /// [`ProjectError::NoSurface`].
    #[must_use]
    pub fn with_surfaces(surfaces: Vec<&'a S>) -> Self {
        let nearest_node_tolerances_sq = surfaces
            .iter()
            .map(|s| {
                let mean = s.mean_edge_length();
                2.0 * mean * mean
            })
            .collect();
        Self {
            surfaces,
            nearest_node_tolerances_sq,
            params: ProjectorParams::default(),
        }
    }

    /// Replace the params.
    #[must_use]
    pub const fn with_params(mut self, params: ProjectorParams) -> Self {
        self.params = params;
        self
    }

    /// Current params.
    #[must_use]
    pub const fn params(&self) -> &ProjectorParams {
        &self.params
    }

    /// Surfaces projected onto.
    #[must_use]
    pub fn surfaces(&self) -> &[&'a S] {
        &self.surfaces
    }

    /// Squared distance within which a point may snap to its nearest node
    /// of surface `index`.
    #[must_use]
    pub fn nearest_node_tolerance_sq(&self, index: usize) -> Option<f64> {
        self.nearest_node_tolerances_sq.get(index).copied()
    }

    /// Project `item` using the configured edge-projection setting.
    ///
    /// Returns a validation report when validation is enabled.
    ///
    /// # Errors
    ///
    /// - [`ProjectError::NoSurface`] without surfaces
    /// - [`ProjectError::InvalidPosition`] if the item has no finite position
    /// - [`ProjectError::EmptyMesh`] if the selected surface is empty
    /// - any location, edge or triangle failure
    ///
    /// Both projection slots are cleared once the chosen surface passes the
    /// empty check; failures before that leave `item` untouched.
    pub fn project_item(&self, item: &mut ProjectedItem) -> ProjectResult<Option<ValidationReport>> {
        self.project(item, self.params.allow_edge_projection)
    }

    /// Project `item`, always producing a barycentric projection.
    ///
    /// # Errors
    ///
    /// See [`SurfaceProjector::project_item`].
    pub fn project_item_to_triangle(
        &self,
        item: &mut ProjectedItem,
    ) -> ProjectResult<Option<ValidationReport>> {
        self.project(item, false)
    }

    /// Project `item`, using an edge projection when it lands on an edge.
    ///
    /// # Errors
    ///
    /// See [`SurfaceProjector::project_item`].
    pub fn project_item_to_triangle_or_edge(
        &self,
        item: &mut ProjectedItem,
    ) -> ProjectResult<Option<ValidationReport>> {
        self.project(item, true)
    }

    /// Project a bare position.
    ///
    /// # Errors
    ///
    /// See [`SurfaceProjector::project_item`].
    pub fn project_point(&self, xyz: Point3<f64>) -> ProjectResult<ProjectedItem> {
        let mut item = ProjectedItem::new(xyz);
        self.project_item(&mut item)?;
        Ok(item)
    }

    fn project(
        &self,
        item: &mut ProjectedItem,
        allow_edge: bool,
    ) -> ProjectResult<Option<ValidationReport>> {
        if self.surfaces.is_empty() {
            return Err(ProjectError::NoSurface);
        }
        let xyz = item.valid_position().ok_or(ProjectError::InvalidPosition)?;

        let index = select_nearest_surface(&self.surfaces, &xyz)?;
        let surface = self.surfaces[index];
        let tolerance_sq = self.nearest_node_tolerances_sq[index];

        let (original, altered) = self.project_to_surface(surface, &xyz, item, allow_edge, tolerance_sq)?;

        if !self.params.validate {
            return Ok(None);
        }
        let report = ValidationReport::check(surface, item, original, altered);
        if report.failed {
            warn!(report = %report, "Projection validation failed");
        }
        Ok(Some(report))
    }

    /// Fill the projection slots of `item` from `surface`.
    ///
    /// Returns the resolved location, and the altered location when it was
    /// converted to a triangle, formatted for validation reports.
    fn project_to_surface(
        &self,
        surface: &S,
        xyz: &Point3<f64>,
        item: &mut ProjectedItem,
        allow_edge: bool,
        tolerance_sq: f64,
    ) -> ProjectResult<(String, Option<String>)> {
        let (nodes, triangles) = (surface.node_count(), surface.triangle_count());
        if nodes == 0 || triangles == 0 {
            return Err(ProjectError::empty_mesh(nodes, triangles));
        }

        item.clear_projections();

        let mut location = resolve_location(surface, xyz)?;
        let original = location.to_string();

        let altered = if allow_edge && location.kind == FeatureKind::Edge {
            item.van_essen = project_van_essen(surface, &location, self.params.surface_offset)?;
            debug!(projection = %item.van_essen, "Edge projection");
            None
        } else {
            let mut test = ContainmentTest::new(surface);
            let (mut proj, altered) = project_to_triangle(
                &mut test,
                &mut location,
                self.params.area_tolerance,
                tolerance_sq,
            )?;
            if let Some(offset) = self.params.surface_offset {
                proj.signed_distance_above_surface = offset;
            }
            item.barycentric = proj;
            debug!(projection = %item.barycentric, "Triangle projection");
            altered.then(|| location.to_string())
        };

        item.structure = surface.structure();
        Ok((original, altered))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::validate::ProjectionType;
    use approx::assert_relative_eq;
    use surface_query::IndexedSurface;
    use surface_types::{unit_octahedron, unit_square, Structure, SurfaceMesh};

    fn square() -> IndexedSurface {
        let mesh = unit_square().with_structure(Structure::CortexLeft);
        IndexedSurface::new(mesh).unwrap()
    }

    #[test]
    fn interior_point_projects_to_triangle() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface);
        let item = projector.project_point(Point3::new(0.75, 0.5, -1.0)).unwrap();
        assert!(item.barycentric.valid);
        assert!(!item.van_essen.valid);
        assert!(!item.barycentric.degenerate);
        assert_eq!(item.barycentric.triangle_nodes, [1, 2, 3]);
        assert_relative_eq!(item.barycentric.signed_distance_above_surface, -1.0, epsilon = 1e-12);
        assert_eq!(item.structure, Structure::CortexLeft);
    }

    #[test]
    fn diagonal_point_uses_edge_projection() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface);
        let item = projector.project_point(Point3::new(0.5, 0.5, 0.0)).unwrap();
        assert!(item.van_essen.valid);
        assert!(!item.barycentric.valid);
        assert_eq!(item.van_essen.vertex, [1, 3]);
    }

    #[test]
    fn triangle_only_converts_edge() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface);
        let mut item = ProjectedItem::new(Point3::new(0.5, 0.5, 0.0));
        projector.project_item_to_triangle(&mut item).unwrap();
        assert!(item.barycentric.valid);
        assert!(item.barycentric.degenerate);
        assert_eq!(item.barycentric.triangle_nodes, [0, 1, 3]);
        let w = item.barycentric.weights().unwrap();
        assert_relative_eq!(w[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(w[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn offset_overrides_distance() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface)
            .with_params(ProjectorParams::triangle_only().surface_offset(2.5));
        let item = projector.project_point(Point3::new(0.25, 0.5, 7.0)).unwrap();
        assert_eq!(item.barycentric.signed_distance_above_surface, 2.5);
    }

    #[test]
    fn reprojection_clears_old_slots() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface);
        let mut item = ProjectedItem::new(Point3::new(0.5, 0.5, 0.0));
        projector.project_item(&mut item).unwrap();
        assert!(item.van_essen.valid);

        item.stereotaxic = Some(Point3::new(0.25, 0.25, 0.0));
        projector.project_item(&mut item).unwrap();
        assert!(item.barycentric.valid);
        assert!(!item.van_essen.valid);
    }

    #[test]
    fn errors() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface);
        let mut item = ProjectedItem::default();
        assert!(matches!(
            projector.project_item(&mut item),
            Err(ProjectError::InvalidPosition)
        ));

        let empty = IndexedSurface::new(SurfaceMesh::default()).unwrap();
        let projector = SurfaceProjector::new(&empty);
        let mut item = ProjectedItem::new(Point3::origin());
        item.barycentric.valid = true;
        assert!(matches!(
            projector.project_item(&mut item),
            Err(ProjectError::EmptyMesh { nodes: 0, triangles: 0 })
        ));
        assert!(item.barycentric.valid);

        let projector: SurfaceProjector<'_, IndexedSurface> = SurfaceProjector::with_surfaces(vec![]);
        assert!(matches!(
            projector.project_point(Point3::origin()),
            Err(ProjectError::NoSurface)
        ));
    }

    #[test]
    fn validation_report_returned() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface)
            .with_params(ProjectorParams::triangle_only().validate(true));

        let mut item = ProjectedItem::new(Point3::new(0.25, 0.5, 0.3));
        let report = projector.project_item(&mut item).unwrap().unwrap();
        assert_eq!(report.projection_type, ProjectionType::Triangle);
        assert!(!report.failed);
        assert!(report.altered_location.is_none());
        assert!(report.original_location.starts_with("Type=TRIANGLE"));

        let mut item = ProjectedItem::new(Point3::new(0.5, 0.5, 0.0));
        let report = projector.project_item(&mut item).unwrap().unwrap();
        assert_eq!(report.projection_type, ProjectionType::DegenerateTriangle);
        assert!(report.original_location.starts_with("Type=EDGE"));
        assert!(report.altered_location.unwrap().starts_with("Type=TRIANGLE"));
    }

    #[test]
    fn tolerance_from_mean_edge_length() {
        let surface = square();
        let projector = SurfaceProjector::new(&surface);
        let mean = (4.0 + 2.0_f64.sqrt()) / 5.0;
        assert_relative_eq!(
            projector.nearest_node_tolerance_sq(0).unwrap(),
            2.0 * mean * mean,
            epsilon = 1e-12
        );
        assert!(projector.nearest_node_tolerance_sq(1).is_none());
    }

    #[test]
    fn dyn_surfaces_choose_nearest() {
        let square = square();
        let oct = IndexedSurface::new(unit_octahedron()).unwrap();
        let surfaces: Vec<&dyn ProjectionSurface> = vec![&square, &oct];
        let projector = SurfaceProjector::with_surfaces(surfaces);

        let item = projector.project_point(Point3::new(0.0, 0.0, 1.2)).unwrap();
        // Octahedron tip at distance 0.2 beats the square at 1.2
        assert_eq!(item.structure, Structure::Invalid);
        assert!(item.is_projected());
    }
}
