//! Post-projection validation reports.

use std::fmt;

use surface_query::ProjectionSurface;

use crate::params::VALIDATION_DISTANCE_THRESHOLD;
use crate::record::ProjectedItem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which projection an item ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProjectionType {
    /// Barycentric projection strictly inside a triangle.
    Triangle,
    /// Barycentric projection on a triangle edge or vertex.
    DegenerateTriangle,
    /// Edge (Van Essen) projection.
    Edge,
    /// Neither slot is valid.
    Unprojected,
}

impl fmt::Display for ProjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Triangle => "Triangle",
            Self::DegenerateTriangle => "Triangle-degenerate",
            Self::Edge => "Edge",
            Self::Unprojected => "Unprojected",
        })
    }
}

/// Comparison of an item's stereotaxic position with its projection.
///
/// Triangle projections fail when the projected position is more than
/// [`VALIDATION_DISTANCE_THRESHOLD`] from the stereotaxic position. Edge
/// projections cannot be reconstructed exactly and are always flagged;
/// `distance` then holds the distance to the edge foot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationReport {
    /// Projection the item ended up with.
    pub projection_type: ProjectionType,
    /// Distance between the stereotaxic and projected positions.
    pub distance: Option<f64>,
    /// Validation failed.
    pub failed: bool,
    /// Location as first resolved.
    pub original_location: String,
    /// Location after conversion to a triangle, if it was converted.
    pub altered_location: Option<String>,
}

impl ValidationReport {
    /// Check `item` against its projection on `surface`.
    pub(crate) fn check<S: ProjectionSurface + ?Sized>(
        surface: &S,
        item: &ProjectedItem,
        original_location: String,
        altered_location: Option<String>,
    ) -> Self {
        let stereotaxic = item.valid_position();
        let (projection_type, distance) = if item.barycentric.valid {
            let kind = if item.barycentric.degenerate {
                ProjectionType::DegenerateTriangle
            } else {
                ProjectionType::Triangle
            };
            let projected = item.projected_position(surface);
            (kind, stereotaxic.zip(projected).map(|(s, p)| (s - p).norm()))
        } else if item.van_essen.valid {
            let foot = item.van_essen.edge_point();
            (
                ProjectionType::Edge,
                stereotaxic.zip(foot).map(|(s, p)| (s - p).norm()),
            )
        } else {
            (ProjectionType::Unprojected, None)
        };

        let failed = match projection_type {
            ProjectionType::Triangle | ProjectionType::DegenerateTriangle => {
                distance.map_or(true, |d| d > VALIDATION_DISTANCE_THRESHOLD)
            }
            ProjectionType::Edge | ProjectionType::Unprojected => true,
        };

        Self {
            projection_type,
            distance,
            failed,
            original_location,
            altered_location,
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.distance {
            Some(d) => write!(f, "projType={}: stereo/proj differ by {d:.6}", self.projection_type)?,
            None => write!(f, "projType={}: failed to project", self.projection_type)?,
        }
        if self.failed {
            f.write_str(" FAILED")?;
        }
        write!(f, "\n  ORIGINAL: {}", self.original_location)?;
        if let Some(altered) = &self.altered_location {
            write!(f, "\n  ALTERED: {altered}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::record::BarycentricProjection;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use surface_query::IndexedSurface;
    use surface_types::unit_square;

    #[test]
    fn type_names() {
        assert_eq!(ProjectionType::DegenerateTriangle.to_string(), "Triangle-degenerate");
        assert_eq!(ProjectionType::Unprojected.to_string(), "Unprojected");
    }

    #[test]
    fn triangle_within_threshold_passes() {
        let surface = IndexedSurface::new(unit_square()).unwrap();
        let mut item = ProjectedItem::new(Point3::new(0.25, 0.25, 1.0));
        item.barycentric = BarycentricProjection {
            valid: true,
            triangle_nodes: [0, 1, 3],
            triangle_areas: [0.25, 0.125, 0.125],
            signed_distance_above_surface: 1.0,
            surface_node_count: 4,
            ..Default::default()
        };
        let report = ValidationReport::check(&surface, &item, "loc".into(), None);
        assert_eq!(report.projection_type, ProjectionType::Triangle);
        assert!(!report.failed);
        assert_relative_eq!(report.distance.unwrap(), 0.0, epsilon = 1e-12);
        assert!(!report.to_string().contains("FAILED"));

        item.stereotaxic = Some(Point3::new(0.25, 0.25, 1.5));
        let report = ValidationReport::check(&surface, &item, "loc".into(), Some("alt".into()));
        assert!(report.failed);
        let text = report.to_string();
        assert!(text.contains("FAILED"));
        assert!(text.contains("ALTERED: alt"));
    }

    #[test]
    fn unprojected_always_fails() {
        let surface = IndexedSurface::new(unit_square()).unwrap();
        let item = ProjectedItem::new(Point3::origin());
        let report = ValidationReport::check(&surface, &item, String::new(), None);
        assert_eq!(report.projection_type, ProjectionType::Unprojected);
        assert!(report.failed);
        assert!(report.to_string().contains("failed to project"));
    }
}
